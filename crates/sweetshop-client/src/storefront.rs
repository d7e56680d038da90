//! # Storefront
//!
//! View state plus the data source behind it. A front end renders
//! [`ViewState`] and calls the methods here; it never talks to a source
//! directly.
//!
//! ## Startup
//! ```text
//! Storefront::connect(config, sessions)
//!      │
//!      ├── restore session.json (expired → dropped)
//!      │
//!      ▼
//! GET /health
//!      ├── ok                          → Connected,    RemoteSource
//!      ├── network error + fallback on → Disconnected, InMemorySource (demo)
//!      └── anything else               → Disconnected, RemoteSource
//! ```
//!
//! Demo mode is one-way: once entered it lasts until the storefront is
//! dropped. Demo logins accept any credentials and are never written to
//! disk; an email containing `admin` gets the admin role. Without a name the
//! email's local part is shown.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use sweetshop_core::{
    AuthResponse, Item, ItemDraft, ItemFilter, ItemPatch, PublicUser, Role, ValidationError,
};

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::memory::InMemorySource;
use crate::remote::RemoteSource;
use crate::session::{Session, SessionStore};
use crate::source::{InventorySource, SourceKind};

/// Token carried by sessions created in demo mode.
pub const DEMO_TOKEN: &str = "demo-token";

const DEMO_SESSION_SECS: i64 = 3600;

// =============================================================================
// View State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Login,
    Register,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// Not probed yet.
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub search: String,
    /// `None` shows every category.
    pub category: Option<String>,
    pub backend: BackendStatus,
    pub demo_mode: bool,
}

impl ViewState {
    /// Filter implied by the search box and category picker.
    pub fn filter(&self) -> ItemFilter {
        ItemFilter {
            name: Some(self.search.clone()),
            category: self.category.clone(),
            ..Default::default()
        }
        .normalized()
    }
}

// =============================================================================
// Storefront
// =============================================================================

pub struct Storefront {
    config: ClientConfig,
    remote: Arc<RemoteSource>,
    auth: AuthClient,
    source: Arc<dyn InventorySource>,
    sessions: SessionStore,
    session: Option<Session>,
    state: ViewState,
}

impl Storefront {
    /// Restores the saved session and picks a data source.
    pub async fn connect(config: ClientConfig, sessions: SessionStore) -> ClientResult<Self> {
        let remote = Arc::new(RemoteSource::new(&config)?);
        let auth = AuthClient::new(&config)?;

        let session = sessions.load()?;
        if let Some(session) = &session {
            remote.set_token(Some(session.token.clone())).await;
        }

        let source: Arc<dyn InventorySource> = remote.clone();
        let mut storefront = Storefront {
            config,
            source,
            remote,
            auth,
            sessions,
            session,
            state: ViewState::default(),
        };

        match storefront.remote.health().await {
            Ok(()) => {
                info!(url = %storefront.remote.base_url(), "Backend connected");
                storefront.state.backend = BackendStatus::Connected;
            }
            Err(e) if e.is_network() && storefront.config.demo.fallback_enabled => {
                storefront.state.backend = BackendStatus::Disconnected;
                storefront.enable_demo_mode();
            }
            Err(e) => {
                warn!(error = %e, "Backend unavailable, staying on remote source");
                storefront.state.backend = BackendStatus::Disconnected;
            }
        }

        Ok(storefront)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_demo(&self) -> bool {
        self.state.demo_mode
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    // =========================================================================
    // View State
    // =========================================================================

    /// Switches to the in-memory demo catalog for the rest of this session.
    pub fn enable_demo_mode(&mut self) {
        if self.state.demo_mode {
            return;
        }
        info!("Demo mode enabled, using built-in catalog");
        self.source = Arc::new(InMemorySource::demo());
        self.state.demo_mode = true;
    }

    /// The admin view needs an admin session.
    pub fn set_view(&mut self, view: View) -> ClientResult<()> {
        if view == View::Admin {
            self.require_admin()?;
        }
        self.state.view = view;
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.state.category = category;
    }

    /// Items for the current search and category.
    pub async fn refresh(&mut self) -> ClientResult<Vec<Item>> {
        let filter = self.state.filter();
        let result = self.source.list(&filter).await;
        self.observe(result)
    }

    // =========================================================================
    // Account
    // =========================================================================

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&Session> {
        let session = if self.state.demo_mode {
            demo_session(email, password, None)?
        } else {
            let result = self.auth.login(email, password).await;
            let auth = self.observe(result)?;
            Session::from_auth(auth, Utc::now())
        };
        self.begin_session(session).await
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> ClientResult<&Session> {
        let session = if self.state.demo_mode {
            demo_session(email, password, name)?
        } else {
            let result = self.auth.register(email, password, name).await;
            let auth = self.observe(result)?;
            Session::from_auth(auth, Utc::now())
        };
        self.begin_session(session).await
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        if let Some(session) = self.session.take() {
            info!(email = %session.user.email, "Logged out");
        }
        self.remote.set_token(None).await;
        self.sessions.clear()?;
        self.state.view = View::Home;
        Ok(())
    }

    async fn begin_session(&mut self, session: Session) -> ClientResult<&Session> {
        if !self.state.demo_mode {
            self.sessions.store(&session)?;
            self.remote.set_token(Some(session.token.clone())).await;
        }
        debug!(email = %session.user.email, role = %session.user.role, "Session started");

        self.state.view = View::Home;
        Ok(self.session.insert(session))
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Buys `qty` units. Without a session the view moves to login.
    pub async fn purchase(&mut self, id: &str, qty: i64) -> ClientResult<Item> {
        self.require_session()?;
        let result = self.source.purchase(id, qty).await;
        self.observe(result)
    }

    pub async fn create_item(&mut self, draft: ItemDraft) -> ClientResult<Item> {
        self.require_admin()?;
        let result = self.source.create(draft).await;
        self.observe(result)
    }

    pub async fn update_item(&mut self, id: &str, patch: ItemPatch) -> ClientResult<Item> {
        self.require_admin()?;
        let result = self.source.update(id, patch).await;
        self.observe(result)
    }

    pub async fn delete_item(&mut self, id: &str) -> ClientResult<()> {
        self.require_admin()?;
        let result = self.source.delete(id).await;
        self.observe(result)
    }

    pub async fn restock(&mut self, id: &str, qty: i64) -> ClientResult<Item> {
        self.require_admin()?;
        let result = self.source.restock(id, qty).await;
        self.observe(result)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_session(&mut self) -> ClientResult<&Session> {
        match self.session {
            Some(ref session) => Ok(session),
            None => {
                self.state.view = View::Login;
                Err(ClientError::NotAuthenticated)
            }
        }
    }

    fn require_admin(&mut self) -> ClientResult<()> {
        if self.require_session()?.is_admin() {
            Ok(())
        } else {
            Err(ClientError::NotAuthorized)
        }
    }

    /// Tracks backend reachability from a remote call's outcome.
    fn observe<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if !self.state.demo_mode {
            match &result {
                Ok(_) => self.state.backend = BackendStatus::Connected,
                Err(e) if e.is_network() => {
                    warn!(error = %e, "Backend unreachable");
                    self.state.backend = BackendStatus::Disconnected;
                }
                Err(_) => {}
            }
        }
        result
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("base_url", &self.remote.base_url())
            .field("source", &self.source.kind())
            .field("signed_in", &self.session.is_some())
            .field("state", &self.state)
            .finish()
    }
}

fn demo_session(email: &str, password: &str, name: Option<&str>) -> ClientResult<Session> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".into(),
        }
        .into());
    }
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".into(),
        }
        .into());
    }

    let display_name = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or(&email).to_string(),
    };

    let role = if email.contains("admin") {
        Role::Admin
    } else {
        Role::Standard
    };

    let auth = AuthResponse {
        token: DEMO_TOKEN.to_string(),
        user: PublicUser {
            id: format!("demo-{email}"),
            email,
            role,
            name: Some(display_name),
        },
        expires_in: DEMO_SESSION_SECS,
    };
    Ok(Session::from_auth(auth, Utc::now()))
}
