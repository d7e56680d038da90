//! Application state shared across handlers.

use std::sync::Arc;

use sweetshop_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::services::AuthService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    db: Database,
    auth: AuthService,
}

impl AppState {
    pub fn new(config: ApiConfig, db: Database) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_expiry_secs);
        let auth = AuthService::new(db.clone(), jwt, config.bootstrap_first_admin);

        Self {
            inner: Arc::new(AppStateInner { config, db, auth }),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
