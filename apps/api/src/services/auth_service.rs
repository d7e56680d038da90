//! Authentication service.
//!
//! Registration, login, credential verification and role checks.
//!
//! ```text
//! register ──► validate ──► argon2 hash ──► AccountRepository ──► JwtManager::issue
//! login    ──► AccountRepository::verify_credentials ──────────► JwtManager::issue
//! verify   ──► JwtManager::validate_token ──► AuthUser
//! ```

use tracing::{info, warn};

use sweetshop_core::validation::{normalize_email, validate_email, validate_password};
use sweetshop_core::{
    Account, AuthResponse, LoginRequest, PublicUser, RegisterRequest, Role, ValidationError,
};
use sweetshop_db::password::hash_password_off_thread;
use sweetshop_db::{CredentialCheck, Database};

use crate::auth::{AuthUser, JwtManager};
use crate::error::{ApiError, ApiResult};

/// Authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtManager,
    bootstrap_first_admin: bool,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(db: Database, jwt: JwtManager, bootstrap_first_admin: bool) -> Self {
        AuthService {
            db,
            jwt,
            bootstrap_first_admin,
        }
    }

    /// Creates an account and signs it in.
    ///
    /// The first account ever created is an admin while bootstrap is enabled.
    pub async fn register(&self, req: RegisterRequest) -> ApiResult<AuthResponse> {
        let email = required(req.email, "email")?;
        let password = required(req.password, "password")?;
        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        validate_email(&email)?;
        validate_password(&password)?;

        let email = normalize_email(&email);
        info!(email = %email, "Registration request");

        let hash = hash_password_off_thread(password)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let account = self
            .db
            .accounts()
            .create_with_bootstrap_role(&email, name.as_deref(), &hash, self.bootstrap_first_admin)
            .await?;

        info!(id = %account.id, role = %account.role, "Account registered");
        self.respond(&account)
    }

    /// Checks credentials and issues a token.
    pub async fn login(&self, req: LoginRequest) -> ApiResult<AuthResponse> {
        let email = required(req.email, "email")?;
        let password = required(req.password, "password")?;

        match self.db.accounts().verify_credentials(&email, &password).await? {
            CredentialCheck::Valid(account) => {
                info!(id = %account.id, "Login succeeded");
                self.respond(&account)
            }
            CredentialCheck::UnknownEmail => {
                warn!(email = %normalize_email(&email), "Login for unknown email");
                Err(ApiError::InvalidCredentials("User not found".to_string()))
            }
            CredentialCheck::WrongPassword => {
                warn!(email = %normalize_email(&email), "Login with wrong password");
                Err(ApiError::InvalidCredentials("Invalid password".to_string()))
            }
        }
    }

    /// Resolves a bearer token to the identity it was issued for.
    pub fn verify(&self, token: &str) -> ApiResult<AuthUser> {
        self.jwt.validate_token(token).map(AuthUser::from)
    }

    /// Fails with `Forbidden` unless `user` holds `role`.
    pub fn require_role(&self, user: &AuthUser, role: Role) -> ApiResult<()> {
        if user.role == role {
            return Ok(());
        }
        warn!(id = %user.id, role = %user.role, required = %role, "Role check failed");
        Err(ApiError::Forbidden(match role {
            Role::Admin => "Admins only".to_string(),
            Role::Standard => "Forbidden".to_string(),
        }))
    }

    /// Loads the public profile behind a verified identity.
    pub async fn current_user(&self, user: &AuthUser) -> ApiResult<PublicUser> {
        let account = self
            .db
            .accounts()
            .get_by_id(&user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(PublicUser::from(&account))
    }

    fn respond(&self, account: &Account) -> ApiResult<AuthResponse> {
        Ok(AuthResponse {
            token: self.jwt.issue(account)?,
            user: PublicUser::from(account),
            expires_in: self.jwt.lifetime_secs(),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ValidationError::Required {
            field: field.to_string(),
        })
}
