//! # Account Repository
//!
//! The Account Store: registered users, their role and hashed credential.
//!
//! ## First Account Bootstrap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register("a@x.com")                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO accounts (..., role)                                       │
//! │  SELECT ..., CASE WHEN (SELECT COUNT(*) FROM accounts) = 0              │
//! │                   THEN 'admin' ELSE 'user' END                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Count and insert are one statement, so two simultaneous first          │
//! │  registrations cannot both become admin.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The password hash is read only inside [`AccountRepository::verify_credentials`];
//! every other method returns [`Account`], which has no hash field.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::password::verify_password_off_thread;
use sweetshop_core::validation::normalize_email;
use sweetshop_core::{Account, Role};

const ACCOUNT_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    name: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Result of checking an email/password pair.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialCheck {
    /// Email known and password matches.
    Valid(Account),
    /// No account with this email.
    UnknownEmail,
    /// Account exists, password does not match.
    WrongPassword,
}

/// Repository for account operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts an account whose role depends on whether it is the first one.
    ///
    /// ## Arguments
    /// * `bootstrap_admin` - When true, the very first account becomes
    ///   `Admin`; every later one is `Standard`. When false, always `Standard`.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn create_with_bootstrap_role(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        bootstrap_admin: bool,
    ) -> DbResult<Account> {
        let email = normalize_email(email);
        let now = Utc::now();

        debug!(email = %email, bootstrap_admin, "Inserting account");

        let row: AccountRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO accounts (id, email, name, password_hash, role, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4,
                CASE WHEN ?5 AND (SELECT COUNT(*) FROM accounts) = 0
                     THEN 'admin' ELSE 'user' END,
                ?6, ?6
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&email)
        .bind(name)
        .bind(password_hash)
        .bind(bootstrap_admin)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        info!(id = %row.id, role = %row.role, "Account created");
        Ok(row.into())
    }

    /// Inserts an account with an explicit role (seed binary).
    pub async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> DbResult<Account> {
        let email = normalize_email(email);
        let now = Utc::now();

        let row: AccountRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO accounts (id, email, name, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        info!(id = %row.id, role = %row.role, "Account created");
        Ok(row.into())
    }

    /// Looks an account up by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Gets an account by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Checks an email/password pair against the stored hash.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> DbResult<CredentialCheck> {
        let email = normalize_email(email);

        let found: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM accounts WHERE email = ?1")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;

        let Some((hash,)) = found else {
            return Ok(CredentialCheck::UnknownEmail);
        };

        if !verify_password_off_thread(password.to_string(), hash).await? {
            return Ok(CredentialCheck::WrongPassword);
        }

        match self.find_by_email(&email).await? {
            Some(account) => Ok(CredentialCheck::Valid(account)),
            // Deleted between the two reads.
            None => Ok(CredentialCheck::UnknownEmail),
        }
    }

    /// Counts all accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn duplicate_email(err: sqlx::Error, email: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
