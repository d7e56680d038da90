//! # sweetshop-db: Database Layer for SweetShop
//!
//! SQLite persistence for the Inventory Store and the Account Store, using
//! sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetShop Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/sweets/{id}/purchase)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   sweetshop-db (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │    │
//! │  │   │ SqlitePool    │◄───│ ItemRepo      │    │ 001_init.sql │    │    │
//! │  │   │               │    │ AccountRepo   │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ./sweetshop.db (WAL)                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`password`] - Argon2 hashing for stored credentials
//! - [`repository`] - Item and account repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweetshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./sweetshop.db")).await?;
//! let sweets = db.items().list(&ItemFilter::by_category("Chocolate")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::{AccountRepository, CredentialCheck};
pub use repository::item::ItemRepository;
