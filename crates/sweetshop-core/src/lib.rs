//! # sweetshop-core: Pure Business Logic for SweetShop
//!
//! Domain types, money, validation and stock arithmetic with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetShop Architecture                           │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐    │
//! │  │  sweetshop-client            │   │  apps/api (axum)             │    │
//! │  │  RemoteSource / InMemory     │   │  /api/auth, /api/sweets      │    │
//! │  └──────────────┬───────────────┘   └──────────────┬───────────────┘    │
//! │                 │                                  │                    │
//! │                 │         ┌────────────────────────▼───────────────┐    │
//! │                 │         │  sweetshop-db (SQLite, sqlx)           │    │
//! │                 │         └────────────────────────┬───────────────┘    │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────────────────▼───────────────┐    │
//! │  │               ★ sweetshop-core (THIS CRATE) ★                   │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation│    │    │
//! │  │   │   Item    │  │   Money   │  │ purchase  │  │   rules   │    │    │
//! │  │   │  Account  │  │           │  │ restock   │  │           │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain and wire types (Item, Account, Role, AuthResponse, ...)
//! - [`money`] - Integer-cents Money that speaks decimal JSON
//! - [`stock`] - Purchase / restock arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetshop_core::{ItemFilter, Money};
//!
//! let filter = ItemFilter {
//!     min_price: Some(Money::from_cents(100)),
//!     max_price: Some(Money::from_cents(300)),
//!     ..Default::default()
//! };
//! assert!(!filter.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Quantity assumed when a purchase body omits it.
pub const DEFAULT_PURCHASE_QUANTITY: i64 = 1;
