//! # Error Types
//!
//! Domain-specific error types for sweetshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweetshop-core errors (this file)                                      │
//! │  ├── CoreError        - Stock rule violations                           │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  sweetshop-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  API errors (apps/api)                                                  │
//! │  └── ApiError         - What HTTP clients see ({code, message})         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Inventory rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Purchase asked for more than is on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase (qty: 100)
    ///      │
    ///      ▼
    /// Check stock: available=8
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Chocolate Frog", available: 8, requested: 100 }
    ///      │
    ///      ▼
    /// HTTP 400 "Insufficient stock for Chocolate Frog: ..."
    /// ```
    ///
    /// The message prefix "Insufficient stock" is relied on by clients.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Restock would push the quantity past what an i64 column can hold.
    #[error("Quantity overflow for {name}")]
    QuantityOverflow { name: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed email, bad image reference).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
