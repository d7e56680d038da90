//! Service layer.
//!
//! Business orchestration that sits between the HTTP handlers and the store.

pub mod auth_service;

pub use auth_service::AuthService;
