//! # SweetShop API
//!
//! REST/JSON server for the sweet shop inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Server                                    │
//! │                                                                         │
//! │  TraceLayer ─► CorsLayer ─► DefaultBodyLimit ─► Router                  │
//! │                                                   │                     │
//! │          ┌────────────────────────────────────────┼──────────────┐      │
//! │          │                                        │              │      │
//! │   ┌──────┴───────┐   ┌────────────────────────────┴──┐  ┌────────┴────┐ │
//! │   │  public      │   │  protected (require_auth)     │  │  /health    │ │
//! │   │              │   │                               │  │             │ │
//! │   │ • register   │   │ • me, purchase                │  │ • db ping   │ │
//! │   │ • login      │   │ ┌───────────────────────────┐ │  └─────────────┘ │
//! │   │ • list       │   │ │ admin (require_admin)     │ │                  │
//! │   │ • search     │   │ │ • create, update, delete  │ │                  │
//! │   │ • get        │   │ │ • restock                 │ │                  │
//! │   └──────────────┘   │ └───────────────────────────┘ │                  │
//! │                      └───────────────────────────────┘                  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                     AuthService ─► sweetshop-db (SQLite)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honoured):
//! - `SWEETSHOP_PORT` - listen port (default: 3001)
//! - `DATABASE_PATH` - SQLite file (default: ./sweetshop.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - secret for token signing
//! - `JWT_EXPIRY_SECS` - token lifetime (default: 3600)
//! - `SWEETSHOP_BOOTSTRAP_FIRST_ADMIN` - first registrant becomes admin (default: true)
//! - `MAX_BODY_BYTES` - request body limit (default: 52428800)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the complete HTTP application for a prepared state.
///
/// Used by `main.rs` and by the black-box tests, so both run the same stack.
pub fn build_app(state: AppState) -> Router {
    let max_body = state.config().max_body_bytes;

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", routes::router(state.clone()))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| {
                            tracing::info_span!(
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                                status = tracing::field::Empty,
                                latency_ms = tracing::field::Empty,
                            )
                        })
                        .on_response(
                            |response: &Response<Body>,
                             latency: std::time::Duration,
                             span: &Span| {
                                span.record("status", response.status().as_u16());
                                span.record("latency_ms", latency.as_millis() as u64);
                                DefaultOnResponse::default().on_response(response, latency, span);
                            },
                        ),
                )
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body)),
        )
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
