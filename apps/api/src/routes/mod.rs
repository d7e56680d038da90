//! HTTP routes, one file per area.
//!
//! ## Route Table (mounted under `/api`)
//! ```text
//! ┌──────────────────────────────────────────────┬────────────┐
//! │ Route                                        │ Access     │
//! ├──────────────────────────────────────────────┼────────────┤
//! │ POST   /auth/register                        │ public     │
//! │ POST   /auth/login                           │ public     │
//! │ GET    /sweets                               │ public     │
//! │ GET    /sweets/search                        │ public     │
//! │ GET    /sweets/{id}                          │ public     │
//! │ GET    /auth/me                              │ signed in  │
//! │ POST   /sweets/{id}/purchase                 │ signed in  │
//! │ POST   /sweets                               │ admin      │
//! │ PUT    /sweets/{id}                          │ admin      │
//! │ DELETE /sweets/{id}                          │ admin      │
//! │ POST   /sweets/{id}/restock                  │ admin      │
//! └──────────────────────────────────────────────┴────────────┘
//! ```
//!
//! The public router is built first and the auth layers are attached with
//! `route_layer` to the protected routers only. Merging keeps each method's
//! layers separate, so `GET /sweets` stays public while `POST /sweets`
//! on the same path requires an admin.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod items;

/// Router for everything under `/api`.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/sweets", get(items::list_items))
        .route("/sweets/search", get(items::search_items))
        .route("/sweets/{id}", get(items::get_item));

    let admin = Router::new()
        .route("/sweets", post(items::create_item))
        .route("/sweets/{id}", put(items::update_item).delete(items::delete_item))
        .route("/sweets/{id}/restock", post(items::restock_item))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/sweets/{id}/purchase", post(items::purchase_item))
        .merge(admin)
        .route_layer(from_fn_with_state(state, require_auth));

    public.merge(protected)
}
