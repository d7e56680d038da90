//! Request authentication middleware.
//!
//! ```text
//! request ──► require_auth ──► AuthUser in extensions ──► require_admin ──► handler
//!                 │                                            │
//!                 ├── no bearer token    → 401                 └── role != ADMIN → 403
//!                 └── token rejected     → 403
//! ```
//!
//! Both layers are attached with `route_layer`, so they only ever run for
//! routes of the router they are attached to.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use sweetshop_core::Role;

use crate::auth::{extract_bearer_token, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Verifies the bearer credential and stores the identity on the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).ok_or(ApiError::MissingToken)?;
    let user = state.auth().verify(token)?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Lets the request through only for admins. Runs after [`require_auth`].
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(ApiError::MissingToken)?;
    state.auth().require_role(user, Role::Admin)?;

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    extract_bearer_token(header.to_str().ok()?)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::MissingToken)
    }
}
