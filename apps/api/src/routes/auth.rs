//! Registration, login and identity routes.

use axum::{extract::State, http::StatusCode, Json};
use sweetshop_core::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidJson;
use crate::state::AppState;

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth().register(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(state.auth().login(body).await?))
}

/// `GET /api/auth/me`
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<PublicUser>> {
    Ok(Json(state.auth().current_user(&user).await?))
}
