//! Account calls against the API: register, login, current user.

use reqwest::Method;
use sweetshop_core::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::remote::Http;

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Http,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(AuthClient {
            http: Http::new(config)?,
        })
    }

    /// `POST /api/auth/register`
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> ClientResult<AuthResponse> {
        let body = RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            name: name.map(str::to_string),
        };
        let auth: AuthResponse = self
            .http
            .send(self.http.request(Method::POST, "/api/auth/register").json(&body))
            .await?;

        info!(id = %auth.user.id, role = %auth.user.role, "Registered");
        Ok(auth)
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let auth: AuthResponse = self
            .http
            .send(self.http.request(Method::POST, "/api/auth/login").json(&body))
            .await?;

        info!(id = %auth.user.id, "Logged in");
        Ok(auth)
    }

    /// `GET /api/auth/me`
    pub async fn me(&self, token: &str) -> ClientResult<PublicUser> {
        self.http
            .send(self.http.request(Method::GET, "/api/auth/me").bearer_auth(token))
            .await
    }
}
