//! # Remote Source
//!
//! [`InventorySource`] backed by the SweetShop HTTP API.
//!
//! ## Request Flow
//! ```text
//! RemoteSource::purchase(id, 2)
//!      │
//!      ▼
//! POST {base}/api/sweets/{id}/purchase   Authorization: Bearer <token>
//!      │                                  {"quantity": 2}
//!      ├── 2xx            → Item
//!      ├── 4xx/5xx        → ClientError::Api { status, code, message }
//!      └── no connection  → ClientError::Network
//! ```

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sweetshop_core::{
    Item, ItemDraft, ItemFilter, ItemPatch, MessageResponse, QuantityRequest,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::source::{InventorySource, SourceKind};

// =============================================================================
// HTTP Plumbing
// =============================================================================

/// reqwest client bound to one server root.
#[derive(Debug, Clone)]
pub(crate) struct Http {
    client: reqwest::Client,
    base_url: String,
}

impl Http {
    pub(crate) fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Http {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends and decodes a JSON body, turning error statuses into `Api`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let res = req.send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let err = ClientError::from_response(status, &body);
            debug!(status = status.as_u16(), error = %err, "API returned error");
            return Err(err);
        }

        Ok(res.json::<T>().await?)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

// =============================================================================
// Remote Source
// =============================================================================

#[derive(Debug)]
pub struct RemoteSource {
    http: Http,
    token: RwLock<Option<String>>,
}

impl RemoteSource {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(RemoteSource {
            http: Http::new(config)?,
            token: RwLock::new(None),
        })
    }

    /// Bearer token sent with every request from now on (`None` to sign out).
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Whether requests currently carry a bearer token.
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `GET /health`. `Ok` only when the server and its database are up.
    pub async fn health(&self) -> ClientResult<()> {
        let _: serde_json::Value = self
            .http
            .send(self.http.request(Method::GET, "/health"))
            .await
            .inspect_err(|e| warn!(url = %self.http.base_url(), error = %e, "Health probe failed"))?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, path);
        match self.token.read().await.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Query pairs for `GET /api/sweets/search`.
fn search_query(filter: &ItemFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(name) = &filter.name {
        query.push(("name", name.clone()));
    }
    if let Some(category) = &filter.category {
        query.push(("category", category.clone()));
    }
    if let Some(min) = filter.min_price {
        query.push(("minPrice", min.to_decimal().to_string()));
    }
    if let Some(max) = filter.max_price {
        query.push(("maxPrice", max.to_decimal().to_string()));
    }
    query
}

#[async_trait]
impl InventorySource for RemoteSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    async fn list(&self, filter: &ItemFilter) -> ClientResult<Vec<Item>> {
        let filter = filter.clone().normalized();
        let req = if filter.is_empty() {
            self.authed(Method::GET, "/api/sweets").await
        } else {
            self.authed(Method::GET, "/api/sweets/search")
                .await
                .query(&search_query(&filter))
        };
        self.http.send(req).await
    }

    async fn create(&self, draft: ItemDraft) -> ClientResult<Item> {
        let req = self.authed(Method::POST, "/api/sweets").await.json(&draft);
        self.http.send(req).await
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> ClientResult<Item> {
        let req = self
            .authed(Method::PUT, &format!("/api/sweets/{id}"))
            .await
            .json(&patch);
        self.http.send(req).await
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let req = self.authed(Method::DELETE, &format!("/api/sweets/{id}")).await;
        let _: MessageResponse = self.http.send(req).await?;
        Ok(())
    }

    async fn purchase(&self, id: &str, qty: i64) -> ClientResult<Item> {
        let req = self
            .authed(Method::POST, &format!("/api/sweets/{id}/purchase"))
            .await
            .json(&QuantityRequest::new(qty));
        self.http.send(req).await
    }

    async fn restock(&self, id: &str, qty: i64) -> ClientResult<Item> {
        let req = self
            .authed(Method::POST, &format!("/api/sweets/{id}/restock"))
            .await
            .json(&QuantityRequest::new(qty));
        self.http.send(req).await
    }
}
