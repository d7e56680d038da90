//! Shared fixtures: a real API on an ephemeral port and a dead address.

#![allow(dead_code)]

use sweetshop_api::{build_app, ApiConfig, AppState};
use sweetshop_client::ClientConfig;
use sweetshop_db::{Database, DbConfig};

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let config = ApiConfig {
            jwt_secret: "client-test-secret".to_string(),
            ..ApiConfig::default()
        };
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        let app = build_app(AppState::new(config, db));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_url(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Config pointing at a port nothing listens on.
pub fn unreachable_config() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut config = ClientConfig::with_url(format!("http://127.0.0.1:{port}"));
    config.api.timeout_secs = 2;
    config
}
