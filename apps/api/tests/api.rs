use reqwest::StatusCode;
use serde_json::{json, Value};

use sweetshop_api::{build_app, ApiConfig, AppState};
use sweetshop_db::{Database, DbConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig {
            jwt_secret: "test-secret".to_string(),
            ..ApiConfig::default()
        })
        .await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        let app = build_app(AppState::new(config, db));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(client: &reqwest::Client, srv: &TestServer, email: &str) -> Value {
    let res = client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

fn token(auth: &Value) -> String {
    auth["token"].as_str().unwrap().to_string()
}

async fn create_item(
    client: &reqwest::Client,
    srv: &TestServer,
    admin: &str,
    body: Value,
) -> Value {
    let res = client
        .post(srv.url("/api/sweets"))
        .bearer_auth(admin)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_reports_database() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn shop_scenario() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = register(&client, &srv, "a@x.com").await;
    let b = register(&client, &srv, "b@x.com").await;
    assert_eq!(a["user"]["role"], "ADMIN");
    assert_eq!(b["user"]["role"], "USER");
    assert_eq!(a["expiresIn"], 3600);

    let admin = token(&a);
    let shopper = token(&b);

    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({ "name": "Chocolate Frog", "category": "Chocolate", "price": 4.0, "quantity": 10 }),
    )
    .await;
    let id = item["id"].as_str().unwrap().to_string();
    assert_eq!(item["price"], 4.0);
    assert!(item["createdAt"].is_string());

    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/purchase")))
        .bearer_auth(&shopper)
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 8);

    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/purchase")))
        .bearer_auth(&shopper)
        .json(&json!({ "quantity": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Insufficient stock"));

    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/restock")))
        .bearer_auth(&admin)
        .json(&json!({ "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 18);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin = token(&register(&client, &srv, "a@x.com").await);
    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({ "name": "Sour Worms", "category": "Gummy", "price": 1.5, "quantity": 100 }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    for path in [
        "/api/sweets".to_string(),
        "/api/sweets/search?name=worm".to_string(),
        format!("/api/sweets/{id}"),
    ] {
        let res = client.get(srv.url(&path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn mutations_without_token_are_401() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let responses = [
        client.post(srv.url("/api/sweets")).json(&json!({})),
        client.put(srv.url("/api/sweets/some-id")).json(&json!({})),
        client.delete(srv.url("/api/sweets/some-id")),
        client.post(srv.url("/api/sweets/some-id/purchase")).json(&json!({})),
        client.post(srv.url("/api/sweets/some-id/restock")).json(&json!({})),
        client.get(srv.url("/api/auth/me")),
    ];

    for req in responses {
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "No token provided");
    }
}

#[tokio::test]
async fn invalid_token_is_403() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/sweets/some-id/purchase"))
        .bearer_auth("not-a-real-token")
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn standard_user_cannot_manage_items() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin = token(&register(&client, &srv, "a@x.com").await);
    let shopper = token(&register(&client, &srv, "b@x.com").await);
    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({ "name": "Licorice Wands", "category": "Hard Candy", "price": 3.0, "quantity": 5 }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let attempts = [
        client
            .post(srv.url("/api/sweets"))
            .json(&json!({ "name": "X", "category": "Y", "price": 1, "quantity": 1 })),
        client
            .put(srv.url(&format!("/api/sweets/{id}")))
            .json(&json!({ "quantity": 99 })),
        client.delete(srv.url(&format!("/api/sweets/{id}"))),
        client
            .post(srv.url(&format!("/api/sweets/{id}/restock")))
            .json(&json!({ "quantity": 5 })),
    ];

    for req in attempts {
        let res = req.bearer_auth(&shopper).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["message"], "Admins only");
    }

    // Purchase is allowed, and nothing above changed the item.
    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/purchase")))
        .bearer_auth(&shopper)
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 4);
}

#[tokio::test]
async fn search_filters_intersect() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = token(&register(&client, &srv, "a@x.com").await);

    for (name, category, price) in [
        ("Rainbow Lollipop", "Hard Candy", 2.5),
        ("Chocolate Frog", "Chocolate", 4.0),
        ("Chocolate Coins", "Chocolate", 1.5),
        ("Sour Worms", "Gummy", 1.5),
    ] {
        create_item(
            &client,
            &srv,
            &admin,
            json!({ "name": name, "category": category, "price": price, "quantity": 10 }),
        )
        .await;
    }

    async fn names(client: &reqwest::Client, url: String) -> Vec<String> {
        let res = client.get(url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let items: Vec<Value> = res.json().await.unwrap();
        items
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect()
    }

    assert_eq!(
        names(&client, srv.url("/api/sweets/search?name=CHOC")).await,
        vec!["Chocolate Frog", "Chocolate Coins"]
    );
    assert_eq!(
        names(&client, srv.url("/api/sweets/search?category=Gummy")).await,
        vec!["Sour Worms"]
    );
    assert_eq!(
        names(&client, srv.url("/api/sweets/search?name=choc&category=Chocolate&maxPrice=1.5")).await,
        vec!["Chocolate Coins"]
    );
    assert_eq!(
        names(&client, srv.url("/api/sweets/search?minPrice=2.5&maxPrice=4")).await,
        vec!["Rainbow Lollipop", "Chocolate Frog"]
    );
    assert_eq!(names(&client, srv.url("/api/sweets")).await.len(), 4);

    let res = client
        .get(srv.url("/api/sweets/search?minPrice=cheap"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn item_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = token(&register(&client, &srv, "a@x.com").await);

    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({
            "name": "Rainbow Lollipop",
            "category": "Hard Candy",
            "price": 2.5,
            "quantity": 50,
            "imageUrl": "https://example.com/lolly.png"
        }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let res = client
        .put(srv.url(&format!("/api/sweets/{id}")))
        .bearer_auth(&admin)
        .json(&json!({ "price": 2.75, "imageUrl": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["price"], 2.75);
    assert_eq!(updated["name"], "Rainbow Lollipop");
    assert!(updated["imageUrl"].is_null());

    let res = client
        .delete(srv.url(&format!("/api/sweets/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Deleted");

    let res = client
        .get(srv.url(&format!("/api/sweets/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(srv.url(&format!("/api/sweets/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payloads_are_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = token(&register(&client, &srv, "a@x.com").await);

    // Missing price
    let res = client
        .post(srv.url("/api/sweets"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "X", "category": "Y", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "price is required");

    // Malformed JSON
    let res = client
        .post(srv.url("/api/sweets"))
        .bearer_auth(&admin)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({ "name": "Chocolate Frog", "category": "Chocolate", "price": 4, "quantity": 1 }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    for qty in [0, -5] {
        let res = client
            .post(srv.url(&format!("/api/sweets/{id}/restock")))
            .bearer_auth(&admin)
            .json(&json!({ "quantity": qty }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "restock {qty}");
    }

    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/purchase")))
        .bearer_auth(&admin)
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn purchase_without_quantity_buys_one() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = token(&register(&client, &srv, "a@x.com").await);
    let item = create_item(
        &client,
        &srv,
        &admin,
        json!({ "name": "Sour Worms", "category": "Gummy", "price": 1.5, "quantity": 3 }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let res = client
        .post(srv.url(&format!("/api/sweets/{id}/purchase")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 2);
}

#[tokio::test]
async fn login_and_me() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "a@x.com").await;

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let auth: Value = res.json().await.unwrap();

    let res = client
        .get(srv.url("/api/auth/me"))
        .bearer_auth(token(&auth))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["email"], "a@x.com");
    assert_eq!(me["role"], "ADMIN");

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "a@x.com", "password": "nope!!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid password");

    let res = client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn bootstrap_admin_can_be_disabled() {
    let srv = TestServer::spawn_with(ApiConfig {
        jwt_secret: "test-secret".to_string(),
        bootstrap_first_admin: false,
        ..ApiConfig::default()
    })
    .await;
    let client = reqwest::Client::new();

    let first = register(&client, &srv, "a@x.com").await;
    assert_eq!(first["user"]["role"], "USER");
}

#[tokio::test]
async fn oversized_body_rejected() {
    let srv = TestServer::spawn_with(ApiConfig {
        jwt_secret: "test-secret".to_string(),
        max_body_bytes: 1024,
        ..ApiConfig::default()
    })
    .await;
    let client = reqwest::Client::new();
    let admin = token(&register(&client, &srv, "a@x.com").await);

    let image = format!("data:image/png;base64,{}", "A".repeat(4096));
    let res = client
        .post(srv.url("/api/sweets"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Big", "category": "Y", "price": 1, "quantity": 1, "imageUrl": image }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
