#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use auth::Authenticator;
use auth::SessionClaims;
use auth::TokenSigner;
use chrono::Duration;
use rust_decimal::Decimal;
use serde_json::json;
use serde_json::Value;
use shop_service::catalog::models::CatalogItem;
use shop_service::catalog::models::ItemId;
use shop_service::config::StorageBackend;
use shop_service::inbound::http::router::create_router;
use shop_service::inbound::http::router::AppState;
use shop_service::outbound::repositories::InMemoryStore;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub api_client: reqwest::Client,
    pub signer: TokenSigner,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_items(Vec::new()).await
    }

    /// Spawn with the catalog seeded with `items`
    pub async fn spawn_with_items(items: Vec<CatalogItem>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryStore::with_items(items));
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));

        let state = AppState::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            authenticator,
            StorageBackend::Memory,
        );
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
            signer: TokenSigner::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn logout(&self, token: &str) -> reqwest::Response {
        self.post_authenticated("/api/users/logout", token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and open its session, returning the token
    pub async fn signed_in(&self, username: &str, password: &str) -> String {
        let response = self.register(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Login response carries a token")
            .to_string()
    }

    pub async fn add_to_cart(&self, token: &str, item_id: &ItemId, quantity: i64) -> reqwest::Response {
        self.post_authenticated("/api/carts", token)
            .json(&json!({ "item_id": item_id.to_string(), "quantity": quantity }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Token correctly signed for `subject` but never recorded as a session
    pub fn forge_token(&self, subject: &str, lifetime: Duration) -> String {
        self.signer
            .sign(&SessionClaims::issue(subject, lifetime))
            .expect("Failed to sign token")
    }
}

pub fn catalog_item(name: &str, price: &str) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(),
        name: name.to_string(),
        price: decimal(price),
        stock: 100,
    }
}

pub fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).expect("Valid decimal literal")
}

/// Money fields are serialized as strings
pub fn money(value: &Value) -> Decimal {
    decimal(value.as_str().expect("Money is a string"))
}
