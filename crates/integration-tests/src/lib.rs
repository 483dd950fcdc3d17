//! Test harness for the storefront HTTP API.
//!
//! Spawns the real router on an ephemeral port, backed by in-memory stores
//! and an in-memory session store, and drives it with a cookie-aware
//! reqwest client. No database or external service is required.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;

use secrecy::SecretString;
use serde_json::{Value, json};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use villagecraft_storefront::config::StorefrontConfig;
use villagecraft_storefront::routes;
use villagecraft_storefront::state::AppState;

/// A running storefront instance plus a cookie-holding client.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a storefront with in-memory stores and the seed catalog.
    pub async fn spawn() -> Self {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::in_memory(config);

        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_name("vc_session")
            .with_secure(false)
            .with_http_only(true);

        let app = routes::routes().layer(session_layer).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .no_proxy()
            .build()
            .expect("build http client");

        Self { addr, client }
    }

    /// Absolute URL for a path on this instance.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Register an account; returns the parsed response body.
    pub async fn register(&self, name: &str, email: &str, password: &str, role: &str) -> Value {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "type": role,
            }))
            .send()
            .await
            .expect("register request");
        response.json().await.expect("register response body")
    }

    /// Log in; the session cookie lands in this app's client.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .expect("login request");
        assert!(
            response.status().is_success(),
            "login failed: {}",
            response.status()
        );
        response.json().await.expect("login response body")
    }

    /// Register and log in a fresh buyer account.
    pub async fn login_as(&self, email: &str) {
        self.register("Test Buyer", email, "claypots123", "buyer")
            .await;
        self.login(email, "claypots123").await;
    }
}
