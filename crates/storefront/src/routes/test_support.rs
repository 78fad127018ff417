//! Router harness for handler tests.
//!
//! Builds the full route tree over an in-memory session store and a
//! primed catalog. The pool is lazy, so any handler that reaches the
//! database fails instead of hanging on a connection.

use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use cafe_rencontre_core::{Product, ProductId};

use crate::config::StorefrontConfig;
use crate::middleware::session::session_layer;
use crate::state::AppState;

pub fn menu() -> Vec<Product> {
    [
        (1, "Spanish Latte", "hot, creamy"),
        (2, "Iced Americano", "iced, bold"),
        (3, "Caramel Macchiato", "hot, sweet"),
    ]
    .into_iter()
    .map(|(id, name, description)| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::from(49),
        image: None,
    })
    .collect()
}

pub fn config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/cafe_rencontre_test"),
        host: Ipv4Addr::LOCALHOST.into(),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("k3Jx9!pQ2@vL7#mN4$rT8%wZ1^yB6&cD"),
        catalog_cache_ttl: Duration::from_secs(300),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// One browser: a router plus the session cookie it was last given.
pub struct TestApp {
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    #[allow(clippy::unwrap_used)]
    pub async fn new() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://localhost/cafe_rencontre_test")
            .unwrap();
        let state = AppState::new(config(), pool);
        state.catalog().prime(menu()).await;

        let router = super::routes()
            .layer(session_layer(MemoryStore::default(), false))
            .with_state(state);

        Self {
            router,
            cookie: Mutex::new(None),
        }
    }

    /// Send a request and decode a JSON body (`Null` when empty or not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = self.send_raw(request).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Send a request and return the raw body.
    #[allow(clippy::unwrap_used)]
    pub async fn send_raw(&self, mut request: Request<Body>) -> (StatusCode, Vec<u8>) {
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            *self.cookie.lock().unwrap() = Some(pair.to_owned());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}

#[allow(clippy::unwrap_used)]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[allow(clippy::unwrap_used)]
pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
