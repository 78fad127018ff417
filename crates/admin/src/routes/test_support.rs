//! Router harness for handler tests.
//!
//! Sessions live in memory and the pool is lazy, so handlers that reach the
//! database fail fast. `login_as` goes through a test-only route that writes
//! the session the same way the login handler does.

use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::post,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use cafe_rencontre_core::{AdminUserId, Email};

use crate::config::AdminConfig;
use crate::middleware::auth::set_current_admin;
use crate::middleware::session::session_layer;
use crate::models::{AdminRole, CurrentAdmin, UserDirectory};
use crate::state::AppState;

pub fn config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/cafe_rencontre_test"),
        host: Ipv4Addr::LOCALHOST.into(),
        port: 3001,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("q8Wv!3nR#t6Yp@1Lm$4Zk%7Hs^2Jd&9F"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

async fn test_login(session: Session, Json(admin): Json<CurrentAdmin>) -> StatusCode {
    match set_current_admin(&session, &admin).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// One browser: a router plus the session cookie it was last given.
pub struct TestApp {
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://localhost/cafe_rencontre_test")
            .unwrap();
        let state = AppState::new(config(), pool, UserDirectory::demo().unwrap());

        let router = super::routes()
            .route("/test/login", post(test_login))
            .layer(session_layer(MemoryStore::default(), false))
            .with_state(state);

        Self {
            router,
            cookie: Mutex::new(None),
        }
    }

    /// Start a session for an admin with the given role.
    #[allow(clippy::unwrap_used)]
    pub async fn login_as(&self, role: AdminRole) {
        let admin = CurrentAdmin {
            id: AdminUserId::new(1),
            email: Email::parse(&format!("{role}@caferencontre.ph")).unwrap(),
            name: "Test Admin".to_owned(),
            role,
        };
        let body = serde_json::to_value(&admin).unwrap();
        let (status, _) = self.send(post_json("/test/login", &body)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
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
