//! Cross-crate tests for Cafe Rencontre.
//!
//! Both binaries' routers are built here over in-memory sessions and a lazy
//! pool, so tests run without a database. Anything that needs one fails
//! within a fraction of a second instead of hanging.
//!
//! # Test Files
//!
//! - `cart_flow` - cart store, pricing and checkout requests in `core`
//! - `order_status` - the order state machine as both binaries see it
//! - `storefront_cart_api` - the session cart over HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::post,
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use cafe_rencontre_admin::config::AdminConfig;
use cafe_rencontre_admin::models::{CurrentAdmin, UserDirectory};
use cafe_rencontre_core::{AdminRole, AdminUserId, Email, Product, ProductId};
use cafe_rencontre_storefront::config::StorefrontConfig;

const TEST_DATABASE_URL: &str = "postgres://localhost/cafe_rencontre_test";

/// A few drinks from the opening menu, all at 49 pesos.
#[must_use]
pub fn menu() -> Vec<Product> {
    [
        (1, "Spanish Latte", "hot, creamy", "spanish-latte.png"),
        (4, "Americano", "hot, bold", "americano.png"),
        (10, "Iced Americano", "iced, bold", "iced-americano.png"),
    ]
    .into_iter()
    .map(|(id, name, description, image)| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::from(49),
        image: Some(image.to_owned()),
    })
    .collect()
}

fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(TEST_DATABASE_URL)
        .unwrap()
}

/// One browser session against one router.
pub struct Browser {
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl Browser {
    fn new(router: Router) -> Self {
        Self {
            router,
            cookie: Mutex::new(None),
        }
    }

    /// The storefront with [`menu`] already in its catalog cache.
    pub async fn storefront() -> Self {
        use cafe_rencontre_storefront::{middleware::session::session_layer, routes, state};

        let config = StorefrontConfig {
            database_url: SecretString::from(TEST_DATABASE_URL),
            host: Ipv4Addr::LOCALHOST.into(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: SecretString::from("k3Jx9!pQ2@vL7#mN4$rT8%wZ1^yB6&cD"),
            catalog_cache_ttl: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = state::AppState::new(config, lazy_pool());
        state.catalog().prime(menu()).await;

        Self::new(
            routes::routes()
                .layer(session_layer(MemoryStore::default(), false))
                .with_state(state),
        )
    }

    /// The back-office, plus `POST /test/login` taking a [`CurrentAdmin`].
    #[must_use]
    pub fn admin() -> Self {
        use cafe_rencontre_admin::{middleware::session::session_layer, routes, state};

        async fn test_login(session: Session, Json(admin): Json<CurrentAdmin>) -> StatusCode {
            cafe_rencontre_admin::middleware::auth::set_current_admin(&session, &admin)
                .await
                .map_or(StatusCode::INTERNAL_SERVER_ERROR, |()| StatusCode::NO_CONTENT)
        }

        let config = AdminConfig {
            database_url: SecretString::from(TEST_DATABASE_URL),
            host: Ipv4Addr::LOCALHOST.into(),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            session_secret: SecretString::from("q8Wv!3nR#t6Yp@1Lm$4Zk%7Hs^2Jd&9F"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = state::AppState::new(config, lazy_pool(), UserDirectory::demo().unwrap());

        Self::new(
            routes::routes()
                .route("/test/login", post(test_login))
                .layer(session_layer(MemoryStore::default(), false))
                .with_state(state),
        )
    }

    /// Log in to the back-office as `role`.
    pub async fn login_as(&self, role: AdminRole) {
        let admin = CurrentAdmin {
            id: AdminUserId::new(7),
            email: Email::parse("staff@caferencontre.ph").unwrap(),
            name: "Counter Staff".to_owned(),
            role,
        };
        let (status, _) = self
            .send(json_request(
                "POST",
                "/test/login",
                &serde_json::to_value(admin).unwrap(),
            ))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    /// Send a request, keeping the session cookie, and decode the JSON body
    /// (`Null` when empty or not JSON).
    pub async fn send(&self, mut request: Request<Body>) -> (StatusCode, serde_json::Value) {
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
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[must_use]
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
