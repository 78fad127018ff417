//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Database readiness check
//!
//! # Products
//! GET  /products               - Product listing (?currency=php|usd)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session-backed JSON)
//! GET  /cart                   - Cart lines and totals (?currency=php|usd)
//! GET  /cart/count             - Total item count for the badge
//! POST /cart/add               - Add a product, merging equal lines
//! POST /cart/update            - Set a line's quantity (0 or less removes it)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/receipt           - Printable receipt preview (HTML)
//!
//! # Orders (rate limited)
//! POST /checkout               - Buy the whole cart in one transaction
//! POST /checkout/item          - Buy a single product, cart untouched
//! POST /orders                 - Create one order from flat fields
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use cafe_rencontre_core::CurrencyCode;

use crate::state::AppState;

/// `?currency=` query parameter; pesos when absent.
#[derive(Debug, Default, Deserialize)]
pub struct CurrencyQuery {
    #[serde(default)]
    pub currency: CurrencyCode,
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/receipt", get(cart::receipt))
}

/// Create the order-creating routes router.
///
/// The binary wraps this router in the checkout rate limiter.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::checkout))
        .route("/checkout/item", post(checkout::buy_now))
        .route("/orders", post(orders::create))
}

/// Create the browsing routes router (catalog and cart).
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Every storefront route, without rate limiting.
pub fn routes() -> Router<AppState> {
    browse_routes().merge(order_routes())
}
