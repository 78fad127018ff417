//! Checkout route handlers.
//!
//! Both routes write through [`OrderRepository::checkout`], which stores
//! every line in one transaction keyed by an idempotency key. The cart is
//! only cleared after that transaction commits, so a failed checkout leaves
//! it intact for a retry.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};
use uuid::Uuid;

use cafe_rencontre_core::{
    CartError, CartLine, CheckoutRequest, Customization, MAX_LINE_QUANTITY, OrderId, ProductId,
    Receipt,
};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::Checkout;
use crate::services::{load_cart, save_cart};
use crate::state::AppState;

/// Whole-cart checkout request.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutBody {
    /// Client-chosen key; reuse it when retrying. Generated when absent.
    pub idempotency_key: Option<Uuid>,
    pub notes: Option<String>,
}

/// Single-item "buy now" request.
#[derive(Debug, Deserialize)]
pub struct BuyNowBody {
    pub product_id: ProductId,
    pub quantity: u32,
    pub customization: Option<Customization>,
    pub notes: Option<String>,
    pub idempotency_key: Option<Uuid>,
}

/// Result of a checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_number: String,
    pub order_ids: Vec<OrderId>,
    /// True when this key was already used and nothing new was stored.
    pub replayed: bool,
    pub receipt: Receipt,
}

impl From<Checkout> for CheckoutResponse {
    fn from(checkout: Checkout) -> Self {
        Self {
            receipt: checkout.receipt(),
            order_ids: checkout.orders.iter().map(|o| o.id).collect(),
            order_number: checkout.order_number,
            replayed: checkout.replayed,
        }
    }
}

/// Buy everything in the cart.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>> {
    let repo = OrderRepository::new(state.pool());

    // A retry after a lost response: the cart may already be empty.
    if let Some(key) = body.idempotency_key
        && let Some(existing) = repo.find_checkout(key).await?
    {
        info!(order_number = %existing.order_number, "Replayed checkout");
        return Ok(Json(existing.into()));
    }

    let mut store = load_cart(&session).await?;
    let request = CheckoutRequest::from_cart(
        store.cart(),
        body.idempotency_key.unwrap_or_else(Uuid::new_v4),
        body.notes,
        Utc::now(),
    )?;

    let checkout = repo.checkout(&request).await?;

    if !checkout.replayed {
        store.clear()?;
        save_cart(&session, store).await?;
    }

    info!(
        order_number = %checkout.order_number,
        orders = checkout.orders.len(),
        "Checkout complete"
    );
    Ok(Json(checkout.into()))
}

/// Buy one product without touching the cart.
#[instrument(skip(state))]
pub async fn buy_now(
    State(state): State<AppState>,
    Json(body): Json<BuyNowBody>,
) -> Result<Json<CheckoutResponse>> {
    if body.quantity == 0 || body.quantity > MAX_LINE_QUANTITY {
        return Err(CartError::InvalidQuantity.into());
    }

    let product = state
        .catalog()
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let line = CartLine::new(product, body.quantity, body.customization);
    let request = CheckoutRequest::from_lines(
        std::slice::from_ref(&line),
        body.idempotency_key.unwrap_or_else(Uuid::new_v4),
        body.notes,
        Utc::now(),
    )?;

    let checkout = OrderRepository::new(state.pool())
        .checkout(&request)
        .await?;

    info!(order_number = %checkout.order_number, "Buy-now order placed");
    Ok(Json(checkout.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{TestApp, get, post_json};

    #[tokio::test]
    async fn test_empty_cart_cannot_check_out() {
        let app = TestApp::new().await;
        let (status, body) = app.send(post_json("/checkout", &json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cannot check out an empty cart");
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let app = TestApp::new().await;
        app.send(post_json("/cart/add", &json!({"product_id": 1, "quantity": 2})))
            .await;

        // No database behind the test pool, so the transaction cannot start.
        let (status, _) = app
            .send(post_json("/checkout", &json!({"notes": "for pickup"})))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = app.send(get("/cart/count")).await;
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_buy_now_zero_quantity_is_400() {
        let app = TestApp::new().await;
        let (status, _) = app
            .send(post_json("/checkout/item", &json!({"product_id": 1, "quantity": 0})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_buy_now_over_line_limit_is_400() {
        let app = TestApp::new().await;
        for quantity in [100_u64, 4_294_967_295] {
            let (status, body) = app
                .send(post_json(
                    "/checkout/item",
                    &json!({"product_id": 1, "quantity": quantity}),
                ))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "quantity must be between 1 and 99");
        }
    }

    #[tokio::test]
    async fn test_oversized_cart_cannot_reach_checkout() {
        let app = TestApp::new().await;
        let (status, _) = app
            .send(post_json("/cart/add", &json!({"product_id": 1, "quantity": 500})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.send(post_json("/checkout", &json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cannot check out an empty cart");
    }

    #[tokio::test]
    async fn test_buy_now_unknown_product_is_404() {
        let app = TestApp::new().await;
        let (status, _) = app
            .send(post_json("/checkout/item", &json!({"product_id": 404, "quantity": 1})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
