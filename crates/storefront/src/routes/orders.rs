//! Direct order creation.

use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use cafe_rencontre_core::OrderDraft;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::models::Order;
use crate::state::AppState;

/// Create one pending order from flat fields.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Order>)> {
    draft.validate()?;

    let order = OrderRepository::new(state.pool()).create(&draft).await?;
    info!(order_id = %order.id, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{TestApp, post_json};

    #[tokio::test]
    async fn test_mismatched_total_is_400() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(post_json(
                "/orders",
                &json!({
                    "product_name": "Spanish Latte",
                    "quantity": 2,
                    "price": 49,
                    "total_amount": 100,
                }),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("does not equal"));
    }

    #[tokio::test]
    async fn test_missing_name_is_400() {
        let app = TestApp::new().await;
        let (status, _) = app
            .send(post_json(
                "/orders",
                &json!({"product_name": "", "quantity": 1, "price": 49, "total_amount": 49}),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overflowing_price_is_400() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(post_json(
                "/orders",
                &json!({"product_name": "Latte", "quantity": 2, "price": 5e28, "total_amount": 1}),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "amount exceeds 99999999.99");
    }
}
