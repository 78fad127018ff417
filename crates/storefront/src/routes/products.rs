//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use cafe_rencontre_core::{CurrencyCode, Product, ProductId};

use super::CurrencyQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product as shown on the menu.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Base price in pesos.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Base price formatted in the requested currency.
    pub display_price: String,
    pub image: Option<String>,
    pub iced: bool,
}

impl ProductView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            display_price: product.base_price().convert_to(currency).display(),
            image: product.image.clone(),
            iced: product.is_iced(),
        }
    }
}

/// List the menu.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.catalog().all().await?;
    Ok(Json(
        products
            .iter()
            .map(|p| ProductView::new(p, query.currency))
            .collect(),
    ))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ProductView::new(&product, query.currency)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{TestApp, get};

    #[tokio::test]
    async fn test_index_lists_primed_catalog() {
        let app = TestApp::new().await;
        let (status, body) = app.send(get("/products")).await;

        assert_eq!(status, StatusCode::OK);
        let products = body.as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["name"], "Spanish Latte");
        assert_eq!(products[0]["display_price"], "₱49.00");
        assert_eq!(products[1]["iced"], true);
    }

    #[tokio::test]
    async fn test_show_in_dollars() {
        let app = TestApp::new().await;
        let (status, body) = app.send(get("/products/1?currency=usd")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_price"], "$0.88");
    }

    #[tokio::test]
    async fn test_unknown_product_is_404() {
        let app = TestApp::new().await;
        let (status, _) = app.send(get("/products/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
