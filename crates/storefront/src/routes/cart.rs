//! Cart route handlers.
//!
//! Each request opens the visitor's cart from the session, applies at most
//! one mutation, and flushes it back before responding.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use cafe_rencontre_core::cart::{line_total, unit_price};
use cafe_rencontre_core::{
    CartLine, CartStore, CartTotals, CurrencyCode, Customization, Price, ProductId, Receipt,
};

use super::CurrencyQuery;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{SessionCartStorage, load_cart, save_cart};
use crate::state::AppState;

fn money(amount: rust_decimal::Decimal, currency: CurrencyCode) -> String {
    Price::php(amount).convert_to(currency).display()
}

/// Cart line as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub customization: Option<Customization>,
    /// Caption such as `Medium (16oz), Sugar: 50%, Oat Milk`.
    pub customization_label: Option<String>,
    pub unit_price: String,
    pub line_total: String,
}

impl CartLineView {
    fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            customization: line.customization,
            customization_label: line.customization.as_ref().map(Customization::describe),
            unit_price: money(unit_price(line), currency),
            line_total: money(line_total(line), currency),
        }
    }
}

/// Cart contents and totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub currency: CurrencyCode,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    /// Unformatted peso amounts.
    pub totals: CartTotals,
}

impl CartView {
    fn new(store: &CartStore<SessionCartStorage>, currency: CurrencyCode) -> Self {
        let totals = store.totals();
        let [subtotal, tax, total] = totals.in_currency(currency).map(|p| p.display());
        Self {
            lines: store
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, currency))
                .collect(),
            item_count: store.item_count(),
            currency,
            subtotal,
            tax,
            total,
            totals,
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to 1.
    pub quantity: Option<u32>,
    pub customization: Option<Customization>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    pub customization: Option<Customization>,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub customization: Option<Customization>,
}

/// Display cart.
#[instrument(skip(session))]
pub async fn show(session: Session, Query(query): Query<CurrencyQuery>) -> Result<Json<CartView>> {
    let store = load_cart(&session).await?;
    Ok(Json(CartView::new(&store, query.currency)))
}

/// Get cart item count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let store = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: store.item_count(),
    }))
}

/// Add item to cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut store = load_cart(&session).await?;
    store.add(product, body.quantity.unwrap_or(1), body.customization)?;
    let view = CartView::new(&store, CurrencyCode::PHP);
    save_cart(&session, store).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &body.product_id.to_string())]),
    );
    Ok(Json(view))
}

/// Update a line's quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut store = load_cart(&session).await?;
    store.update_quantity(body.product_id, body.quantity, body.customization.as_ref())?;
    let view = CartView::new(&store, CurrencyCode::PHP);
    save_cart(&session, store).await?;
    Ok(Json(view))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut store = load_cart(&session).await?;
    store.remove(body.product_id, body.customization.as_ref())?;
    let view = CartView::new(&store, CurrencyCode::PHP);
    save_cart(&session, store).await?;
    Ok(Json(view))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut store = load_cart(&session).await?;
    store.clear()?;
    let view = CartView::new(&store, CurrencyCode::PHP);
    save_cart(&session, store).await?;
    Ok(Json(view))
}

// =============================================================================
// Printable receipt
// =============================================================================

/// Receipt line display data for templates.
pub struct ReceiptLineView {
    pub name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
    pub customization: Option<String>,
}

/// Receipt display data for templates.
pub struct ReceiptView {
    pub order_number: String,
    pub ordered_at: String,
    pub lines: Vec<ReceiptLineView>,
    pub item_count: i64,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl ReceiptView {
    #[must_use]
    pub fn new(receipt: &Receipt, currency: CurrencyCode) -> Self {
        let [subtotal, tax, total] = receipt.totals.in_currency(currency).map(|p| p.display());
        Self {
            order_number: receipt.order_number.clone(),
            ordered_at: receipt.ordered_at.format("%B %-d, %Y %-I:%M %p").to_string(),
            lines: receipt
                .lines
                .iter()
                .map(|line| ReceiptLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: money(line.unit_price, currency),
                    line_total: money(line.line_total, currency),
                    customization: line.customization.clone(),
                })
                .collect(),
            item_count: receipt.item_count(),
            subtotal,
            tax,
            total,
        }
    }
}

/// Printable receipt template.
#[derive(Template, WebTemplate)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub receipt: ReceiptView,
}

/// Printable preview of the receipt the current cart would produce.
#[instrument(skip(session))]
pub async fn receipt(
    session: Session,
    Query(query): Query<CurrencyQuery>,
) -> Result<ReceiptTemplate> {
    let store = load_cart(&session).await?;
    let receipt = Receipt::from_lines(store.lines(), Utc::now());
    Ok(ReceiptTemplate {
        receipt: ReceiptView::new(&receipt, query.currency),
    })
}
