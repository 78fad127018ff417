//! Order queue and status changes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cafe_rencontre_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, RequireOrderManager};
use crate::models::{Order, OrderCounts};
use crate::state::AppState;

/// Longest accepted staff note.
const MAX_NOTES_LENGTH: usize = 1000;

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Order list with the counts shown on the status tabs.
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub counts: OrderCounts,
}

/// Body of `PATCH /orders/{id}`.
///
/// A missing or `null` `customer_notes` keeps the current notes; an empty
/// string clears them.
#[derive(Debug, Deserialize)]
pub struct UpdateOrder {
    pub status: OrderStatus,
    #[serde(default)]
    pub customer_notes: Option<String>,
}

/// Orders, latest first.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<OrderList>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list(filter.status).await?;
    let counts = repo.counts().await?;
    Ok(Json(OrderList { orders, counts }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Move an order out of `pending`, or edit the notes of one.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id, status = %body.status))]
pub async fn update(
    State(state): State<AppState>,
    RequireOrderManager(admin): RequireOrderManager,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateOrder>,
) -> Result<Json<Order>> {
    if body
        .customer_notes
        .as_deref()
        .is_some_and(|notes| notes.chars().count() > MAX_NOTES_LENGTH)
    {
        return Err(AppError::BadRequest(format!(
            "customer_notes must be at most {MAX_NOTES_LENGTH} characters"
        )));
    }

    let order = OrderRepository::new(state.pool())
        .update_status(id, body.status, body.customer_notes.as_deref())
        .await?;
    Ok(Json(order))
}
