//! Order queries and status updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument};

use cafe_rencontre_core::{Customization, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderCounts};

/// Columns selected for every order read, joined to its checkout.
const ORDER_COLUMNS: &str = r#"
    o.id, c.order_number, o.user_id, o.product_name, o.description, o.product_image,
    o.quantity, o.price, o.total_amount, o.status, o.customer_notes, o.customization,
    o.ordered_at, o.updated_at
    FROM cafe."order" o
    LEFT JOIN cafe.checkout c ON c.idempotency_key = o.checkout_key
"#;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    order_number: Option<String>,
    user_id: Option<UserId>,
    product_name: String,
    description: String,
    product_image: Option<String>,
    quantity: i32,
    price: Decimal,
    total_amount: Decimal,
    status: OrderStatus,
    customer_notes: Option<String>,
    customization: Option<Json<serde_json::Value>>,
    ordered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let customization = row
            .customization
            .map(|Json(value)| serde_json::from_value::<Customization>(value))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid customization on order {}: {e}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: row.id,
            order_number: row.order_number,
            user_id: row.user_id,
            product_name: row.product_name,
            description: row.description,
            product_image: row.product_image,
            quantity: row.quantity,
            price: row.price,
            total_amount: row.total_amount,
            status: row.status,
            customer_notes: row.customer_notes,
            customization_label: customization.as_ref().map(Customization::describe),
            customization,
            ordered_at: row.ordered_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for back-office order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders, latest first, optionally limited to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored customization is invalid.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} WHERE ($1::cafe.order_status IS NULL OR o.status = $1) \
             ORDER BY o.ordered_at DESC, o.id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Number of orders per status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<OrderCounts, RepositoryError> {
        let rows: Vec<(OrderStatus, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*)
            FROM cafe."order"
            GROUP BY status
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(OrderCounts::from_rows(rows))
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored customization is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} WHERE o.id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Move an order to `next`, optionally replacing its notes.
    ///
    /// The transition is checked against the stored status and the update
    /// only applies if that status is still current, so two staff members
    /// acting at once cannot both move the same pending order. Blank notes
    /// clear the field; `None` leaves it as is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist,
    /// `RepositoryError::InvalidTransition` if the stored status forbids the
    /// change, or `RepositoryError::Conflict` if the status changed between
    /// the read and the write.
    #[instrument(skip(self, notes))]
    pub async fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, RepositoryError> {
        let current: OrderStatus =
            sqlx::query_scalar(r#"SELECT status FROM cafe."order" WHERE id = $1"#)
                .bind(id)
                .fetch_optional(self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        current.transition(next)?;

        let updated: Option<OrderId> = sqlx::query_scalar(
            r#"
            UPDATE cafe."order"
            SET status = $2,
                customer_notes = CASE
                    WHEN $3::text IS NULL THEN customer_notes
                    ELSE NULLIF(btrim($3), '')
                END,
                updated_at = now()
            WHERE id = $1 AND status = $4
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(notes)
        .bind(current)
        .fetch_optional(self.pool)
        .await?;

        if updated.is_none() {
            return Err(RepositoryError::Conflict(format!(
                "order {id} changed status while being updated"
            )));
        }

        info!(order_id = %id, from = %current, to = %next, "Order status updated");
        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }
}
