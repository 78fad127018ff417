//! Order repository.
//!
//! Every write of order rows goes through a transaction. A checkout claims
//! its idempotency key in `cafe.checkout` first; if the key is already
//! taken the transaction is abandoned and the stored orders are returned.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use cafe_rencontre_core::{CheckoutRequest, Customization, OrderDraft, OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Checkout, Order};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
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
            product_name: row.product_name,
            description: row.description,
            product_image: row.product_image,
            quantity: row.quantity,
            price: row.price,
            total_amount: row.total_amount,
            status: row.status,
            customer_notes: row.customer_notes,
            customization,
            ordered_at: row.ordered_at,
        })
    }
}

/// Repository for placing orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write every line of `request` in one transaction.
    ///
    /// Replaying an idempotency key returns the orders written the first
    /// time, with `replayed` set, and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; in that
    /// case no order from the request is stored.
    #[instrument(
        skip(self, request),
        fields(idempotency_key = %request.idempotency_key, lines = request.lines.len())
    )]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<Checkout, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<(String, DateTime<Utc>)> = sqlx::query_as(
            r"
            INSERT INTO cafe.checkout (idempotency_key, order_number, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING order_number, created_at
            ",
        )
        .bind(request.idempotency_key)
        .bind(request.order_number())
        .bind(request.ordered_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((order_number, ordered_at)) = claimed else {
            tx.rollback().await?;
            info!("Idempotency key already used, returning stored checkout");
            return self
                .find_checkout(request.idempotency_key)
                .await?
                .ok_or(RepositoryError::NotFound);
        };

        let mut orders = Vec::with_capacity(request.lines.len());
        for draft in &request.lines {
            orders.push(insert(&mut tx, draft, Some(request.idempotency_key)).await?);
        }

        tx.commit().await?;
        info!(order_number = %order_number, "Checkout committed");

        Ok(Checkout {
            order_number,
            ordered_at,
            orders,
            replayed: false,
        })
    }

    /// A previously committed checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored customization is invalid.
    pub async fn find_checkout(&self, key: Uuid) -> Result<Option<Checkout>, RepositoryError> {
        let header: Option<(String, DateTime<Utc>)> = sqlx::query_as(
            r"
            SELECT order_number, created_at
            FROM cafe.checkout
            WHERE idempotency_key = $1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        let Some((order_number, ordered_at)) = header else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, product_name, description, product_image, quantity, price,
                   total_amount, status, customer_notes, customization, ordered_at
            FROM cafe."order"
            WHERE checkout_key = $1
            ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Checkout {
            order_number,
            ordered_at,
            orders: rows
                .into_iter()
                .map(Order::try_from)
                .collect::<Result<_, _>>()?,
            replayed: true,
        }))
    }

    /// Store a single draft as a pending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(product = %draft.product_name))]
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = insert(&mut tx, draft, None).await?;
        tx.commit().await?;
        Ok(order)
    }
}

async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    draft: &OrderDraft,
    checkout_key: Option<Uuid>,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
        r#"
        INSERT INTO cafe."order" (
            checkout_key, product_name, description, product_image, quantity,
            price, total_amount, status, customer_notes, customization, ordered_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10)
        RETURNING id, product_name, description, product_image, quantity, price,
                  total_amount, status, customer_notes, customization, ordered_at
        "#,
    )
    .bind(checkout_key)
    .bind(&draft.product_name)
    .bind(&draft.description)
    .bind(&draft.product_image)
    .bind(draft.quantity)
    .bind(draft.price)
    .bind(draft.total_amount)
    .bind(&draft.customer_notes)
    .bind(draft.customization.map(Json))
    .bind(draft.ordered_at)
    .fetch_one(&mut **tx)
    .await?;

    Order::try_from(row)
}
