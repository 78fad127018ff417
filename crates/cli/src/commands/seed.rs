//! Seed data for a fresh database.
//!
//! The bundled files under `crates/cli/seed/` are compiled in; `seed products
//! --file` loads another menu in the same format.

use std::path::Path;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use cafe_rencontre_core::{OrderDraft, OrderStatus};

use super::{CliError, connect};

const BUNDLED_PRODUCTS: &str = include_str!("../../seed/products.yaml");
const BUNDLED_ORDERS: &str = include_str!("../../seed/orders.yaml");

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedOrder {
    #[serde(flatten)]
    draft: OrderDraft,
    #[serde(default)]
    status: OrderStatus,
    ordered_minutes_ago: i64,
}

fn parse_products(yaml: &str) -> Result<Vec<SeedProduct>, CliError> {
    let products: Vec<SeedProduct> = serde_yaml::from_str(yaml)?;
    for product in &products {
        if product.name.trim().is_empty() {
            return Err(CliError::InvalidSeed("product without a name".to_owned()));
        }
        if product.price < Decimal::ZERO {
            return Err(CliError::InvalidSeed(format!(
                "{} has a negative price",
                product.name
            )));
        }
    }
    Ok(products)
}

fn parse_orders(yaml: &str) -> Result<Vec<SeedOrder>, CliError> {
    let orders: Vec<SeedOrder> = serde_yaml::from_str(yaml)?;
    for order in &orders {
        order.draft.validate().map_err(|e| {
            CliError::InvalidSeed(format!("{}: {e}", order.draft.product_name))
        })?;
    }
    Ok(orders)
}

/// Insert menu items. Products whose name already exists are left alone.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// database rejects an insert.
pub async fn products(file: Option<&Path>) -> Result<(), CliError> {
    let yaml = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::Io {
                    path: path.display().to_string(),
                    source,
                })?
        }
        None => BUNDLED_PRODUCTS.to_owned(),
    };
    let products = parse_products(&yaml)?;

    let pool = connect("STOREFRONT_DATABASE_URL").await?;
    let mut tx = pool.begin().await?;
    let (mut inserted, mut skipped) = (0_u32, 0_u32);

    for product in &products {
        let result = sqlx::query(
            r"
            INSERT INTO cafe.product (name, description, price, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            skipped += 1;
        } else {
            inserted += 1;
        }
    }

    tx.commit().await?;
    info!(inserted, skipped, "Products seeded");
    Ok(())
}

/// Insert the demo orders with their statuses.
///
/// # Errors
///
/// Returns an error if the bundled data is invalid or an insert fails.
pub async fn orders() -> Result<(), CliError> {
    let orders = parse_orders(BUNDLED_ORDERS)?;
    let now = Utc::now();

    let pool = connect("STOREFRONT_DATABASE_URL").await?;
    let mut tx = pool.begin().await?;

    for order in &orders {
        let draft = &order.draft;
        sqlx::query(
            r#"
            INSERT INTO cafe."order" (
                product_name, description, product_image, quantity, price,
                total_amount, status, customer_notes, ordered_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&draft.product_name)
        .bind(&draft.description)
        .bind(&draft.product_image)
        .bind(draft.quantity)
        .bind(draft.price)
        .bind(draft.total_amount)
        .bind(order.status)
        .bind(&draft.customer_notes)
        .bind(now - Duration::minutes(order.ordered_minutes_ago))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(count = orders.len(), "Demo orders seeded");
    Ok(())
}
