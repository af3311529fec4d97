//! Unlocked catalog reads.
//!
//! Product creation and editing belong to the catalog management side;
//! these queries only feed the read-side product endpoints.

use common::{Money, ProductId};
use domain::Product;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{Result, StoreError};

/// Lists the whole catalog, alphabetically by name.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, category, description, price_cents, stock, created_at, updated_at
        FROM products
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_product).collect()
}

/// Fetches one product, or `None` if it does not exist.
pub async fn get_product(pool: &PgPool, id: ProductId) -> Result<Option<Product>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, category, description, price_cents, stock, created_at, updated_at
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id.as_uuid())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_product).transpose()
}

fn row_to_product(row: PgRow) -> Result<Product> {
    let category: String = row.try_get("category")?;
    let category = category
        .parse()
        .map_err(|e: domain::UnknownProductCategory| StoreError::Corrupt(e.to_string()))?;

    let stock: i32 = row.try_get("stock")?;
    let stock = u32::try_from(stock)
        .map_err(|_| StoreError::Corrupt(format!("negative stock {stock}")))?;

    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        category,
        description: row.try_get("description")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        stock,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
