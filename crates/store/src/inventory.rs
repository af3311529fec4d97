//! Inventory store: locked point reads and guarded stock decrements.

use common::{Money, ProductId};
use sqlx::{PgConnection, Row};

use crate::error::{Result, StoreError};

/// Price and stock of a product as read under an exclusive row lock.
///
/// Valid for the duration of the transaction that took the lock; the price
/// here is the authoritative one for total computation and snapshotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedProduct {
    pub id: ProductId,
    pub price: Money,
    pub stock: u32,
}

/// Acquires an exclusive row lock on the product and reads its price and
/// stock.
///
/// Blocks while a concurrent reservation holds the lock, bounded by the
/// store's lock-wait timeout. Returns `None` if the product does not exist.
pub async fn lock_product(conn: &mut PgConnection, id: ProductId) -> Result<Option<LockedProduct>> {
    let row = sqlx::query("SELECT price_cents, stock FROM products WHERE id = $1 FOR UPDATE")
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let price_cents: i64 = row.try_get("price_cents")?;
    let stock: i32 = row.try_get("stock")?;
    let stock = u32::try_from(stock)
        .map_err(|_| StoreError::Corrupt(format!("negative stock {stock} for product {id}")))?;

    Ok(Some(LockedProduct {
        id,
        price: Money::from_cents(price_cents),
        stock,
    }))
}

/// Decrements the product's stock by `quantity`, refusing to go below zero.
///
/// Returns whether a row was updated. The caller must already hold the row
/// lock and have validated availability; a `false` here means the guard
/// refused the write anyway.
pub async fn decrement_stock(
    conn: &mut PgConnection,
    id: ProductId,
    quantity: u32,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - $2, updated_at = NOW()
        WHERE id = $1 AND stock >= $2
        "#,
    )
    .bind(id.as_uuid())
    .bind(quantity as i32)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
