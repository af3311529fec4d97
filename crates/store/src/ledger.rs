//! Order ledger: append-only order and line-item records.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, OwnerId, ProductId};
use domain::{Order, OrderItem, OrderStatus};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::error::{Result, StoreError};

/// An order header as stored, without its items attached.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Attaches the items to produce a full [`Order`].
    pub fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            owner_id: self.owner_id,
            total_amount: self.total_amount,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
        }
    }
}

/// Inserts the order header, returning its database-assigned timestamps.
pub async fn insert_order(
    conn: &mut PgConnection,
    id: OrderId,
    owner: OwnerId,
    total_amount: Money,
    status: OrderStatus,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let row = sqlx::query(
        r#"
        INSERT INTO orders (id, owner_id, total_amount_cents, status)
        VALUES ($1, $2, $3, $4)
        RETURNING created_at, updated_at
        "#,
    )
    .bind(id.as_uuid())
    .bind(owner.as_uuid())
    .bind(total_amount.cents())
    .bind(status.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok((row.try_get("created_at")?, row.try_get("updated_at")?))
}

/// Inserts one line item of an order.
pub async fn insert_order_item(conn: &mut PgConnection, item: &OrderItem) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, product_id, quantity, price_per_unit_cents, total_price_cents)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(item.id)
    .bind(item.order_id.as_uuid())
    .bind(item.product_id.as_uuid())
    .bind(item.quantity as i32)
    .bind(item.price_per_unit.cents())
    .bind(item.total_price.cents())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Fetches one order header, or `None` if it does not exist.
pub async fn order_row(pool: &PgPool, id: OrderId) -> Result<Option<OrderRow>> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, total_amount_cents, status, created_at, updated_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id.as_uuid())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_order_row).transpose()
}

/// Fetches all order headers for an owner, newest first.
pub async fn order_rows_for_owner(pool: &PgPool, owner: OwnerId) -> Result<Vec<OrderRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, total_amount_cents, status, created_at, updated_at
        FROM orders
        WHERE owner_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(owner.as_uuid())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_order_row).collect()
}

/// Fetches the line items of an order in product-id order.
pub async fn items_for_order(pool: &PgPool, order_id: OrderId) -> Result<Vec<OrderItem>> {
    let rows = sqlx::query(
        r#"
        SELECT id, order_id, product_id, quantity, price_per_unit_cents, total_price_cents
        FROM order_items
        WHERE order_id = $1
        ORDER BY product_id ASC
        "#,
    )
    .bind(order_id.as_uuid())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_item).collect()
}

fn row_to_order_row(row: PgRow) -> Result<OrderRow> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse()
        .map_err(|e: domain::UnknownOrderStatus| StoreError::Corrupt(e.to_string()))?;

    Ok(OrderRow {
        id: OrderId::from_uuid(row.try_get("id")?),
        owner_id: OwnerId::from_uuid(row.try_get("owner_id")?),
        total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_item(row: PgRow) -> Result<OrderItem> {
    let quantity: i32 = row.try_get("quantity")?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| StoreError::Corrupt(format!("non-positive quantity {quantity}")))?;

    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: OrderId::from_uuid(row.try_get("order_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        quantity,
        price_per_unit: Money::from_cents(row.try_get("price_per_unit_cents")?),
        total_price: Money::from_cents(row.try_get("total_price_cents")?),
    })
}
