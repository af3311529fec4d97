//! Order query integration tests against PostgreSQL.
//!
//! Uses the reservation engine to commit real orders, then reads them back
//! through the query service. A shared container backs all tests; each one
//! seeds its own data under fresh UUIDs.

use std::sync::Arc;

use common::{OrderId, OwnerId, ProductId};
use domain::{CartLine, OrderStatus};
use futures_util::TryStreamExt;
use query::OrderQueries;
use reservation::ReservationEngine;
use sqlx::PgPool;
use store::CommerceStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_commerce_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap()
}

fn fresh_owner() -> OwnerId {
    OwnerId::from_uuid(Uuid::new_v4())
}

async fn seed_product(pool: &PgPool, price_cents: i64, stock: i32) -> ProductId {
    let id = ProductId::new();
    sqlx::query(
        "INSERT INTO products (id, name, category, price_cents, stock) VALUES ($1, $2, 'Fertilizers', $3, $4)",
    )
    .bind(id.as_uuid())
    .bind(format!("test product {id}"))
    .bind(price_cents)
    .bind(stock)
    .execute(pool)
    .await
    .unwrap();
    id
}

#[tokio::test]
async fn committed_order_is_immediately_visible() {
    let pool = get_test_pool().await;
    let store = CommerceStore::new(pool.clone());
    let engine = ReservationEngine::new(store.clone());
    let queries = OrderQueries::new(store);
    let owner = fresh_owner();

    let product = seed_product(&pool, 1500, 10).await;
    let placed = engine
        .place_order(owner, vec![CartLine::new(product, 3)])
        .await
        .unwrap();

    let orders: Vec<_> = queries
        .orders_for_owner(owner)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.id, placed.id);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount.cents(), 4500);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.items[0].price_per_unit.cents(), 1500);
    assert_eq!(order.items_total(), order.total_amount);
}

#[tokio::test]
async fn orders_come_back_newest_first() {
    let pool = get_test_pool().await;
    let store = CommerceStore::new(pool.clone());
    let engine = ReservationEngine::new(store.clone());
    let queries = OrderQueries::new(store);
    let owner = fresh_owner();

    let product = seed_product(&pool, 100, 100).await;

    let mut placed_ids = Vec::new();
    for quantity in 1..=3 {
        let order = engine
            .place_order(owner, vec![CartLine::new(product, quantity)])
            .await
            .unwrap();
        placed_ids.push(order.id);
    }

    let orders: Vec<_> = queries
        .orders_for_owner(owner)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(orders.len(), 3);
    for window in orders.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
    // Every placed order is present exactly once.
    let mut seen: Vec<_> = orders.iter().map(|o| o.id).collect();
    seen.sort_by_key(|id| id.as_uuid());
    placed_ids.sort_by_key(|id| id.as_uuid());
    assert_eq!(seen, placed_ids);
}

#[tokio::test]
async fn unknown_owner_yields_empty_stream() {
    let pool = get_test_pool().await;
    let queries = OrderQueries::new(CommerceStore::new(pool));

    let orders: Vec<_> = queries
        .orders_for_owner(fresh_owner())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(orders.is_empty());
}

#[tokio::test]
async fn stream_is_restartable() {
    let pool = get_test_pool().await;
    let store = CommerceStore::new(pool.clone());
    let engine = ReservationEngine::new(store.clone());
    let queries = OrderQueries::new(store);
    let owner = fresh_owner();

    let product = seed_product(&pool, 800, 10).await;
    engine
        .place_order(owner, vec![CartLine::new(product, 1)])
        .await
        .unwrap();

    let first: Vec<_> = queries
        .orders_for_owner(owner)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    let second: Vec<_> = queries
        .orders_for_owner(owner)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn point_lookup_enforces_ownership() {
    let pool = get_test_pool().await;
    let store = CommerceStore::new(pool.clone());
    let engine = ReservationEngine::new(store.clone());
    let queries = OrderQueries::new(store);
    let owner = fresh_owner();

    let product = seed_product(&pool, 2000, 5).await;
    let placed = engine
        .place_order(owner, vec![CartLine::new(product, 2)])
        .await
        .unwrap();

    let found = queries.order_for_owner(owner, placed.id).await.unwrap();
    assert_eq!(found.unwrap().id, placed.id);

    // Someone else's lookup sees nothing.
    let other = queries
        .order_for_owner(fresh_owner(), placed.id)
        .await
        .unwrap();
    assert!(other.is_none());

    // Nor does a lookup for an order that never existed.
    let missing = queries
        .order_for_owner(owner, OrderId::new())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn price_snapshot_isolated_from_catalog_edits() {
    let pool = get_test_pool().await;
    let store = CommerceStore::new(pool.clone());
    let engine = ReservationEngine::new(store.clone());
    let queries = OrderQueries::new(store);
    let owner = fresh_owner();

    let product = seed_product(&pool, 1200, 10).await;
    let placed = engine
        .place_order(owner, vec![CartLine::new(product, 2)])
        .await
        .unwrap();

    sqlx::query("UPDATE products SET price_cents = 50 WHERE id = $1")
        .bind(product.as_uuid())
        .execute(&pool)
        .await
        .unwrap();

    let order = queries
        .order_for_owner(owner, placed.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.items[0].price_per_unit.cents(), 1200);
    assert_eq!(order.items[0].total_price.cents(), 2400);
    assert_eq!(order.total_amount.cents(), 2400);
}
