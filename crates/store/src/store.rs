//! Connection pool handle and transaction entry point.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{Result, StoreError};

/// Handle to the commerce database.
///
/// Wraps the pool so callers open explicit units of work via [`begin`]
/// rather than reaching for shared mutable connection state.
///
/// [`begin`]: CommerceStore::begin
#[derive(Clone)]
pub struct CommerceStore {
    pool: PgPool,
}

impl CommerceStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(StoreError::Database)?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Begins a transaction.
    ///
    /// Dropping the returned transaction without committing rolls back
    /// every write made through it.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}
