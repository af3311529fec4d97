//! Order queries.

use common::{OrderId, OwnerId};
use domain::Order;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use store::{CommerceStore, StoreError, ledger};

/// A finite stream of fully assembled orders.
///
/// Restartable by calling the producing query again.
pub type OrderStream = BoxStream<'static, Result<Order, StoreError>>;

/// Read-side access to the order ledger.
#[derive(Clone)]
pub struct OrderQueries {
    store: CommerceStore,
}

impl OrderQueries {
    /// Creates a query service over the given store.
    pub fn new(store: CommerceStore) -> Self {
        Self { store }
    }

    /// Streams an owner's orders, newest first, each with its items
    /// eagerly attached.
    ///
    /// An owner with no orders yields an empty stream, not an error. The
    /// headers are read up front; items are fetched lazily as the stream
    /// is polled.
    #[tracing::instrument(skip(self), fields(owner = %owner))]
    pub async fn orders_for_owner(&self, owner: OwnerId) -> Result<OrderStream, StoreError> {
        let rows = ledger::order_rows_for_owner(self.store.pool(), owner).await?;
        let pool = self.store.pool().clone();

        let stream = futures_util::stream::iter(rows).then(move |row| {
            let pool = pool.clone();
            async move {
                let items = ledger::items_for_order(&pool, row.id).await?;
                Ok(row.into_order(items))
            }
        });

        Ok(stream.boxed())
    }

    /// Fetches one of the owner's orders with its items.
    ///
    /// Returns `None` if the order does not exist or belongs to someone
    /// else; the ledger does not reveal other owners' orders.
    #[tracing::instrument(skip(self), fields(owner = %owner, order = %order_id))]
    pub async fn order_for_owner(
        &self,
        owner: OwnerId,
        order_id: OrderId,
    ) -> Result<Option<Order>, StoreError> {
        let Some(row) = ledger::order_row(self.store.pool(), order_id).await? else {
            return Ok(None);
        };
        if row.owner_id != owner {
            return Ok(None);
        }

        let items = ledger::items_for_order(self.store.pool(), row.id).await?;
        Ok(Some(row.into_order(items)))
    }
}
