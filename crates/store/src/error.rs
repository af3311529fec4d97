//! Store error type and transient/fatal classification.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A row held data the domain cannot represent (unknown status string,
    /// negative stock).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether retrying the whole unit of work is safe.
    ///
    /// Lock-wait timeouts, deadlocks, serialization failures, lost
    /// connections, and constraint violations raised at commit all resolve
    /// on retry. Schema-level problems (missing column, not-null breach,
    /// corrupt rows) do not.
    pub fn is_transient(&self) -> bool {
        let StoreError::Database(err) = self else {
            return false;
        };

        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => true,
            sqlx::Error::Database(db) => {
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation()
                {
                    return true;
                }
                // 40001 serialization_failure, 40P01 deadlock_detected,
                // 55P03 lock_not_available
                matches!(
                    db.code().as_deref(),
                    Some("40001") | Some("40P01") | Some("55P03")
                )
            }
            _ => false,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_transient() {
        let err = StoreError::Database(sqlx::Error::Io(std::io::Error::other("reset")));
        assert!(err.is_transient());
    }

    #[test]
    fn pool_timeouts_are_transient() {
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_transient());
    }

    #[test]
    fn row_not_found_is_not_transient() {
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn corrupt_rows_are_not_transient() {
        assert!(!StoreError::Corrupt("bad status".to_string()).is_transient());
    }
}
