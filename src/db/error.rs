//! Store error classification.
//!
//! Every sqlx failure is sorted into one of four buckets so callers can
//! tell "the store is down, try again later" apart from "the store
//! answered, but the data is wrong".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, pool or I/O failure. Retryable by the caller.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    Conflict(String),

    #[error("record not found")]
    NotFound,

    /// The store answered but the query or stored data was invalid.
    #[error("store data error: {0}")]
    Data(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            other => StoreError::Data(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Data(format!("invalid JSON column: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_failures_are_retryable() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(StoreError::from(sqlx::Error::PoolClosed).is_retryable());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(StoreError::from(sqlx::Error::Io(io)).is_retryable());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_decode_errors_are_data_errors() {
        let err = StoreError::from(sqlx::Error::ColumnNotFound("price".into()));
        assert!(matches!(err, StoreError::Data(_)));
        assert!(!err.is_retryable());
    }
}
