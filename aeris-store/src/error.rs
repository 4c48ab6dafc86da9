//! Store failures, split into retryable conflicts and everything else.

/// SQLSTATE for a serialization failure under SERIALIZABLE isolation.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE for a detected deadlock.
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization failure or deadlock; the transaction may be replayed.
    #[error("transaction conflict: {0}")]
    Conflict(#[source] sqlx::Error),

    /// Any other store failure; never retried.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_conflict_code(&err) {
            StoreError::Conflict(err)
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_conflict_code(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .map_or(false, |code| {
                code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED
            }),
        _ => false,
    }
}
