use aeris_core::credentials::CredentialError;
use aeris_store::StoreError;
use tracing::{debug, error};

/// Everything an engine operation can fail with. Validation and
/// authorization variants are raised before any store access; business-rule
/// variants roll the transaction back; `Store` carries both retryable
/// conflicts and fatal store faults.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("operation requires a logged-in session")]
    NotLoggedIn,

    #[error("a user is already logged in")]
    AlreadyLoggedIn,

    /// Unknown username or wrong password; the two are indistinguishable to
    /// the caller.
    #[error("credentials rejected")]
    BadCredentials,

    #[error("username is already taken")]
    DuplicateUsername,

    #[error("itinerary index {0} is out of range")]
    NoSuchItinerary(usize),

    #[error("caller already holds a reservation on day {0}")]
    DuplicateDay(i32),

    #[error("no seat left on flight {0}")]
    NoCapacity(i32),

    /// Absent, owned by someone else, or already paid; uniform on purpose.
    #[error("no unpaid reservation {0} owned by the caller")]
    UnknownReservation(i32),

    #[error("balance {balance} cannot cover itinerary price {price}")]
    InsufficientBalance { balance: i32, price: i32 },

    #[error("credential hashing failed: {0}")]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Store(StoreError::from(err))
    }
}

impl EngineError {
    /// Conflict-class store failures are the only retryable errors.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Store(err) if err.is_conflict())
    }
}

/// Routes a failure to the operator channel when it is a fault rather than a
/// business outcome.
pub(crate) fn report(operation: &str, err: &EngineError) {
    match err {
        EngineError::Store(inner) if !inner.is_conflict() => {
            error!("{} hit a store fault: {}", operation, inner);
        }
        EngineError::Credential(inner) => {
            error!("{} could not hash credentials: {}", operation, inner);
        }
        _ => debug!("{} rejected: {}", operation, err),
    }
}
