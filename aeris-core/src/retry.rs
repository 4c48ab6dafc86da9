//! Bounded retry for transactional units of work.

use std::future::Future;

/// Total attempts granted to a retried unit of work.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 9;

/// Replays a unit of work while the caller's predicate classifies its error
/// as a transient conflict. Retries are immediate, with identical inputs;
/// any non-transient error propagates at once. Exhausting the bound yields
/// the final conflict error.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn run<T, E, F, Fut, P>(&self, is_transient: P, mut unit: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match unit().await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && attempt < self.max_attempts => {
                    tracing::debug!(
                        "transient conflict on attempt {} of {}, replaying",
                        attempt,
                        self.max_attempts
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
