//! # Deadlines
//!
//! Upper bounds for individual store calls. Expiry drops the in-flight
//! store future and reports `DeadlineExceeded`; callers decide whether to
//! log it.

use crate::error::{ShopError, ShopResult};
use std::future::Future;
use std::time::Duration;

/// Per-call time limits for store access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Bound for writes and the reads that precede them
    pub mutation: Duration,
    /// Bound for view-only reads (cart totals, listings)
    pub read: Duration,
}

impl Deadlines {
    pub const DEFAULT_MUTATION: Duration = Duration::from_secs(5);
    pub const DEFAULT_READ: Duration = Duration::from_secs(100);

    pub fn new(mutation: Duration, read: Duration) -> Self {
        Self { mutation, read }
    }

    /// Run a mutation-side store call under the mutation deadline
    pub async fn mutate<T, F>(&self, operation: &'static str, call: F) -> ShopResult<T>
    where
        F: Future<Output = ShopResult<T>>,
    {
        bounded(self.mutation, operation, call).await
    }

    /// Run a view-only store call under the read deadline
    pub async fn read<T, F>(&self, operation: &'static str, call: F) -> ShopResult<T>
    where
        F: Future<Output = ShopResult<T>>,
    {
        bounded(self.read, operation, call).await
    }
}

impl Default for Deadlines {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MUTATION, Self::DEFAULT_READ)
    }
}

async fn bounded<T, F>(limit: Duration, operation: &'static str, call: F) -> ShopResult<T>
where
    F: Future<Output = ShopResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ShopError::DeadlineExceeded {
            operation,
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}
