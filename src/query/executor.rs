//! Retrying query executor.
//!
//! A page fetch is one atomic unit: the row query and the count query run
//! together and are retried together. The executor never touches the
//! result cache.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::compiler::CompiledPredicate;
use crate::config::CatalogConfig;
use crate::domain::RawProductRow;
use crate::error::CatalogError;

/// Everything a data source needs to fetch one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Compiled filter and sort.
    pub predicate: CompiledPredicate,
    /// Row cap for this fetch, already bounded by the batch cap.
    pub limit: u32,
    /// Rows to skip.
    pub offset: u64,
}

/// Rows of one page plus the unpaged match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFetch {
    /// Page rows in sort order.
    pub rows: Vec<RawProductRow>,
    /// Total rows matching the filter.
    pub total: u64,
}

/// Which half of the paired fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSide {
    /// The page row query.
    Rows,
    /// The count query.
    Count,
}

impl fmt::Display for FetchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => write!(f, "rows"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Result of one paired fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Both queries succeeded.
    Complete(PageFetch),
    /// One query succeeded and the other failed. The successful half is
    /// discarded; rows and count are only ever returned together.
    Partial {
        /// The half that failed.
        failed: FetchSide,
        /// Its error.
        error: CatalogError,
    },
    /// Both queries failed, or the attempt failed before either ran.
    Failed(CatalogError),
}

impl FetchOutcome {
    /// Combines the two halves of a concurrent fetch.
    #[must_use]
    pub fn from_pair(
        rows: Result<Vec<RawProductRow>, CatalogError>,
        total: Result<u64, CatalogError>,
    ) -> Self {
        match (rows, total) {
            (Ok(rows), Ok(total)) => Self::Complete(PageFetch { rows, total }),
            (Err(error), Ok(_)) => Self::Partial {
                failed: FetchSide::Rows,
                error,
            },
            (Ok(_), Err(error)) => Self::Partial {
                failed: FetchSide::Count,
                error,
            },
            (Err(error), Err(_)) => Self::Failed(error),
        }
    }
}

/// A warehouse connection able to run the paired page fetch.
pub trait ProductSource: Send + Sync + fmt::Debug {
    /// Runs the row and count queries for `request` concurrently.
    fn fetch_page<'a>(&'a self, request: &'a PageRequest) -> BoxFuture<'a, FetchOutcome>;
}

/// Retry schedule for page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Attempt `n` is followed by a `n * base_delay` pause.
    pub base_delay: Duration,
    /// Bound on a single attempt.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Delay slept after failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl From<&CatalogConfig> for RetryPolicy {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            base_delay: config.retry_base_delay,
            attempt_timeout: config.query_timeout,
        }
    }
}

/// Runs page fetches against a [`ProductSource`] with joint retry.
#[derive(Debug, Clone)]
pub struct RetryingExecutor {
    source: Arc<dyn ProductSource>,
    policy: RetryPolicy,
}

impl RetryingExecutor {
    /// Creates an executor over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ProductSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Returns the retry policy in force.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches one page, retrying the row/count pair as a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::QueryFailed`] once every attempt has failed.
    /// No partial data is ever returned.
    pub async fn fetch(&self, request: &PageRequest) -> Result<PageFetch, CatalogError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = CatalogError::Internal("no fetch attempted".to_string());

        for attempt in 1..=max_attempts {
            let outcome =
                tokio::time::timeout(self.policy.attempt_timeout, self.source.fetch_page(request))
                    .await
                    .unwrap_or(FetchOutcome::Failed(CatalogError::Timeout(
                        self.policy.attempt_timeout,
                    )));

            let error = match outcome {
                FetchOutcome::Complete(page) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "product fetch recovered after retry");
                    }
                    return Ok(page);
                }
                FetchOutcome::Partial { failed, error } => {
                    tracing::warn!(attempt, side = %failed, error = %error, "partial product fetch");
                    error
                }
                FetchOutcome::Failed(error) => {
                    tracing::warn!(attempt, error = %error, "product fetch failed");
                    error
                }
            };
            last_error = error;

            if attempt < max_attempts {
                let delay = self.policy.delay_after(attempt);
                tracing::debug!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying product fetch"
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(CatalogError::QueryFailed {
            attempts: max_attempts,
            reason: last_error.to_string(),
        })
    }
}
