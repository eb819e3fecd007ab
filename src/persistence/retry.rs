//! Bounded retry for transient database failures.
//!
//! Managed Postgres offerings reap idle connections aggressively, and the
//! first query after a reap surfaces as an I/O or protocol error even
//! though an immediate retry on a fresh connection succeeds. This module
//! classifies errors as connection-related or not, revives the pool with
//! a health probe, and retries with a linearly growing backoff. Errors
//! that are not connection-related propagate untouched on the first
//! attempt.
//!
//! Safe only for reads and upserts keyed on a unique column (the two
//! operation shapes the store issues), since a blind retry of a
//! non-idempotent write could apply it twice.

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;
use tracing::warn;

/// Retry knobs; see `DATABASE_RETRY_*` configuration keys.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt (2 means up to 3 invocations).
    pub max_retries: u32,
    /// The n-th retry sleeps `base_delay * n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1_000),
        }
    }
}

/// Runs `op`, retrying connection-classified failures per `policy`.
///
/// Before each retry the pool is revived with a `SELECT 1` probe; a probe
/// failure is logged and the retry proceeds anyway (the pool may still
/// hand out a fresh connection for the real query).
///
/// # Errors
///
/// Propagates the first non-connection error immediately, or the last
/// connection error once retries are exhausted.
pub async fn with_retry<T, F, Fut>(
    pool: &PgPool,
    policy: RetryPolicy,
    op: F,
) -> Result<T, sqlx::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    retry_loop(policy, op, || revive(pool)).await
}

/// The retry loop itself, generic over the revive step for testability.
pub(crate) async fn retry_loop<T, F, Fut, R, RFut>(
    policy: RetryPolicy,
    op: F,
    revive: R,
) -> Result<T, sqlx::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
    R: Fn() -> RFut,
    RFut: Future<Output = ()>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && is_connection_error(&err) => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    error = %err,
                    "transient database error, reconnecting and retrying"
                );
                revive().await;
                tokio::time::sleep(policy.base_delay.saturating_mul(attempt)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Classifies an error as connection-related.
///
/// Matches the structural sqlx variants first, then falls back to message
/// substrings for driver errors that arrive as opaque strings (server
/// closed the connection, authentication failures, refused sockets).
#[must_use]
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => true,
        other => {
            let message = other.to_string().to_ascii_lowercase();
            ["connection", "timeout", "authentication", "reset", "refused"]
                .iter()
                .any(|needle| message.contains(needle))
        }
    }
}

/// Health probe that lets the pool replace a dead connection before the
/// retried query runs. Failures are logged, never propagated.
async fn revive(pool: &PgPool) {
    if let Err(err) = sqlx::query("SELECT 1").execute(pool).await {
        warn!(error = %err, "database revive probe failed");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        }
    }

    async fn noop_revive() {}

    #[tokio::test]
    async fn non_connection_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), sqlx::Error> = retry_loop(
            fast_policy(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(sqlx::Error::RowNotFound)
                }
            },
            noop_revive,
        )
        .await;

        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connection_errors_retry_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<u32, sqlx::Error> = retry_loop(
            fast_policy(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(sqlx::Error::PoolTimedOut)
                    } else {
                        Ok(42)
                    }
                }
            },
            noop_revive,
        )
        .await;

        let Ok(value) = result else {
            panic!("expected eventual success");
        };
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_propagate_the_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), sqlx::Error> = retry_loop(
            fast_policy(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(sqlx::Error::PoolTimedOut)
                }
            },
            noop_revive,
        )
        .await;

        assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn revive_runs_once_per_retry() {
        let revives = Arc::new(AtomicU32::new(0));
        let revive_counter = Arc::clone(&revives);

        let _: Result<(), sqlx::Error> = retry_loop(
            fast_policy(),
            || async { Err(sqlx::Error::PoolClosed) },
            move || {
                let revive_counter = Arc::clone(&revive_counter);
                async move {
                    revive_counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

        assert_eq!(revives.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn structural_variants_classify_as_connection_errors() {
        assert!(is_connection_error(&sqlx::Error::PoolTimedOut));
        assert!(is_connection_error(&sqlx::Error::PoolClosed));
        assert!(!is_connection_error(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn message_substrings_classify_as_connection_errors() {
        let err = sqlx::Error::Configuration("connection refused by server".into());
        assert!(is_connection_error(&err));
        let unrelated = sqlx::Error::Configuration("bad option".into());
        assert!(!is_connection_error(&unrelated));
    }
}
