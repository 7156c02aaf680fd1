//! Retry loop for async operations against the remote dependency.

use super::policy::RetryPolicy;
use crate::circuit::CircuitBreaker;
use playbook_core::{Error, RecoveryLogger, Result, CATEGORY_RETRY};
use serde_json::json;
use std::future::Future;
use tokio::time::sleep;

/// Execute an operation with retry logic.
///
/// The operation runs at most `policy.max_attempts` times, strictly one after
/// another. The first success is returned; the error of the final attempt, or
/// of the first non-retryable one, is propagated unchanged.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    logger: &dyn RecoveryLogger,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for attempt in 0..policy.max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    logger.info(
                        &format!("Operation succeeded after {} attempts", attempt + 1),
                        CATEGORY_RETRY,
                        Some(&json!({ "attempts": attempt + 1 })),
                    );
                }
                return Ok(value);
            }
            Err(error) => {
                if attempt + 1 == policy.max_attempts {
                    logger.error(
                        &format!(
                            "Operation failed after {} attempts: {error}",
                            policy.max_attempts
                        ),
                        CATEGORY_RETRY,
                        Some(&json!({
                            "attempts": policy.max_attempts,
                            "code": error.code(),
                        })),
                    );
                    return Err(error);
                }

                if !policy.should_retry(&error) {
                    logger.debug(
                        &format!("Not retrying non-retryable error on attempt {}: {error}", attempt + 1),
                        CATEGORY_RETRY,
                        Some(&json!({ "attempt": attempt + 1, "code": error.code() })),
                    );
                    return Err(error);
                }

                let delay = policy.calculate_delay(attempt);
                logger.warn(
                    &format!(
                        "Attempt {}/{} failed, retrying in {delay:?}: {error}",
                        attempt + 1,
                        policy.max_attempts
                    ),
                    CATEGORY_RETRY,
                    Some(&json!({
                        "attempt": attempt + 1,
                        "maxAttempts": policy.max_attempts,
                        "delayMs": delay.as_millis() as u64,
                        "code": error.code(),
                    })),
                );
                sleep(delay).await;
            }
        }
    }

    Err(Error::configuration(
        "retry policy allows zero attempts; operation was not run",
    ))
}

/// Retry with circuit breaker protection.
///
/// Every attempt passes through `breaker`. A circuit-open rejection is not
/// retryable under the default classifier, so an open circuit ends the loop
/// without touching the operation.
pub async fn with_retry_and_breaker<F, Fut, T>(
    policy: &RetryPolicy,
    breaker: &CircuitBreaker,
    logger: &dyn RecoveryLogger,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    with_retry(policy, logger, || breaker.execute(&operation)).await
}
