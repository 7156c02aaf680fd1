//! Retry policy: attempt budget, backoff curve and retry predicate.

use crate::classifier::is_retryable_error;
use crate::settings::duration_ms;
use playbook_core::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default maximum number of attempts, including the first one
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff (1s)
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default maximum delay for exponential backoff (10s)
const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Health probes fail fast: two attempts, half a second apart
const HEALTH_CHECK_MAX_ATTEMPTS: u32 = 2;
const HEALTH_CHECK_BASE_DELAY: Duration = Duration::from_millis(500);

/// Lower bound of the jitter factor; the upper bound is 1.0
const MIN_JITTER_FACTOR: f64 = 0.5;

/// Which errors should trigger a retry
#[derive(Clone, Default)]
pub enum RetryOn {
    /// Defer to the error classifier
    #[default]
    Classified,
    /// Retry on all errors
    All,
    /// Custom retry predicate
    Custom(Arc<dyn Fn(&Error) -> bool + Send + Sync>),
}

impl RetryOn {
    pub fn custom(predicate: impl Fn(&Error) -> bool + Send + Sync + 'static) -> Self {
        RetryOn::Custom(Arc::new(predicate))
    }
}

impl std::fmt::Debug for RetryOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryOn::Classified => write!(f, "RetryOn::Classified"),
            RetryOn::All => write!(f, "RetryOn::All"),
            RetryOn::Custom(_) => write!(f, "RetryOn::Custom(<predicate>)"),
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Maximum delay between attempts
    pub max_delay: Duration,
    /// Growth factor applied per attempt
    pub backoff_multiplier: f64,
    /// Scale each delay by a random factor in [0.5, 1.0]
    pub use_jitter: bool,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            use_jitter: true,
            retry_on: RetryOn::Classified,
        }
    }
}

/// Partial policy, merged over a base [`RetryPolicy`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicyOverrides {
    pub max_attempts: Option<u32>,
    #[serde(
        rename = "base_delay_ms",
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_delay: Option<Duration>,
    #[serde(
        rename = "max_delay_ms",
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_delay: Option<Duration>,
    pub backoff_multiplier: Option<f64>,
    pub use_jitter: Option<bool>,
}

impl RetryPolicy {
    /// Reduced budget used by dependency health probes
    pub fn for_health_checks() -> Self {
        Self {
            max_attempts: HEALTH_CHECK_MAX_ATTEMPTS,
            base_delay: HEALTH_CHECK_BASE_DELAY,
            ..Self::default()
        }
    }

    /// Copy of this policy with every present override applied
    #[must_use]
    pub fn with_overrides(&self, overrides: &RetryPolicyOverrides) -> Self {
        Self {
            max_attempts: overrides.max_attempts.unwrap_or(self.max_attempts),
            base_delay: overrides.base_delay.unwrap_or(self.base_delay),
            max_delay: overrides.max_delay.unwrap_or(self.max_delay),
            backoff_multiplier: overrides
                .backoff_multiplier
                .unwrap_or(self.backoff_multiplier),
            use_jitter: overrides.use_jitter.unwrap_or(self.use_jitter),
            retry_on: self.retry_on.clone(),
        }
    }

    #[must_use]
    pub fn with_retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::configuration(
                "retry policy needs at least one attempt",
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(Error::configuration(format!(
                "backoff multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        if self.base_delay > self.max_delay {
            return Err(Error::configuration(format!(
                "base delay {:?} exceeds max delay {:?}",
                self.base_delay, self.max_delay
            )));
        }
        Ok(())
    }

    /// Check if an error should be retried
    pub fn should_retry(&self, error: &Error) -> bool {
        match &self.retry_on {
            RetryOn::Classified => is_retryable_error(error),
            RetryOn::All => true,
            RetryOn::Custom(predicate) => predicate(error),
        }
    }

    /// Un-jittered delay after the zero-based `attempt`:
    /// `min(base_delay * backoff_multiplier^attempt, max_delay)`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_nanos() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = raw.min(self.max_delay.as_nanos() as f64);
        Duration::from_nanos(capped.round() as u64)
    }

    /// Delay to wait after the zero-based `attempt`, jittered when enabled
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        self.calculate_delay_with(attempt, &mut rand::thread_rng())
    }

    pub fn calculate_delay_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let delay = self.backoff_delay(attempt);
        if self.use_jitter {
            delay.mul_f64(rng.gen_range(MIN_JITTER_FACTOR..=1.0))
        } else {
            delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
        assert_eq!(policy.max_delay, Duration::from_millis(10_000));
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert!(policy.use_jitter);
        assert!(policy.validate().is_ok());

        let health = RetryPolicy::for_health_checks();
        assert_eq!(health.max_attempts, 2);
        assert_eq!(health.base_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_without_jitter() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            use_jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.calculate_delay(0), Duration::from_millis(10));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(20));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(40));
        assert_eq!(policy.calculate_delay(3), Duration::from_millis(50));
        assert_eq!(policy.calculate_delay(40), Duration::from_millis(50));
    }

    #[test]
    fn test_calculate_delay_with_jitter() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let delays: Vec<_> = (0..20)
            .map(|_| policy.calculate_delay_with(2, &mut rng))
            .collect();

        // 400ms scaled into [200ms, 400ms]
        for delay in &delays {
            assert!(*delay >= Duration::from_millis(200));
            assert!(*delay <= Duration::from_millis(400));
        }
        let unique: std::collections::HashSet<_> = delays.iter().collect();
        assert!(unique.len() > 1);
    }

    #[test]
    fn test_overrides_merge_over_base() {
        let overrides = RetryPolicyOverrides {
            max_attempts: Some(5),
            use_jitter: Some(false),
            ..Default::default()
        };
        let policy = RetryPolicy::default().with_overrides(&overrides);

        assert_eq!(policy.max_attempts, 5);
        assert!(!policy.use_jitter);
        assert_eq!(policy.base_delay, DEFAULT_BASE_DELAY);
        assert_eq!(policy.max_delay, DEFAULT_MAX_DELAY);
    }

    #[test]
    fn test_overrides_deserialize_from_millis() {
        let overrides: RetryPolicyOverrides =
            serde_json::from_str(r#"{"max_attempts": 4, "base_delay_ms": 250}"#).unwrap();
        assert_eq!(overrides.max_attempts, Some(4));
        assert_eq!(overrides.base_delay, Some(Duration::from_millis(250)));
        assert_eq!(overrides.max_delay, None);

        assert!(serde_json::from_str::<RetryPolicyOverrides>(r#"{"attempts": 4}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_policies() {
        let zero = RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let shrinking = RetryPolicy {
            backoff_multiplier: 0.5,
            ..Default::default()
        };
        assert!(shrinking.validate().is_err());

        let inverted = RetryPolicy {
            base_delay: Duration::from_secs(20),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_should_retry_modes() {
        let bad_request = Error::remote_with_status(400, "bad request");
        let unavailable = Error::remote_with_code("unavailable", "");

        let classified = RetryPolicy::default();
        assert!(classified.should_retry(&unavailable));
        assert!(!classified.should_retry(&bad_request));

        let all = RetryPolicy::default().with_retry_on(RetryOn::All);
        assert!(all.should_retry(&bad_request));

        let custom = RetryPolicy::default()
            .with_retry_on(RetryOn::custom(|e| e.code() == Some("aborted")));
        assert!(custom.should_retry(&Error::remote_with_code("aborted", "")));
        assert!(!custom.should_retry(&unavailable));
    }

    proptest! {
        #[test]
        fn prop_backoff_is_capped_and_monotonic(
            base_ms in 1u64..5_000,
            max_ms in 5_000u64..60_000,
            multiplier in 1.0f64..4.0,
            attempt in 0u32..30,
        ) {
            let policy = RetryPolicy {
                base_delay: Duration::from_millis(base_ms),
                max_delay: Duration::from_millis(max_ms),
                backoff_multiplier: multiplier,
                use_jitter: false,
                ..Default::default()
            };

            let current = policy.calculate_delay(attempt);
            let next = policy.calculate_delay(attempt + 1);
            prop_assert!(current <= policy.max_delay);
            prop_assert!(next >= current);

            let expected = (base_ms as f64 * 1e6 * multiplier.powi(attempt as i32))
                .min(max_ms as f64 * 1e6);
            prop_assert!((current.as_nanos() as f64 - expected).abs() <= 1.0);
        }
    }
}
