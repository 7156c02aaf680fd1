//! Configuration for circuit breaker behavior.

use crate::settings::duration_ms;
use playbook_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Successes needed in HALF_OPEN before the circuit closes again
pub const HALF_OPEN_SUCCESS_THRESHOLD: u32 = 3;

const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// How long an open circuit rejects calls before a half-open trial
    #[serde(rename = "reset_timeout_ms", with = "duration_ms")]
    pub reset_timeout: Duration,
    /// Deadline for a single call through the breaker
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(Error::configuration(
                "circuit breaker failure threshold must be at least 1",
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::configuration(
                "circuit breaker call timeout must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_config() {
        let config: CircuitBreakerConfig =
            serde_json::from_str(r#"{"failure_threshold": 2, "reset_timeout_ms": 50}"#).unwrap();

        assert_eq!(config.failure_threshold, 2);
        assert_eq!(config.reset_timeout, Duration::from_millis(50));
        assert_eq!(config.timeout, DEFAULT_CALL_TIMEOUT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let zero_threshold = CircuitBreakerConfig {
            failure_threshold: 0,
            ..Default::default()
        };
        assert!(zero_threshold.validate().is_err());

        let zero_timeout = CircuitBreakerConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
