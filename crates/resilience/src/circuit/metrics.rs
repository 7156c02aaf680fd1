//! Counters tracked by a circuit breaker.

use super::types::{CircuitBreakerStats, CircuitState};
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Mutable breaker bookkeeping, always accessed under the breaker's lock
#[derive(Debug, Clone)]
pub struct CircuitCounters {
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    /// Monotonic time of the last failure, drives the reset timeout
    pub last_failure: Option<Instant>,
    /// Wall-clock time of the last failure, for reporting
    pub last_failure_at: Option<DateTime<Utc>>,
}

impl CircuitCounters {
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure: None,
            last_failure_at: None,
        }
    }

    pub fn mark_failure_time(&mut self, now: Instant) {
        self.last_failure = Some(now);
        self.last_failure_at = Some(Utc::now());
    }

    pub fn snapshot(&self, name: &str) -> CircuitBreakerStats {
        CircuitBreakerStats {
            name: name.to_string(),
            state: self.state,
            failure_count: self.failure_count,
            success_count: self.success_count,
            last_failure_time: self.last_failure_at,
        }
    }
}

impl Default for CircuitCounters {
    fn default() -> Self {
        Self::new()
    }
}
