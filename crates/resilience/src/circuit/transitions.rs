//! State transition logic for circuit breaker.
//!
//! Everything here is synchronous and runs while the breaker's lock is held,
//! so each read-modify-write of the counters is atomic.

use super::config::{CircuitBreakerConfig, HALF_OPEN_SUCCESS_THRESHOLD};
use super::metrics::CircuitCounters;
use super::types::CircuitState;
use tokio::time::Instant;

/// A state change that the breaker should report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Outcome of asking whether a call may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed(Option<Transition>),
    Rejected,
}

impl CircuitCounters {
    /// Decide whether a call may run now, moving OPEN to HALF_OPEN once the
    /// reset timeout has elapsed since the last failure.
    pub fn admit(&mut self, config: &CircuitBreakerConfig, now: Instant) -> Admission {
        match self.state {
            CircuitState::Closed | CircuitState::HalfOpen => Admission::Allowed(None),
            CircuitState::Open => {
                let cooled_down = self.last_failure.map_or(true, |last| {
                    now.saturating_duration_since(last) >= config.reset_timeout
                });
                if cooled_down {
                    Admission::Allowed(Some(self.enter(CircuitState::HalfOpen)))
                } else {
                    Admission::Rejected
                }
            }
        }
    }

    /// Record a successful call
    pub fn record_success(&mut self) -> Option<Transition> {
        match self.state {
            CircuitState::Closed => {
                self.failure_count = 0;
                None
            }
            CircuitState::HalfOpen => {
                self.success_count += 1;
                (self.success_count >= HALF_OPEN_SUCCESS_THRESHOLD)
                    .then(|| self.enter(CircuitState::Closed))
            }
            // A straggler that was admitted before the circuit opened
            CircuitState::Open => None,
        }
    }

    /// Record a failed call. The failure count is never cleared here, even
    /// when a HALF_OPEN trial fails and the circuit reopens.
    pub fn record_failure(&mut self, config: &CircuitBreakerConfig, now: Instant) -> Option<Transition> {
        self.failure_count = self.failure_count.saturating_add(1);
        self.mark_failure_time(now);

        match self.state {
            CircuitState::Closed if self.failure_count >= config.failure_threshold => {
                Some(self.enter(CircuitState::Open))
            }
            CircuitState::HalfOpen => Some(self.enter(CircuitState::Open)),
            _ => None,
        }
    }

    /// Administrative reset to a fresh CLOSED circuit
    pub fn force_closed(&mut self) -> Option<Transition> {
        let from = self.state;
        *self = CircuitCounters::new();
        (from != CircuitState::Closed).then_some(Transition {
            from,
            to: CircuitState::Closed,
        })
    }

    fn enter(&mut self, to: CircuitState) -> Transition {
        let from = self.state;
        self.state = to;
        match to {
            CircuitState::Closed => {
                self.failure_count = 0;
                self.success_count = 0;
            }
            CircuitState::HalfOpen => self.success_count = 0,
            CircuitState::Open => {}
        }
        Transition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(failure_threshold: u32) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold,
            reset_timeout: Duration::from_millis(100),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_opens_exactly_at_threshold() {
        let config = config(3);
        let now = Instant::now();
        let mut counters = CircuitCounters::new();

        assert_eq!(counters.record_failure(&config, now), None);
        assert_eq!(counters.record_failure(&config, now), None);
        assert_eq!(counters.state, CircuitState::Closed);

        let transition = counters.record_failure(&config, now);
        assert_eq!(
            transition,
            Some(Transition {
                from: CircuitState::Closed,
                to: CircuitState::Open
            })
        );
        assert_eq!(counters.failure_count, 3);
    }

    #[test]
    fn test_success_in_closed_resets_failures() {
        let config = config(3);
        let mut counters = CircuitCounters::new();

        counters.record_failure(&config, Instant::now());
        counters.record_failure(&config, Instant::now());
        assert_eq!(counters.record_success(), None);
        assert_eq!(counters.failure_count, 0);
    }

    #[test]
    fn test_open_rejects_until_reset_timeout() {
        let config = config(1);
        let start = Instant::now();
        let mut counters = CircuitCounters::new();
        counters.record_failure(&config, start);

        assert_eq!(
            counters.admit(&config, start + Duration::from_millis(99)),
            Admission::Rejected
        );

        let admission = counters.admit(&config, start + Duration::from_millis(100));
        assert_eq!(
            admission,
            Admission::Allowed(Some(Transition {
                from: CircuitState::Open,
                to: CircuitState::HalfOpen
            }))
        );
        assert_eq!(counters.success_count, 0);
        assert_eq!(
            counters.admit(&config, start + Duration::from_millis(100)),
            Admission::Allowed(None)
        );
    }

    #[test]
    fn test_half_open_closes_after_three_successes() {
        let config = config(1);
        let start = Instant::now();
        let mut counters = CircuitCounters::new();
        counters.record_failure(&config, start);
        counters.admit(&config, start + Duration::from_secs(1));

        assert_eq!(counters.record_success(), None);
        assert_eq!(counters.record_success(), None);
        assert_eq!(counters.state, CircuitState::HalfOpen);
        assert_eq!(counters.success_count, 2);

        assert!(counters.record_success().is_some());
        assert_eq!(counters.state, CircuitState::Closed);
        assert_eq!(counters.failure_count, 0);
    }

    #[test]
    fn test_half_open_failure_reopens_and_keeps_failure_count() {
        let config = config(2);
        let start = Instant::now();
        let mut counters = CircuitCounters::new();
        counters.record_failure(&config, start);
        counters.record_failure(&config, start);
        counters.admit(&config, start + Duration::from_secs(1));
        counters.record_success();

        let reopened_at = start + Duration::from_secs(2);
        let transition = counters.record_failure(&config, reopened_at);

        assert_eq!(
            transition,
            Some(Transition {
                from: CircuitState::HalfOpen,
                to: CircuitState::Open
            })
        );
        assert_eq!(counters.failure_count, 3);
        assert_eq!(counters.last_failure, Some(reopened_at));
    }

    #[test]
    fn test_second_half_open_trial_starts_from_zero_successes() {
        let config = config(1);
        let start = Instant::now();
        let mut counters = CircuitCounters::new();
        counters.record_failure(&config, start);

        counters.admit(&config, start + Duration::from_secs(1));
        counters.record_success();
        counters.record_success();
        assert_eq!(counters.success_count, 2);

        let reopened_at = start + Duration::from_secs(2);
        counters.record_failure(&config, reopened_at);
        assert_eq!(counters.state, CircuitState::Open);

        let admission = counters.admit(&config, reopened_at + Duration::from_secs(1));
        assert!(matches!(admission, Admission::Allowed(Some(_))));
        assert_eq!(counters.state, CircuitState::HalfOpen);
        assert_eq!(counters.success_count, 0);

        assert_eq!(counters.record_success(), None);
        assert_eq!(counters.record_success(), None);
        assert_eq!(counters.state, CircuitState::HalfOpen);
        assert_eq!(
            counters.record_success(),
            Some(Transition {
                from: CircuitState::HalfOpen,
                to: CircuitState::Closed
            })
        );
    }

    #[test]
    fn test_force_closed_clears_everything() {
        let config = config(1);
        let mut counters = CircuitCounters::new();
        counters.record_failure(&config, Instant::now());

        assert!(counters.force_closed().is_some());
        assert_eq!(counters.state, CircuitState::Closed);
        assert_eq!(counters.failure_count, 0);
        assert_eq!(counters.last_failure, None);
        assert_eq!(counters.force_closed(), None);
    }
}
