//! Circuit breaker state management and execution logic.

use super::config::CircuitBreakerConfig;
use super::metrics::CircuitCounters;
use super::transitions::{Admission, Transition};
use super::types::{CircuitBreakerStats, CircuitState};
use parking_lot::Mutex;
use playbook_core::{Error, RecoveryLogger, Result, CATEGORY_CIRCUIT_BREAKER};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Instant};

/// Circuit breaker guarding one named resource.
///
/// Construct once per resource and share it behind an `Arc`. The counters sit
/// behind a lock that is never held across an `.await`.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    counters: Mutex<CircuitCounters>,
    logger: Arc<dyn RecoveryLogger>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(
        name: impl Into<String>,
        config: CircuitBreakerConfig,
        logger: Arc<dyn RecoveryLogger>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            counters: Mutex::new(CircuitCounters::new()),
            logger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state. Reading never transitions the circuit.
    pub fn state(&self) -> CircuitState {
        self.counters.lock().state
    }

    pub fn stats(&self) -> CircuitBreakerStats {
        self.counters.lock().snapshot(&self.name)
    }

    /// Force the circuit CLOSED with all counters zeroed
    pub fn reset(&self) {
        let transition = self.counters.lock().force_closed();
        self.logger.info(
            &format!("Circuit breaker {} manually reset", self.name),
            CATEGORY_CIRCUIT_BREAKER,
            Some(&json!({
                "name": self.name,
                "previousState": transition.map(|t| t.from.to_string()),
            })),
        );
    }

    /// Execute an operation through the circuit breaker.
    ///
    /// Rejects with [`Error::CircuitOpen`] without running `operation` while
    /// the circuit is open. Otherwise races the operation against the
    /// configured timeout; a timeout counts as a failure. Never retries.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.admit()?;

        let result = match timeout(self.config.timeout, operation()).await {
            Ok(result) => result,
            Err(_elapsed) => Err(Error::timeout(self.name.clone(), self.config.timeout)),
        };

        match &result {
            Ok(_) => self.on_success(),
            Err(error) => self.on_failure(error),
        }

        result
    }

    fn admit(&self) -> Result<()> {
        let admission = self.counters.lock().admit(&self.config, Instant::now());
        match admission {
            Admission::Allowed(transition) => {
                if let Some(transition) = transition {
                    self.report(transition, None);
                }
                Ok(())
            }
            Admission::Rejected => {
                self.logger.debug(
                    &format!("Circuit breaker {} is OPEN, rejecting call", self.name),
                    CATEGORY_CIRCUIT_BREAKER,
                    None,
                );
                Err(Error::circuit_open(self.name.clone()))
            }
        }
    }

    fn on_success(&self) {
        let transition = self.counters.lock().record_success();
        if let Some(transition) = transition {
            self.report(transition, None);
        }
    }

    fn on_failure(&self, error: &Error) {
        let (transition, failure_count) = {
            let mut counters = self.counters.lock();
            let transition = counters.record_failure(&self.config, Instant::now());
            (transition, counters.failure_count)
        };
        if let Some(transition) = transition {
            self.report(transition, Some((failure_count, error)));
        }
    }

    fn report(&self, transition: Transition, failure: Option<(u32, &Error)>) {
        let detail = json!({
            "name": self.name,
            "from": transition.from.to_string(),
            "to": transition.to.to_string(),
            "failureCount": failure.map(|(count, _)| count),
            "error": failure.map(|(_, error)| error.to_string()),
        });
        let message = format!(
            "Circuit breaker {} transitioned {} -> {}",
            self.name, transition.from, transition.to
        );
        match transition.to {
            CircuitState::Open => {
                self.logger
                    .warn(&message, CATEGORY_CIRCUIT_BREAKER, Some(&detail))
            }
            CircuitState::HalfOpen | CircuitState::Closed => {
                self.logger
                    .info(&message, CATEGORY_CIRCUIT_BREAKER, Some(&detail))
            }
        }
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("counters", &*self.counters.lock())
            .finish()
    }
}
