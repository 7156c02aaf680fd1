//! Named circuit breakers owned by the application's composition root.
//!
//! Call sites look breakers up by resource name instead of importing
//! module-level singletons, so tests can build a fresh registry each time.

use super::config::CircuitBreakerConfig;
use super::state::CircuitBreaker;
use super::types::CircuitBreakerStats;
use dashmap::DashMap;
use playbook_core::RecoveryLogger;
use std::sync::Arc;

pub struct CircuitBreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: CircuitBreakerConfig,
    logger: Arc<dyn RecoveryLogger>,
}

impl CircuitBreakerRegistry {
    pub fn new(logger: Arc<dyn RecoveryLogger>) -> Self {
        Self::with_default_config(CircuitBreakerConfig::default(), logger)
    }

    pub fn with_default_config(
        default_config: CircuitBreakerConfig,
        logger: Arc<dyn RecoveryLogger>,
    ) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config,
            logger,
        }
    }

    /// Breaker for `name`, created with the registry defaults on first use
    pub fn get_or_create(&self, name: &str) -> Arc<CircuitBreaker> {
        self.get_or_create_with(name, self.default_config.clone())
    }

    /// Breaker for `name`; `config` only applies if the breaker is new
    pub fn get_or_create_with(&self, name: &str, config: CircuitBreakerConfig) -> Arc<CircuitBreaker> {
        let entry = self.breakers.entry(name.to_string()).or_insert_with(|| {
            Arc::new(CircuitBreaker::new(name, config, Arc::clone(&self.logger)))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Sorted names of every registered breaker
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.breakers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Stats for every breaker, sorted by name
    pub fn stats(&self) -> Vec<CircuitBreakerStats> {
        let mut stats: Vec<_> = self.breakers.iter().map(|e| e.value().stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Reset every breaker to CLOSED
    pub fn reset_all(&self) {
        for entry in self.breakers.iter() {
            entry.value().reset();
        }
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitState;
    use playbook_core::{Error, NoopLogger, Result};
    use std::time::Duration;

    fn registry() -> CircuitBreakerRegistry {
        CircuitBreakerRegistry::with_default_config(
            CircuitBreakerConfig {
                failure_threshold: 1,
                reset_timeout: Duration::from_secs(60),
                timeout: Duration::from_secs(1),
            },
            Arc::new(NoopLogger),
        )
    }

    #[test]
    fn test_same_name_returns_shared_breaker() {
        let registry = registry();
        let a = registry.get_or_create("firestore");
        let b = registry.get_or_create("firestore");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("storage").is_none());
    }

    #[test]
    fn test_first_config_wins() {
        let registry = registry();
        let custom = CircuitBreakerConfig {
            failure_threshold: 7,
            ..Default::default()
        };
        registry.get_or_create_with("videos", custom.clone());
        let again = registry.get_or_create_with("videos", CircuitBreakerConfig::default());

        assert_eq!(again.config(), &custom);
    }

    #[tokio::test]
    async fn test_breakers_are_isolated_and_reset_together() {
        let registry = registry();
        let db = registry.get_or_create("firestore");
        let auth = registry.get_or_create("auth");

        let _: Result<()> = db.execute(|| async { Err(Error::remote("boom")) }).await;
        assert_eq!(db.state(), CircuitState::Open);
        assert_eq!(auth.state(), CircuitState::Closed);

        let stats = registry.stats();
        assert_eq!(registry.names(), vec!["auth".to_string(), "firestore".to_string()]);
        assert_eq!(stats[1].state, CircuitState::Open);

        registry.reset_all();
        assert_eq!(db.state(), CircuitState::Closed);
    }
}
