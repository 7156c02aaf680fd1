//! One object that carries the logger, policies and breakers a service needs.
//!
//! Build it once at startup (usually from [`ResilienceSettings`]) and pass it
//! to the services that talk to the remote database.

use crate::circuit::{CircuitBreaker, CircuitBreakerRegistry};
use crate::classifier::{handle_database_error, DatabaseErrorDecision};
use crate::health::{validate_dependencies_with, DependencyChecks, HealthReport};
use crate::responder::{create_error_response, create_graceful_degradation};
use crate::retry::{with_retry, with_retry_and_breaker, RetryPolicy, RetryPolicyOverrides};
use crate::settings::ResilienceSettings;
use playbook_core::{ApiResponse, Error, RecoveryLogger, Result};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

pub struct RecoveryKit {
    logger: Arc<dyn RecoveryLogger>,
    retry_policy: RetryPolicy,
    health_policy: RetryPolicy,
    breakers: CircuitBreakerRegistry,
}

impl RecoveryKit {
    /// Kit with the built-in policies and default breaker config
    pub fn new(logger: Arc<dyn RecoveryLogger>) -> Self {
        Self {
            retry_policy: RetryPolicy::default(),
            health_policy: RetryPolicy::for_health_checks(),
            breakers: CircuitBreakerRegistry::new(Arc::clone(&logger)),
            logger,
        }
    }

    /// Kit built from validated settings. Breakers named in the settings are
    /// registered up front with their own config.
    pub fn from_settings(settings: &ResilienceSettings, logger: Arc<dyn RecoveryLogger>) -> Result<Self> {
        settings.validate()?;

        let breakers =
            CircuitBreakerRegistry::with_default_config(settings.default_breaker.clone(), Arc::clone(&logger));
        for (name, config) in &settings.breakers {
            breakers.get_or_create_with(name, config.clone());
        }

        Ok(Self {
            retry_policy: settings.retry_policy(),
            health_policy: settings.health_policy(),
            breakers,
            logger,
        })
    }

    pub fn logger(&self) -> &dyn RecoveryLogger {
        self.logger.as_ref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn health_policy(&self) -> &RetryPolicy {
        &self.health_policy
    }

    pub fn breakers(&self) -> &CircuitBreakerRegistry {
        &self.breakers
    }

    pub fn breaker(&self, name: &str) -> Arc<CircuitBreaker> {
        self.breakers.get_or_create(name)
    }

    /// Retry with the kit's default policy
    pub async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        with_retry(&self.retry_policy, self.logger(), operation).await
    }

    /// Retry with per-call overrides layered on the kit's default policy
    pub async fn with_retry_overrides<F, Fut, T>(
        &self,
        overrides: &RetryPolicyOverrides,
        operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let policy = self.retry_policy.with_overrides(overrides);
        policy.validate()?;
        with_retry(&policy, self.logger(), operation).await
    }

    /// Retry through the breaker registered under `resource`
    pub async fn guarded<F, Fut, T>(&self, resource: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let breaker = self.breaker(resource);
        with_retry_and_breaker(&self.retry_policy, &breaker, self.logger(), operation).await
    }

    pub fn handle_database_error(&self, error: &Error, operation: &str) -> DatabaseErrorDecision {
        handle_database_error(error, operation, self.logger())
    }

    pub fn error_response<T>(
        &self,
        error: &Error,
        context: &str,
        recovery_actions: Option<Vec<String>>,
    ) -> ApiResponse<T> {
        create_error_response(error, context, recovery_actions, self.logger())
    }

    pub fn graceful_degradation<T: Serialize>(&self, fallback_data: T, reason: &str) -> ApiResponse<T> {
        create_graceful_degradation(fallback_data, reason, self.logger())
    }

    pub async fn validate_dependencies(&self, checks: &DependencyChecks) -> HealthReport {
        validate_dependencies_with(checks, &self.health_policy, self.logger()).await
    }
}

impl std::fmt::Debug for RecoveryKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryKit")
            .field("retry_policy", &self.retry_policy)
            .field("health_policy", &self.health_policy)
            .field("breakers", &self.breakers.names())
            .finish()
    }
}
