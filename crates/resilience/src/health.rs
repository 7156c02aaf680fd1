//! Reachability checks for the application's external dependencies.
//!
//! Each probe answers "is this dependency usable right now". Probes run
//! concurrently through the retry executor with the reduced health-check
//! budget and never touch circuit breaker state.

use crate::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use futures::future::join_all;
use playbook_core::{RecoveryLogger, Result, CATEGORY_HEALTH};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::future::Future;

/// A lightweight liveness check for one dependency
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `Ok(true)` when healthy, `Ok(false)` when reachable but unhealthy
    async fn check(&self) -> Result<bool>;
}

/// Closure probes. The returned future is boxed by `async_trait`, so it may
/// not borrow from the closure; share a client by moving an `Arc` in and
/// cloning it into each future.
#[async_trait]
impl<F, Fut> HealthProbe for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    async fn check(&self) -> Result<bool> {
        (self)().await
    }
}

/// Named probes, reported in the order they were added
#[derive(Default)]
pub struct DependencyChecks {
    probes: Vec<(String, Box<dyn HealthProbe>)>,
}

impl DependencyChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`add`](Self::add)
    pub fn with(mut self, name: impl Into<String>, probe: impl HealthProbe + 'static) -> Self {
        self.add(name, probe);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, probe: impl HealthProbe + 'static) {
        self.probes.push((name.into(), Box::new(probe)));
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.probes.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for DependencyChecks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Aggregate result of [`validate_dependencies`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// True iff `issues` is empty
    pub healthy: bool,
    pub issues: Vec<String>,
}

/// Probe every dependency with [`RetryPolicy::for_health_checks`].
pub async fn validate_dependencies(
    checks: &DependencyChecks,
    logger: &dyn RecoveryLogger,
) -> HealthReport {
    validate_dependencies_with(checks, &RetryPolicy::for_health_checks(), logger).await
}

/// Probe every dependency with an explicit retry policy.
pub async fn validate_dependencies_with(
    checks: &DependencyChecks,
    policy: &RetryPolicy,
    logger: &dyn RecoveryLogger,
) -> HealthReport {
    let probes = checks.probes.iter().map(|(name, probe)| async move {
        match with_retry(policy, logger, || probe.check()).await {
            Ok(true) => None,
            Ok(false) => Some(format!("Dependency {name} is not healthy")),
            Err(error) => Some(format!("Dependency {name} failed health check: {error}")),
        }
    });

    let issues: Vec<String> = join_all(probes).await.into_iter().flatten().collect();
    let report = HealthReport {
        healthy: issues.is_empty(),
        issues,
    };

    if report.healthy {
        logger.debug(
            &format!("All {} dependencies healthy", checks.len()),
            CATEGORY_HEALTH,
            None,
        );
    } else {
        logger.error(
            "Dependency validation failed",
            CATEGORY_HEALTH,
            Some(&json!({ "issues": report.issues })),
        );
    }

    report
}
