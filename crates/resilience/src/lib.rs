//! Error recovery for playbook's remote database.
//!
//! Services that talk to the database wrap their calls with the pieces in
//! this crate:
//!
//! - **`classifier`**: Decides whether a failure is retryable and maps it to a
//!   recovery strategy.
//! - **`retry`**: Re-invokes an operation with exponential backoff and jitter.
//! - **`circuit`**: Per-resource circuit breakers and their registry.
//! - **`responder`**: Turns failures into `ApiResponse` envelopes, including
//!   graceful degradation to fallback data.
//! - **`health`**: Concurrent reachability probes for dependencies.
//! - **`kit`**: Bundles a logger, policies and breakers for a service.
//! - **`settings`**: JSON configuration for all of the above.
//!
//! ```rust,no_run
//! use playbook_core::TracingLogger;
//! use playbook_resilience::{RecoveryKit, ResilienceSettings};
//! use std::sync::Arc;
//!
//! # async fn example() -> playbook_core::Result<()> {
//! let settings = ResilienceSettings::from_path("resilience.json")?;
//! let kit = RecoveryKit::from_settings(&settings, Arc::new(TracingLogger))?;
//!
//! let course = kit
//!     .guarded("firestore", || async { Ok("course-42".to_string()) })
//!     .await;
//! let response = match course {
//!     Ok(course) => playbook_core::ApiResponse::ok(course),
//!     Err(error) => kit.error_response(&error, "loadCourse", None),
//! };
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

pub mod circuit;
pub mod classifier;
pub mod health;
pub mod kit;
pub mod responder;
pub mod retry;
pub mod settings;
pub mod telemetry;

pub use circuit::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitBreakerStats,
    CircuitState,
};
pub use classifier::{handle_database_error, is_retryable, is_retryable_error, DatabaseErrorDecision};
pub use health::{
    validate_dependencies, validate_dependencies_with, DependencyChecks, HealthProbe, HealthReport,
};
pub use kit::RecoveryKit;
pub use responder::{
    create_database_error_response, create_error_response, create_graceful_degradation,
    with_fallback,
};
pub use retry::{with_retry, with_retry_and_breaker, RetryOn, RetryPolicy, RetryPolicyOverrides};
pub use settings::ResilienceSettings;
pub use telemetry::init_tracing;
