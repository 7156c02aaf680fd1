//! Circuit breakers for the remote dependency.
//!
//! A breaker guards one named resource. After enough consecutive failures it
//! opens and rejects calls outright; once the reset timeout has passed it lets
//! calls through again in a half-open trial, closing after three successes.
//!
//! ## Architecture
//!
//! - [`types`] - `CircuitState` and the `CircuitBreakerStats` snapshot
//! - [`config`] - Per-breaker thresholds and timeouts
//! - [`metrics`] - Counters guarded by the breaker's lock
//! - [`transitions`] - State transition rules applied to the counters
//! - [`state`] - `CircuitBreaker` itself: admission, timeout race, logging
//! - [`registry`] - Named breakers owned by the composition root
//!
//! ## Examples
//!
//! ```rust,no_run
//! use playbook_core::TracingLogger;
//! use playbook_resilience::circuit::{CircuitBreaker, CircuitBreakerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> playbook_core::Result<String> {
//! let breaker = CircuitBreaker::new("firestore", CircuitBreakerConfig::default(), Arc::new(TracingLogger));
//!
//! breaker.execute(|| async {
//!     // Your operation here
//!     Ok("course-42".to_string())
//! }).await
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod registry;
pub mod state;
pub mod transitions;
pub mod types;

// Re-export public API
pub use config::{CircuitBreakerConfig, HALF_OPEN_SUCCESS_THRESHOLD};
pub use registry::CircuitBreakerRegistry;
pub use state::CircuitBreaker;
pub use types::{CircuitBreakerStats, CircuitState};
