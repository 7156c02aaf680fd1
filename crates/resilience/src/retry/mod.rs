//! Retry executor with exponential backoff and jitter.
//!
//! - [`policy`] - [`RetryPolicy`], its overrides and the backoff curve
//! - [`executor`] - [`with_retry`] and the breaker-guarded variant

pub mod executor;
pub mod policy;

pub use executor::{with_retry, with_retry_and_breaker};
pub use policy::{RetryOn, RetryPolicy, RetryPolicyOverrides};
