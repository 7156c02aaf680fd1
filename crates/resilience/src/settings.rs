//! Resilience settings loaded from JSON.
//!
//! ```json
//! {
//!   "retry": { "max_attempts": 4, "base_delay_ms": 250 },
//!   "health": { "max_attempts": 2 },
//!   "default_breaker": { "failure_threshold": 5, "reset_timeout_ms": 60000, "timeout_ms": 10000 },
//!   "breakers": { "firestore": { "failure_threshold": 3 } }
//! }
//! ```
//!
//! Every section is optional; missing values fall back to the built-in
//! policies.

use crate::circuit::CircuitBreakerConfig;
use crate::retry::{RetryPolicy, RetryPolicyOverrides};
use playbook_core::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResilienceSettings {
    /// Overrides for the default retry policy
    pub retry: RetryPolicyOverrides,
    /// Overrides for the health-probe retry policy
    pub health: RetryPolicyOverrides,
    /// Config for breakers not listed in `breakers`
    pub default_breaker: CircuitBreakerConfig,
    /// Per-resource breaker config
    pub breakers: BTreeMap<String, CircuitBreakerConfig>,
}

impl ResilienceSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).context("invalid resilience settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| Error::file_system(path, "read", source))?;
        Self::from_json_str(&json).with_context(|| format!("loading {}", path.display()))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_overrides(&self.retry)
    }

    pub fn health_policy(&self) -> RetryPolicy {
        RetryPolicy::for_health_checks().with_overrides(&self.health)
    }

    pub fn validate(&self) -> Result<()> {
        self.retry_policy().validate().context("retry")?;
        self.health_policy().validate().context("health")?;
        self.default_breaker.validate().context("default_breaker")?;
        for (name, config) in &self.breakers {
            config
                .validate()
                .with_context(|| format!("breakers.{name}"))?;
        }
        Ok(())
    }
}

/// Serde helpers for durations written as integer milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match duration {
                Some(duration) => super::serialize(duration, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}
