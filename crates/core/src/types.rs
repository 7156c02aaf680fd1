//! Caller-facing result envelope and recovery strategy labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// High-level way of recovering from a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStrategy {
    Retry,
    RetryWithBackoff,
    AuthRefresh,
    Fallback,
    Backoff,
    ManualIntervention,
}

impl RecoveryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::RetryWithBackoff => "retry-with-backoff",
            Self::AuthRefresh => "auth-refresh",
            Self::Fallback => "fallback",
            Self::Backoff => "backoff",
            Self::ManualIntervention => "manual-intervention",
        }
    }
}

impl fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure payload of an [`ApiResponse`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_actions: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

/// Marks a successful response as not fully authoritative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiWarning {
    pub code: String,
    pub message: String,
}

/// Uniform result envelope handed to service-layer callers.
///
/// Either `success` with `data`, or a failure with `error`. Degraded
/// successes additionally carry a `warning`. Instances are immutable once
/// built; construct them through [`ApiResponse::ok`] or the responder helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warning: Option<ApiWarning>,
    timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Authoritative success
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            warning: None,
            timestamp: Utc::now(),
        }
    }

    /// Success backed by non-authoritative data
    pub fn degraded(data: T, warning: ApiWarning) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            warning: Some(warning),
            timestamp: Utc::now(),
        }
    }

    /// Failure; the envelope shares the error's timestamp
    pub fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            timestamp: error.timestamp,
            error: Some(error),
            warning: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn warning(&self) -> Option<&ApiWarning> {
        self.warning.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Split into data or error, dropping any warning
    pub fn into_result(self) -> std::result::Result<Option<T>, ApiError> {
        match self.error {
            Some(error) if !self.success => Err(error),
            _ => Ok(self.data),
        }
    }
}
