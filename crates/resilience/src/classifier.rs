//! Error classification: is a failure worth retrying, and how should the
//! application recover from it.

use playbook_core::{
    Error, ErrorShape, RecoveryLogger, RecoveryStrategy, CATEGORY_DATABASE,
    CIRCUIT_BREAKING_CODES, NETWORK_ERROR_FRAGMENTS, NETWORK_TIMEOUT_CODE, NOT_FOUND_CODE,
    PERMISSION_DENIED_CODE, QUOTA_EXCEEDED_CODE, TRANSIENT_REMOTE_CODES, UNAVAILABLE_CODE,
};
use serde::Serialize;
use serde_json::json;

/// Decide whether a failure with this shape is likely to succeed on retry.
///
/// `None` stands for "no error information at all" and is never retryable.
pub fn is_retryable(shape: Option<&ErrorShape>) -> bool {
    let Some(shape) = shape else {
        return false;
    };

    if let Some(message) = &shape.message {
        let message = message.to_lowercase();
        if NETWORK_ERROR_FRAGMENTS
            .iter()
            .any(|fragment| message.contains(fragment))
        {
            return true;
        }
    }

    if let Some(code) = &shape.code {
        if TRANSIENT_REMOTE_CODES.contains(&code.as_str()) {
            return true;
        }
    }

    match shape.status {
        Some(status) => status >= 500 || status == 429 || status == 408,
        None => false,
    }
}

/// [`is_retryable`] applied to a recovery-layer error
pub fn is_retryable_error(error: &Error) -> bool {
    is_retryable(Some(&error.shape()))
}

/// How the application should react to a failed database operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseErrorDecision {
    pub recovery_strategy: RecoveryStrategy,
    /// Plain-language text safe to show to end users
    pub user_message: String,
    /// Suggested follow-ups for the calling service
    pub internal_actions: Vec<String>,
    pub is_retryable: bool,
    pub should_circuit_break: bool,
}

/// Map a failed database operation to a recovery decision and log it.
pub fn handle_database_error(
    error: &Error,
    operation: &str,
    logger: &dyn RecoveryLogger,
) -> DatabaseErrorDecision {
    let code = error.code();

    let (recovery_strategy, user_message, internal_actions, is_retryable): (
        RecoveryStrategy,
        &str,
        &[&str],
        bool,
    ) = match code {
        Some(PERMISSION_DENIED_CODE) => (
            RecoveryStrategy::AuthRefresh,
            "You don't have permission to perform this action. Please sign in again.",
            &["refresh_auth_token", "verify_user_permissions"],
            false,
        ),
        Some(NOT_FOUND_CODE) => (
            RecoveryStrategy::Fallback,
            "The requested resource was not found.",
            &["serve_fallback_data", "verify_resource_reference"],
            false,
        ),
        Some(QUOTA_EXCEEDED_CODE) => (
            RecoveryStrategy::Backoff,
            "The service is temporarily unavailable due to high demand. Please try again shortly.",
            &["apply_exponential_backoff", "reduce_request_rate"],
            true,
        ),
        Some(NETWORK_TIMEOUT_CODE | UNAVAILABLE_CODE) => (
            RecoveryStrategy::RetryWithBackoff,
            "Connection timeout. Please check your internet connection and try again.",
            &["retry_with_backoff", "check_network_connectivity"],
            true,
        ),
        _ if is_retryable_error(error) => (
            RecoveryStrategy::Retry,
            "A temporary error occurred. Retrying your request.",
            &["retry_operation"],
            true,
        ),
        _ => (
            RecoveryStrategy::ManualIntervention,
            "An unexpected error occurred. Please contact support if the problem persists.",
            &["report_to_support", "capture_diagnostics"],
            false,
        ),
    };

    let should_circuit_break = code.is_some_and(|code| CIRCUIT_BREAKING_CODES.contains(&code));

    let decision = DatabaseErrorDecision {
        recovery_strategy,
        user_message: user_message.to_string(),
        internal_actions: internal_actions.iter().map(|a| a.to_string()).collect(),
        is_retryable,
        should_circuit_break,
    };

    let detail = json!({
        "operation": operation,
        "code": code,
        "error": error.to_string(),
        "recoveryStrategy": decision.recovery_strategy,
        "shouldCircuitBreak": decision.should_circuit_break,
    });
    let message = format!(
        "Database operation '{operation}' failed, recovery strategy: {}",
        decision.recovery_strategy
    );
    if decision.recovery_strategy == RecoveryStrategy::ManualIntervention {
        logger.error(&message, CATEGORY_DATABASE, Some(&detail));
    } else {
        logger.warn(&message, CATEGORY_DATABASE, Some(&detail));
    }

    decision
}
