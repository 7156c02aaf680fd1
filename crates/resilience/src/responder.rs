//! Turns failures into caller-facing [`ApiResponse`] envelopes.
//!
//! This is the boundary where errors stop propagating: services call these
//! helpers once the retry and breaker layers have given up.

use crate::classifier::handle_database_error;
use chrono::Utc;
use playbook_core::{
    ApiError, ApiResponse, ApiWarning, Error, RecoveryLogger, CATEGORY_API,
    CATEGORY_DEGRADATION, GRACEFUL_DEGRADATION_CODE, UNKNOWN_ERROR_CODE, UNKNOWN_ERROR_MESSAGE,
};
use serde::Serialize;
use serde_json::json;
use std::future::Future;

/// Build a failure envelope for `error` raised while running `context`.
pub fn create_error_response<T>(
    error: &Error,
    context: &str,
    recovery_actions: Option<Vec<String>>,
    logger: &dyn RecoveryLogger,
) -> ApiResponse<T> {
    let shape = error.shape();
    let api_error = ApiError {
        code: error.code().unwrap_or(UNKNOWN_ERROR_CODE).to_string(),
        message: shape
            .message
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        context: context.to_string(),
        recovery_actions,
        timestamp: Utc::now(),
    };

    logger.error(
        &format!("API error in {context}: {}", api_error.message),
        CATEGORY_API,
        Some(&json!({
            "context": context,
            "code": api_error.code,
            "status": shape.status,
            "recoveryActions": api_error.recovery_actions,
        })),
    );

    ApiResponse::failure(api_error)
}

/// Failure envelope for a database operation, worded for end users.
///
/// The message is the classifier's user message and the recovery actions are
/// its internal actions.
pub fn create_database_error_response<T>(
    error: &Error,
    operation: &str,
    logger: &dyn RecoveryLogger,
) -> ApiResponse<T> {
    let decision = handle_database_error(error, operation, logger);
    ApiResponse::failure(ApiError {
        code: error.code().unwrap_or(UNKNOWN_ERROR_CODE).to_string(),
        message: decision.user_message,
        context: operation.to_string(),
        recovery_actions: Some(decision.internal_actions),
        timestamp: Utc::now(),
    })
}

/// Serve `fallback_data` as a successful but non-authoritative result.
pub fn create_graceful_degradation<T: Serialize>(
    fallback_data: T,
    reason: &str,
    logger: &dyn RecoveryLogger,
) -> ApiResponse<T> {
    logger.warn(
        &format!("Graceful degradation: {reason}"),
        CATEGORY_DEGRADATION,
        Some(&json!({
            "reason": reason,
            "fallbackData": serde_json::to_value(&fallback_data).ok(),
        })),
    );

    ApiResponse::degraded(
        fallback_data,
        ApiWarning {
            code: GRACEFUL_DEGRADATION_CODE.to_string(),
            message: reason.to_string(),
        },
    )
}

/// Await `primary`; if it fails, classify the failure and degrade to the
/// value produced by `fallback`.
pub async fn with_fallback<T, Fut, F>(
    primary: Fut,
    fallback: F,
    operation: &str,
    logger: &dyn RecoveryLogger,
) -> ApiResponse<T>
where
    T: Serialize,
    Fut: Future<Output = Result<T, Error>>,
    F: FnOnce() -> T,
{
    match primary.await {
        Ok(data) => ApiResponse::ok(data),
        Err(error) => {
            let decision = handle_database_error(&error, operation, logger);
            let reason = format!("{operation} served fallback data: {}", decision.user_message);
            create_graceful_degradation(fallback(), &reason, logger)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_core::{LogLevel, MemoryLogger, NoopLogger, CATEGORY_DATABASE};
    use std::time::Duration;

    #[test]
    fn test_error_response_shape() {
        let response: ApiResponse<()> =
            create_error_response(&Error::remote("boom"), "loadUser", None, &NoopLogger);

        assert!(!response.is_success());
        let error = response.error().unwrap();
        assert_eq!(error.message, "boom");
        assert_eq!(error.context, "loadUser");
        assert_eq!(error.code, UNKNOWN_ERROR_CODE);
        assert_eq!(error.timestamp, response.timestamp());
        assert!(response.data().is_none());
    }

    #[test]
    fn test_error_response_uses_error_code_and_actions() {
        let logger = MemoryLogger::new();
        let response: ApiResponse<u32> = create_error_response(
            &Error::remote_with_code("permission-denied", "missing claims"),
            "saveQuiz",
            Some(vec!["refresh_auth_token".to_string()]),
            &logger,
        );

        let error = response.error().unwrap();
        assert_eq!(error.code, "permission-denied");
        assert_eq!(
            error.recovery_actions.as_deref(),
            Some(&["refresh_auth_token".to_string()][..])
        );
        assert!(logger.contains(LogLevel::Error, "saveQuiz"));
    }

    #[test]
    fn test_error_response_without_message_falls_back() {
        let response: ApiResponse<()> =
            create_error_response(&Error::remote(""), "ping", None, &NoopLogger);
        assert_eq!(response.error().unwrap().message, UNKNOWN_ERROR_MESSAGE);

        let timeout: ApiResponse<()> = create_error_response(
            &Error::timeout("ping", Duration::from_millis(5)),
            "ping",
            None,
            &NoopLogger,
        );
        assert_eq!(timeout.error().unwrap().code, "deadline-exceeded");
    }

    #[test]
    fn test_database_error_response() {
        let response: ApiResponse<()> = create_database_error_response(
            &Error::remote_with_code("not-found", "no such doc"),
            "loadSkill",
            &NoopLogger,
        );

        let error = response.error().unwrap();
        assert_eq!(error.code, "not-found");
        assert_eq!(error.message, "The requested resource was not found.");
        assert!(error
            .recovery_actions
            .as_ref()
            .unwrap()
            .contains(&"serve_fallback_data".to_string()));
    }

    #[test]
    fn test_graceful_degradation_envelope() {
        let logger = MemoryLogger::new();
        let response = create_graceful_degradation(vec!["cached"], "videos offline", &logger);

        assert!(response.is_success());
        assert_eq!(response.data(), Some(&vec!["cached"]));
        let warning = response.warning().unwrap();
        assert_eq!(warning.code, GRACEFUL_DEGRADATION_CODE);
        assert_eq!(warning.message, "videos offline");
        assert!(response.error().is_none());

        let entries = logger.in_category(CATEGORY_DEGRADATION);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_with_fallback_passes_success_through() {
        let response = with_fallback(
            async { Ok(vec![1, 2, 3]) },
            Vec::new,
            "loadScores",
            &NoopLogger,
        )
        .await;

        assert!(response.is_success());
        assert!(response.warning().is_none());
        assert_eq!(response.into_result().unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_with_fallback_degrades_on_failure() {
        let logger = MemoryLogger::new();
        let response = with_fallback(
            async { Err::<Vec<u32>, _>(Error::remote_with_code("unavailable", "down")) },
            || vec![0],
            "loadScores",
            &logger,
        )
        .await;

        assert!(response.is_success());
        assert_eq!(response.data(), Some(&vec![0]));
        assert!(response.warning().unwrap().message.contains("loadScores"));
        assert_eq!(logger.in_category(CATEGORY_DATABASE).len(), 1);
        assert_eq!(logger.in_category(CATEGORY_DEGRADATION).len(), 1);
    }
}
