/// Constants shared across the recovery layer
// Log categories
pub const CATEGORY_RETRY: &str = "retry";
pub const CATEGORY_CIRCUIT_BREAKER: &str = "circuit-breaker";
pub const CATEGORY_DATABASE: &str = "database";
pub const CATEGORY_API: &str = "api";
pub const CATEGORY_DEGRADATION: &str = "degradation";
pub const CATEGORY_HEALTH: &str = "health";

// Response envelope codes
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";
pub const GRACEFUL_DEGRADATION_CODE: &str = "GRACEFUL_DEGRADATION";

// Codes attached to errors raised by the recovery layer itself
pub const CIRCUIT_OPEN_CODE: &str = "circuit-open";
pub const DEADLINE_EXCEEDED_CODE: &str = "deadline-exceeded";

// Remote dependency codes with a dedicated recovery mapping
pub const PERMISSION_DENIED_CODE: &str = "permission-denied";
pub const NOT_FOUND_CODE: &str = "not-found";
pub const QUOTA_EXCEEDED_CODE: &str = "quota-exceeded";
pub const NETWORK_TIMEOUT_CODE: &str = "network-timeout";
pub const UNAVAILABLE_CODE: &str = "unavailable";
pub const INTERNAL_CODE: &str = "internal";

/// Remote dependency codes that are transient and worth retrying
pub const TRANSIENT_REMOTE_CODES: &[&str] = &[
    UNAVAILABLE_CODE,
    DEADLINE_EXCEEDED_CODE,
    "resource-exhausted",
    INTERNAL_CODE,
    "cancelled",
    "unknown",
];

/// Message fragments (lowercase) that mark an error as network related
pub const NETWORK_ERROR_FRAGMENTS: &[&str] = &["network", "timeout", "connection", "fetch"];

/// Codes whose occurrence should count against a circuit breaker
pub const CIRCUIT_BREAKING_CODES: &[&str] = &[QUOTA_EXCEEDED_CODE, INTERNAL_CODE, UNAVAILABLE_CODE];
