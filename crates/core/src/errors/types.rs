//! Core error type definitions

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for recovery-layer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for recovery-layer operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the remote document database or backend API.
    ///
    /// `code` is the remote's symbolic code (`unavailable`, `not-found`, ...),
    /// `status` an HTTP-style status when the client exposes one.
    Remote {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    /// A circuit breaker rejected the call without running it
    CircuitOpen { name: String },

    /// Operation timeout errors
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
