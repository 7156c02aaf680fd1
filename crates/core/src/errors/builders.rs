//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a remote error carrying only a message
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Error::Remote {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    /// Create a remote error carrying the remote's symbolic code
    #[must_use]
    pub fn remote_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Remote {
            message: message.into(),
            code: Some(code.into()),
            status: None,
        }
    }

    /// Create a remote error carrying an HTTP-style status
    #[must_use]
    pub fn remote_with_status(status: u16, message: impl Into<String>) -> Self {
        Error::Remote {
            message: message.into(),
            code: None,
            status: Some(status),
        }
    }

    /// Create a circuit-open rejection for the named breaker
    #[must_use]
    pub fn circuit_open(name: impl Into<String>) -> Self {
        Error::CircuitOpen { name: name.into() }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
