//! Extension traits for error handling

use super::types::{Error, Result};

impl Error {
    /// Prefix the error with caller context.
    ///
    /// Every variant is kept, along with its code, status and source, so
    /// classification still sees the original failure.
    #[must_use]
    pub fn in_context(self, context: &str) -> Self {
        match self {
            Error::Remote {
                message,
                code,
                status,
            } => Error::Remote {
                message: if message.is_empty() {
                    context.to_string()
                } else {
                    format!("{context}: {message}")
                },
                code,
                status,
            },
            Error::Timeout {
                operation,
                duration,
            } => Error::Timeout {
                operation: format!("{context}: {operation}"),
                duration,
            },
            Error::CircuitOpen { name } => Error::CircuitOpen { name },
            Error::Configuration { message } => Error::Configuration {
                message: format!("{context}: {message}"),
            },
            Error::FileSystem {
                path,
                operation,
                source,
            } => Error::FileSystem {
                path,
                operation: format!("{context}: {operation}"),
                source,
            },
            Error::Json { message, source } => Error::Json {
                message: format!("{context}: {message}"),
                source,
            },
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().in_context(&message.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().in_context(&f()))
    }
}
