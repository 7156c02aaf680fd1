//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Remote {
                message,
                code,
                status,
            } => {
                write!(f, "remote error")?;
                if let Some(code) = code {
                    write!(f, " [{code}]")?;
                }
                if let Some(status) = status {
                    write!(f, " (status {status})")?;
                }
                if message.is_empty() {
                    Ok(())
                } else {
                    write!(f, ": {message}")
                }
            }
            Error::CircuitOpen { name } => {
                write!(f, "circuit breaker '{name}' is OPEN")
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "operation '{operation}' exceeded timeout of {duration:?}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
