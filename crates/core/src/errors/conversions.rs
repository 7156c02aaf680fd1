//! Conversion implementations for error types

use super::shape::ErrorShape;
use super::types::Error;
use std::path::PathBuf;

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

/// Boundary conversion for errors arriving from an external client that only
/// exposes loose `message`/`code`/`status` fields.
impl From<ErrorShape> for Error {
    fn from(shape: ErrorShape) -> Self {
        Error::Remote {
            message: shape.message.unwrap_or_default(),
            code: shape.code,
            status: shape.status,
        }
    }
}
