//! Narrow classification view over heterogeneous errors

use super::types::Error;
use crate::constants::{CIRCUIT_OPEN_CODE, DEADLINE_EXCEEDED_CODE};
use serde::{Deserialize, Serialize};

/// The three facts the recovery layer looks at when classifying a failure.
///
/// External clients report errors with an optional message, an optional
/// symbolic code and an optional HTTP-style status. Everything that enters
/// the layer is reduced to this shape before any decision is made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub message: Option<String>,
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl ErrorShape {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Error {
    /// Reduce this error to its classification shape
    pub fn shape(&self) -> ErrorShape {
        match self {
            Error::Remote {
                message,
                code,
                status,
            } => ErrorShape {
                message: (!message.is_empty()).then(|| message.clone()),
                code: code.clone(),
                status: *status,
            },
            // The breaker name stays out of the message so it never matches
            // a network fragment.
            Error::CircuitOpen { .. } => ErrorShape {
                message: Some("circuit breaker is OPEN".to_string()),
                code: Some(CIRCUIT_OPEN_CODE.to_string()),
                status: None,
            },
            Error::Timeout { .. } => ErrorShape {
                message: Some(self.to_string()),
                code: Some(DEADLINE_EXCEEDED_CODE.to_string()),
                status: None,
            },
            _ => ErrorShape {
                message: Some(self.to_string()),
                code: None,
                status: None,
            },
        }
    }

    /// Symbolic code carried by this error, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Remote { code, .. } => code.as_deref(),
            Error::CircuitOpen { .. } => Some(CIRCUIT_OPEN_CODE),
            Error::Timeout { .. } => Some(DEADLINE_EXCEEDED_CODE),
            _ => None,
        }
    }
}
