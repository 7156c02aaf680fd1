//! Core domain types, errors, and constants for playbook's database
//! error-recovery layer.
//!
//! This crate holds the pieces every other part of the recovery layer agrees
//! on. It has no async code and no policy of its own.
//!
//! ## Key Components
//!
//! - **`errors`**: The `Error` enum and `Result` alias, plus [`ErrorShape`],
//!   the narrow `message`/`code`/`status` view that classification runs on.
//! - **`types`**: The caller-facing [`ApiResponse`] envelope and the
//!   [`RecoveryStrategy`] labels.
//! - **`logging`**: The injected [`RecoveryLogger`] seam with tracing, no-op
//!   and in-memory implementations.
//! - **`constants`**: Log categories and well-known error codes.

pub mod constants;
pub mod errors;
pub mod logging;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, ErrorShape, Result, ResultExt},
    logging::{LogEntry, LogLevel, MemoryLogger, NoopLogger, RecoveryLogger, TracingLogger},
    types::{ApiError, ApiResponse, ApiWarning, RecoveryStrategy},
};
