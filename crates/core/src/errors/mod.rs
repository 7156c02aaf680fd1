//! Error types and result extensions for recovery-layer operations

mod builders;
mod conversions;
mod display;
mod extensions;
mod shape;
mod types;

pub use extensions::*;
pub use shape::ErrorShape;
pub use types::{Error, Result};
