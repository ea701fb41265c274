//! Errors reported by the crate itself
//!
//! These are ordinary typed errors for configuration loading. They are
//! unrelated to [`ContextualError`](crate::ContextualError), which is what
//! the crate builds for its callers.

pub mod types;

pub use types::{ConfigError, ConfigResult};
