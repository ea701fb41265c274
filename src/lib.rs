//! Errors that carry key/value context up the call chain
//!
//! Each layer of a program can attach its own context to an error and wrap it
//! before returning it. Any caller further up can then read the context set by
//! any layer below, without knowing which concrete error types were involved.
//!
//! ```rust
//! use ctx_errors::{new, value_as, wrap, ContextKey, ContextualError};
//!
//! #[derive(Debug, PartialEq, Eq, Hash)]
//! enum StoreKey { Code }
//! impl ContextKey for StoreKey {}
//!
//! #[derive(Debug, PartialEq, Eq, Hash)]
//! enum ApiKey { Code }
//! impl ContextKey for ApiKey {}
//!
//! fn store() -> Result<(), ContextualError> {
//!     Err(new("foo err").with_value(StoreKey::Code, 1))
//! }
//!
//! fn api() -> Result<(), ContextualError> {
//!     store().map_err(|err| wrap(err, "bar err").with_value(ApiKey::Code, 2))
//! }
//!
//! let err = api().unwrap_err();
//! assert_eq!(value_as::<i32>(&err, &StoreKey::Code), Some(&1));
//! assert_eq!(value_as::<i32>(&err, &ApiKey::Code), Some(&2));
//! ```
//!
//! A wrapped error is stored in the wrapper's context under [`PARENT_KEY`].
//! Lookups check the error itself first and then each contextual parent, so
//! the context nearest to the caller wins.
//!
//! An `anyhow::Error` hides its inner error from these functions. Convert it
//! with `ContextualError::from` before annotating or querying it.

pub mod chain;
pub mod context;
pub mod contextual;
pub mod errors;
pub mod ext;
pub mod interop;
mod macros;
pub mod ops;
pub mod render;

// Re-export commonly used types for convenience
pub use chain::Chain;
pub use context::{BoxError, ContextKey, ContextValue, DataValue, KeyRef, ParentKey, PARENT_KEY};
pub use contextual::ContextualError;
pub use errors::{ConfigError, ConfigResult};
pub use ext::ResultExt;
pub use ops::{errorf, new, value, value_as, with_value, wrap, wrapf, GENERIC_MESSAGE};
pub use render::{RenderConfig, Rendered};
