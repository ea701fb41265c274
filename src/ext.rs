//! Extension trait for annotating the error side of a `Result`

use crate::context::{assert_present, BoxError, ContextKey, DataValue};
use crate::contextual::ContextualError;
use crate::ops::{with_value, wrap};

/// Adds wrapping and context to any `Result` whose error can be boxed
///
/// ```rust
/// use ctx_errors::{ContextKey, ResultExt};
///
/// #[derive(Debug, PartialEq, Eq, Hash)]
/// struct SettingsPath;
///
/// impl ContextKey for SettingsPath {}
///
/// fn read(path: &str) -> Result<String, ctx_errors::ContextualError> {
///     std::fs::read_to_string(path)
///         .wrap_err("reading settings")
///         .with_err_value(SettingsPath, path.to_string())
/// }
///
/// let err = read("/definitely/not/here").unwrap_err();
/// assert_eq!(err.value_as::<String>(&SettingsPath).unwrap(), "/definitely/not/here");
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with a message
    fn wrap_err(self, message: impl Into<String>) -> Result<T, ContextualError>;

    /// Wrap the error with a lazily built message
    fn wrap_err_with<F, M>(self, f: F) -> Result<T, ContextualError>
    where
        F: FnOnce() -> M,
        M: Into<String>;

    /// Attach `key`/`value` to the error, wrapping plain errors first
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent, whether or not the result is an error.
    fn with_err_value<K: ContextKey, V: DataValue>(
        self,
        key: K,
        value: V,
    ) -> Result<T, ContextualError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, message: impl Into<String>) -> Result<T, ContextualError> {
        self.map_err(|e| wrap(e, message))
    }

    fn wrap_err_with<F, M>(self, f: F) -> Result<T, ContextualError>
    where
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.map_err(|e| wrap(e, f()))
    }

    fn with_err_value<K: ContextKey, V: DataValue>(
        self,
        key: K,
        value: V,
    ) -> Result<T, ContextualError> {
        assert_present(&key);
        self.map_err(|e| with_value(e, key, value))
    }
}
