//! Free functions for building and querying errors
//!
//! `with_value` and `value` accept any error. A plain error is treated as
//! having no context: reading from it finds nothing, and writing to it first
//! wraps it in a [`ContextualError`] with the message [`GENERIC_MESSAGE`].

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::context::{
    downcast_contextual, BoxError, ContextKey, ContextValue, DataValue, PARENT_KEY,
};
use crate::contextual::ContextualError;

/// Message given to the wrapper created when annotating a plain error
pub const GENERIC_MESSAGE: &str = "error";

/// Create a contextual error with an empty context
pub fn new(message: impl Into<String>) -> ContextualError {
    ContextualError::new(message)
}

/// Create a contextual error from format arguments. See [`errorf!`](crate::errorf!).
pub fn errorf(args: fmt::Arguments<'_>) -> ContextualError {
    new(fmt::format(args))
}

/// Wrap `err` in a new contextual error with the given message
///
/// `err` can be any error, contextual or not. Lookups on the result fall
/// through to `err` when it is contextual.
pub fn wrap<E: Into<BoxError>>(err: E, message: impl Into<String>) -> ContextualError {
    ContextualError::new(message).with_error(PARENT_KEY, err)
}

/// Wrap with a formatted message. See [`wrapf!`](crate::wrapf!).
pub fn wrapf<E: Into<BoxError>>(err: E, args: fmt::Arguments<'_>) -> ContextualError {
    wrap(err, fmt::format(args))
}

/// Set `key` to `value` on any error
///
/// A [`ContextualError`], or a `Box` of one, is annotated and returned as is.
/// Any other error is wrapped under [`GENERIC_MESSAGE`] first.
///
/// An `anyhow::Error` boxes its error behind a private type, so it always
/// counts as plain here. Convert it with `ContextualError::from` first to
/// annotate the contextual error it holds.
///
/// # Panics
///
/// Panics if `key` is absent (`None`).
pub fn with_value<E, K, V>(err: E, key: K, value: V) -> ContextualError
where
    E: Into<BoxError>,
    K: ContextKey,
    V: DataValue,
{
    let err: BoxError = err.into();
    let err = match err.downcast::<ContextualError>() {
        Ok(contextual) => return (*contextual).with_value(key, value),
        Err(err) => err,
    };

    match err.downcast::<Box<ContextualError>>() {
        Ok(boxed) => {
            let contextual: ContextualError = **boxed;
            contextual.with_value(key, value)
        }
        Err(plain) => {
            tracing::trace!(error = %plain, "Wrapping plain error to attach context");
            wrap(plain, GENERIC_MESSAGE).with_value(key, value)
        }
    }
}

/// Look up `key` on any error. Plain errors never have context.
///
/// For an `anyhow::Error`, pass `&*err`: it derefs to the error it holds.
pub fn value<'a, K: ContextKey>(
    err: &'a (dyn StdError + 'static),
    key: &K,
) -> Option<&'a ContextValue> {
    downcast_contextual(err)?.value(key)
}

/// Like [`value`], downcast to `T`.
pub fn value_as<'a, T: Any>(
    err: &'a (dyn StdError + 'static),
    key: &impl ContextKey,
) -> Option<&'a T> {
    value(err, key)?.downcast_ref::<T>()
}
