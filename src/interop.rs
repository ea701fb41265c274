//! Conversion from `anyhow::Error`
//!
//! `anyhow::Error` keeps the error it holds behind a private type, so the free
//! [`with_value`](crate::with_value) sees it as a plain error and wraps it.
//! Convert it with `ContextualError::from` (or `?` into a
//! `Result<_, ContextualError>`) to get the contextual error back. Layers
//! added with `anyhow::Context` become the message of a wrapper around it.

use crate::context::downcast_contextual;
use crate::contextual::ContextualError;
use crate::ops::{wrap, GENERIC_MESSAGE};

impl From<anyhow::Error> for ContextualError {
    fn from(err: anyhow::Error) -> Self {
        let layers: Vec<String> = err
            .chain()
            .take_while(|cause| downcast_contextual(*cause).is_none())
            .map(ToString::to_string)
            .collect();

        let found = match err.downcast::<ContextualError>() {
            Ok(contextual) => Ok(contextual),
            Err(err) => err.downcast::<Box<ContextualError>>().map(|boxed| *boxed),
        };

        match found {
            Ok(contextual) if layers.is_empty() => contextual,
            Ok(contextual) => wrap(contextual, layers.join(": ")),
            Err(other) => {
                tracing::trace!(error = %other, "No contextual error inside anyhow error");
                wrap(other, GENERIC_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new, with_value, ContextKey};

    #[derive(Debug, PartialEq, Eq, Hash)]
    enum Field {
        Code,
        Attempt,
    }

    impl ContextKey for Field {}

    #[test]
    fn test_direct_contextual_error_is_unwrapped() {
        let err = anyhow::Error::new(new("foo err").with_value(Field::Code, 1));
        let err = ContextualError::from(err);

        assert_eq!(err.message(), "foo err");
        assert!(err.parent().is_none());
        assert_eq!(err.value_as::<i32>(&Field::Code), Some(&1));
    }

    #[test]
    fn test_context_layers_become_the_wrapper_message() {
        let err = anyhow::Error::new(new("foo err").with_value(Field::Code, 1))
            .context("loading sessions")
            .context("starting up");
        let err = with_value(ContextualError::from(err), Field::Attempt, 2);

        assert_eq!(err.message(), "starting up: loading sessions");
        assert_eq!(err.contextual_parent().unwrap().message(), "foo err");
        assert_eq!(err.value_as::<i32>(&Field::Code), Some(&1));
        assert_eq!(err.value_as::<i32>(&Field::Attempt), Some(&2));
    }

    #[test]
    fn test_boxed_contextual_error_is_unboxed() {
        let boxed = Box::new(new("foo err").with_value(Field::Code, 4));
        let err = ContextualError::from(anyhow::Error::new(boxed));

        assert_eq!(err.message(), "foo err");
        assert_eq!(err.value_as::<i32>(&Field::Code), Some(&4));
    }

    #[test]
    fn test_plain_anyhow_error_is_wrapped() {
        let err = ContextualError::from(anyhow::anyhow!("disk full"));

        assert_eq!(err.message(), GENERIC_MESSAGE);
        assert!(err.contextual_parent().is_none());
        assert_eq!(err.parent().unwrap().to_string(), "disk full");
    }
}
