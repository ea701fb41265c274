//! The contextual error type
//!
//! A [`ContextualError`] is a message plus a lazily allocated context map. A
//! wrapped error is stored in that same map under [`PARENT_KEY`], and lookups
//! fall through to it when the key is not set locally.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::chain::Chain;
use crate::context::{
    assert_present, BoxError, Context, ContextKey, ContextValue, DataValue, KeyRef, PARENT_KEY,
};
use crate::render::{self, RenderConfig, Rendered};

/// An error carrying a message and key/value context
///
/// The context is owned by this error alone. Mutation goes through `&mut self`
/// or consumes the error, so sharing one across threads while annotating it
/// needs external synchronization.
///
/// Lookups and dropping walk the wrap chain in a loop, so chains of any depth
/// are fine. Default `Display` and `Debug` recurse once per nested contextual
/// error; render very deep chains with a bounded
/// [`RenderConfig::max_depth`] or with `{:#}`.
pub struct ContextualError {
    message: String,
    context: Option<Context>,
}

impl ContextualError {
    /// Create an error with an empty context
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Set `key` to `value` and return the error, for chaining
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent (`None`).
    pub fn with_value<K: ContextKey, V: DataValue>(mut self, key: K, value: V) -> Self {
        self.set_value(key, value);
        self
    }

    /// Set `key` to `value` in place
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent (`None`).
    pub fn set_value<K: ContextKey, V: DataValue>(&mut self, key: K, value: V) -> &mut Self {
        self.insert(key, ContextValue::Data(Box::new(value)))
    }

    /// Store an error under `key`. It renders with `Display` and, under
    /// [`PARENT_KEY`], becomes this error's parent.
    pub fn with_error<K, E>(mut self, key: K, err: E) -> Self
    where
        K: ContextKey,
        E: Into<BoxError>,
    {
        self.set_error(key, err);
        self
    }

    pub fn set_error<K, E>(&mut self, key: K, err: E) -> &mut Self
    where
        K: ContextKey,
        E: Into<BoxError>,
    {
        self.insert(key, ContextValue::Error(err.into()))
    }

    fn insert<K: ContextKey>(&mut self, key: K, value: ContextValue) -> &mut Self {
        assert_present(&key);
        self.context
            .get_or_insert_with(Context::default)
            .insert(key, value);
        self
    }

    /// Look up `key` here, then in each contextual parent in turn
    ///
    /// The nearest error that sets the key wins, so newer context shadows
    /// older context. Returns `None` when no error in the chain sets it.
    pub fn value<K: ContextKey>(&self, key: &K) -> Option<&ContextValue> {
        let mut current = self;
        loop {
            if let Some(found) = current.own_value(key) {
                return Some(found);
            }
            current = current.contextual_parent()?;
        }
    }

    /// Like [`value`](Self::value), downcast to `T`.
    pub fn value_as<T: Any>(&self, key: &impl ContextKey) -> Option<&T> {
        self.value(key)?.downcast_ref::<T>()
    }

    fn own_value<K: ContextKey>(&self, key: &K) -> Option<&ContextValue> {
        self.context.as_ref()?.get(key)
    }

    /// Whether `key` is set on this error itself, ignoring parents.
    pub fn contains_key<K: ContextKey>(&self, key: &K) -> bool {
        self.own_value(key).is_some()
    }

    /// The error stored under [`PARENT_KEY`], contextual or not.
    pub fn parent(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.own_value(&PARENT_KEY)?.as_error()
    }

    /// The parent, if it is itself contextual. Lookups only continue
    /// through this.
    pub fn contextual_parent(&self) -> Option<&ContextualError> {
        self.own_value(&PARENT_KEY)?.as_contextual()
    }

    pub fn has_context(&self) -> bool {
        self.context_len() > 0
    }

    pub fn context_len(&self) -> usize {
        self.context.as_ref().map_or(0, Context::len)
    }

    /// This error's own entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (KeyRef<'_>, &ContextValue)> {
        self.context
            .as_ref()
            .map(Context::entries)
            .unwrap_or_default()
            .into_iter()
    }

    /// Iterate this error and everything reachable through `source()`.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// The innermost error of the chain; `self` if nothing is wrapped.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut cause: &(dyn StdError + 'static) = self;
        while let Some(next) = cause.source() {
            cause = next;
        }
        cause
    }

    fn take_contextual_parent(&mut self) -> Option<Box<ContextualError>> {
        let context = self.context.as_mut()?;
        if context.get(&PARENT_KEY)?.as_contextual().is_none() {
            return None;
        }
        context.remove(&PARENT_KEY)?.into_contextual()
    }

    pub fn display_with<'a>(&'a self, config: &'a RenderConfig) -> Rendered<'a> {
        Rendered::new(self, config)
    }

    pub fn render(&self, config: &RenderConfig) -> String {
        self.display_with(config).to_string()
    }
}

impl fmt::Display for ContextualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return render::write_message_chain(self, f);
        }
        render::write_error(self, RenderConfig::default_ref(), 0, f)
    }
}

impl fmt::Debug for ContextualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a>(&'a ContextualError);

        impl fmt::Debug for Entries<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.entries()).finish()
            }
        }

        f.debug_struct("ContextualError")
            .field("message", &self.message)
            .field("context", &Entries(self))
            .finish()
    }
}

impl Drop for ContextualError {
    fn drop(&mut self) {
        let mut next = self.take_contextual_parent();
        while let Some(mut parent) = next {
            next = parent.take_contextual_parent();
        }
    }
}

impl StdError for ContextualError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.parent()
            .map(|parent| parent as &(dyn StdError + 'static))
    }
}
