//! Context keys, context values and the per-error context store
//!
//! Keys are type-erased on insertion. Two keys are the same key only when they
//! have the same concrete type and compare equal, so a `u8` key `1` and an
//! `i32` key `1` never collide. Packages should still define their own key
//! types rather than reuse primitives.

use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::contextual::ContextualError;

/// Boxed error accepted wherever an inner error can be stored
pub type BoxError = Box<dyn StdError + Send + Sync>;

pub(crate) const ABSENT_KEY_MESSAGE: &str = "context key must not be absent";

/// A type usable as a context key
///
/// Implement it for a dedicated key type per package:
///
/// ```rust
/// use ctx_errors::ContextKey;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum StorageKey {
///     Table,
///     RowId,
/// }
///
/// impl ContextKey for StorageKey {}
/// ```
pub trait ContextKey: Any + Eq + Hash + fmt::Debug + Send + Sync {
    /// Whether this key is the "no key" sentinel.
    ///
    /// Only `None` of an `Option<K>` key returns true. Passing an absent key
    /// to any `with_value`/`set_value` form panics.
    fn is_absent(&self) -> bool {
        false
    }
}

macro_rules! impl_context_key {
    ($($ty:ty),* $(,)?) => {
        $(impl ContextKey for $ty {})*
    };
}

impl_context_key!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char,
    &'static str, String, (),
);

impl<K: ContextKey> ContextKey for Option<K> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

/// Key under which a wrapped error stores the error it wraps
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentKey;

impl fmt::Debug for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("parent")
    }
}

impl ContextKey for ParentKey {}

/// The reserved parent key.
///
/// `wrap` stores the inner error here. Overwriting it with a value that is not
/// a [`ContextualError`] cuts the chain: lookups stop at that error.
pub const PARENT_KEY: ParentKey = ParentKey;

pub(crate) fn assert_present<K: ContextKey>(key: &K) {
    if key.is_absent() {
        panic!("{}", ABSENT_KEY_MESSAGE);
    }
}

trait ErasedKey: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_key(&self, other: &dyn ErasedKey) -> bool;
    fn hash_key(&self, state: &mut dyn Hasher);
    fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<K: ContextKey> ErasedKey for K {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_key(&self, other: &dyn ErasedKey) -> bool {
        other
            .as_any()
            .downcast_ref::<K>()
            .map_or(false, |other| self == other)
    }

    fn hash_key(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<K>().hash(&mut state);
        Hash::hash(self, &mut state);
    }

    fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl PartialEq for dyn ErasedKey {
    fn eq(&self, other: &Self) -> bool {
        self.eq_key(other)
    }
}

impl Eq for dyn ErasedKey {}

impl Hash for dyn ErasedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_key(state);
    }
}

struct StoredKey(Box<dyn ErasedKey>);

impl PartialEq for StoredKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_key(&*other.0)
    }
}

impl Eq for StoredKey {}

impl Hash for StoredKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_key(state);
    }
}

impl Borrow<dyn ErasedKey> for StoredKey {
    fn borrow(&self) -> &(dyn ErasedKey + 'static) {
        &*self.0
    }
}

/// Borrowed view of a type-erased key, as yielded by
/// [`ContextualError::entries`]
#[derive(Clone, Copy)]
pub struct KeyRef<'a>(&'a dyn ErasedKey);

impl<'a> KeyRef<'a> {
    /// Returns the key as `K` if it has that type.
    pub fn downcast_ref<K: ContextKey>(&self) -> Option<&'a K> {
        self.0.as_any().downcast_ref::<K>()
    }

    pub fn is<K: ContextKey>(&self) -> bool {
        self.0.as_any().is::<K>()
    }

    pub fn is_parent(&self) -> bool {
        self.is::<ParentKey>()
    }
}

impl fmt::Debug for KeyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_key(f)
    }
}

/// Any plain value that can be stored as context data
pub trait DataValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + fmt::Debug + Send + Sync> DataValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// `err` as a [`ContextualError`], whether it is one or a `Box` of one.
pub(crate) fn downcast_contextual<'a>(
    err: &'a (dyn StdError + 'static),
) -> Option<&'a ContextualError> {
    err.downcast_ref::<ContextualError>()
        .or_else(|| err.downcast_ref::<Box<ContextualError>>().map(|boxed| &**boxed))
}

fn downcast_contextual_any(any: &dyn Any) -> Option<&ContextualError> {
    any.downcast_ref::<ContextualError>()
        .or_else(|| any.downcast_ref::<Box<ContextualError>>().map(|boxed| &**boxed))
}

/// A value held in an error's context
pub enum ContextValue {
    /// Plain data, rendered with `Debug`.
    Data(Box<dyn DataValue>),
    /// An error, rendered with `Display`. Wrapped errors live here.
    Error(BoxError),
}

impl ContextValue {
    /// Returns the data value as `T` if it is data of that type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Data(data) => (**data).as_any().downcast_ref::<T>(),
            Self::Error(_) => None,
        }
    }

    /// Returns the stored error, if this value is one.
    ///
    /// Data is only reported when it holds a [`ContextualError`]. Any other
    /// error set through `with_value` stays plain data; store it with
    /// `with_error` to have it treated as an error.
    pub fn as_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Error(err) => Some(&**err),
            Self::Data(_) => self
                .as_contextual()
                .map(|err| err as &(dyn StdError + Send + Sync + 'static)),
        }
    }

    /// Returns the value as a [`ContextualError`], whichever variant holds it.
    /// A `Box<ContextualError>` counts too.
    pub fn as_contextual(&self) -> Option<&ContextualError> {
        match self {
            Self::Error(err) => downcast_contextual(&**err),
            Self::Data(data) => downcast_contextual_any((**data).as_any()),
        }
    }

    /// Whether [`as_error`](Self::as_error) finds an error. Non-contextual
    /// errors stored as data do not count.
    pub fn is_error(&self) -> bool {
        self.as_error().is_some()
    }

    pub(crate) fn into_contextual(self) -> Option<Box<ContextualError>> {
        match self {
            Self::Error(err) => match err.downcast::<ContextualError>() {
                Ok(contextual) => Some(contextual),
                Err(err) => err.downcast::<Box<ContextualError>>().ok().map(|boxed| *boxed),
            },
            Self::Data(data) => match DataValue::into_any(data).downcast::<ContextualError>() {
                Ok(contextual) => Some(contextual),
                Err(any) => any.downcast::<Box<ContextualError>>().ok().map(|boxed| *boxed),
            },
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(data) => fmt::Debug::fmt(&**data, f),
            Self::Error(err) => fmt::Debug::fmt(&**err, f),
        }
    }
}

struct Slot {
    order: u64,
    value: ContextValue,
}

/// Insertion-ordered key/value store owned by a single error
#[derive(Default)]
pub(crate) struct Context {
    slots: HashMap<StoredKey, Slot>,
    next_order: u64,
}

impl Context {
    /// Sets `key` to `value`. An existing key keeps its position.
    pub(crate) fn insert<K: ContextKey>(&mut self, key: K, value: ContextValue) {
        let probe: &(dyn ErasedKey + 'static) = &key;
        if let Some(slot) = self.slots.get_mut(probe) {
            slot.value = value;
            return;
        }

        let order = self.next_order;
        self.next_order += 1;
        self.slots.insert(StoredKey(Box::new(key)), Slot { order, value });
    }

    pub(crate) fn get<K: ContextKey>(&self, key: &K) -> Option<&ContextValue> {
        let probe: &(dyn ErasedKey + 'static) = key;
        self.slots.get(probe).map(|slot| &slot.value)
    }

    pub(crate) fn remove<K: ContextKey>(&mut self, key: &K) -> Option<ContextValue> {
        let probe: &(dyn ErasedKey + 'static) = key;
        self.slots.remove(probe).map(|slot| slot.value)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn entries(&self) -> Vec<(KeyRef<'_>, &ContextValue)> {
        let mut slots: Vec<_> = self.slots.iter().collect();
        slots.sort_by_key(|(_, slot)| slot.order);
        slots
            .into_iter()
            .map(|(key, slot)| (KeyRef(&*key.0), &slot.value))
            .collect()
    }
}
