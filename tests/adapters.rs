//! The free-function adapters on plain errors, and interop with `?`-based
//! error handling.

mod common;

use common::{init_tracing, StorageKey};
use ctx_errors::{
    errorf, new, value, value_as, with_value, wrap, wrapf, BoxError, ContextualError, ResultExt,
    GENERIC_MESSAGE,
};
use std::error::Error as _;
use std::io;

fn io_error() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem")
}

#[test]
fn test_plain_error_has_no_context() {
    let err = io_error();
    assert!(value(&err, &StorageKey::Code).is_none());
    assert!(value(&err, &0u8).is_none());
}

#[test]
fn test_with_value_on_plain_error_wraps_it() {
    init_tracing();
    let err = with_value(io_error(), StorageKey::Table, "sessions");

    assert_eq!(err.message(), GENERIC_MESSAGE);
    assert_eq!(value_as::<&str>(&err, &StorageKey::Table), Some(&"sessions"));
    assert_eq!(
        err.source().map(|source| source.to_string()),
        Some("read-only filesystem".to_string())
    );
    assert!(err.root_cause().downcast_ref::<io::Error>().is_some());
}

#[test]
fn test_with_value_on_boxed_contextual_error_does_not_wrap() {
    let boxed: BoxError = Box::new(new("foo err"));
    let err = with_value(boxed, StorageKey::Table, "sessions");

    assert_eq!(err.message(), "foo err");
    assert!(err.parent().is_none());
}

#[test]
fn test_value_through_boxed_error() {
    let boxed: BoxError = Box::new(new("foo err").with_value(StorageKey::Code, 9));
    assert_eq!(value_as::<i32>(&*boxed, &StorageKey::Code), Some(&9));
}

#[test]
#[should_panic(expected = "context key must not be absent")]
fn test_with_value_rejects_absent_key() {
    let _ = with_value(new("foo err"), None::<StorageKey>, 1);
}

#[test]
fn test_formatted_constructors() {
    let err = errorf!("shard {} unavailable", 3);
    assert_eq!(err.message(), "shard 3 unavailable");

    let err = wrapf!(io_error(), "open {:?}", "/data");
    assert_eq!(format!("{:#}", err), "open \"/data\": read-only filesystem");

    let err = ctx_errors::errorf(format_args!("{}-{}", "a", 1));
    assert_eq!(err.message(), "a-1");
}

#[test]
fn test_wrapping_a_message_string() {
    let err = wrap("upstream said no", "sync failed");
    assert!(err.contextual_parent().is_none());
    assert_eq!(err.parent().unwrap().to_string(), "upstream said no");
}

fn open_store() -> Result<(), ContextualError> {
    Err::<(), io::Error>(io_error())
        .wrap_err("opening store")
        .with_err_value(StorageKey::Table, "sessions")
}

fn handle() -> anyhow::Result<()> {
    open_store()?;
    Ok(())
}

#[test]
fn test_survives_anyhow() {
    let err = handle().unwrap_err();
    let contextual = err
        .downcast_ref::<ContextualError>()
        .expect("contextual error inside anyhow");

    assert_eq!(contextual.message(), "opening store");
    assert_eq!(
        contextual.value_as::<&str>(&StorageKey::Table),
        Some(&"sessions")
    );
    assert_eq!(err.chain().count(), 2);
    assert_eq!(err.root_cause().to_string(), "read-only filesystem");
}

#[test]
fn test_boxed_contextual_error_keeps_its_context() {
    let boxed = Box::new(new("foo err").with_value(StorageKey::Code, 5));
    assert_eq!(value_as::<i32>(&boxed, &StorageKey::Code), Some(&5));

    let err = with_value(boxed, StorageKey::Table, "sessions");
    assert_eq!(err.message(), "foo err");
    assert!(err.parent().is_none());
    assert_eq!(value_as::<i32>(&err, &StorageKey::Code), Some(&5));
    assert_eq!(value_as::<&str>(&err, &StorageKey::Table), Some(&"sessions"));
}

#[test]
fn test_anyhow_error_converts_back_to_contextual() {
    let err = handle().unwrap_err();
    assert_eq!(
        value_as::<&str>(&*err, &StorageKey::Table),
        Some(&"sessions")
    );

    let err = with_value(ContextualError::from(err), StorageKey::Code, 2);
    assert_eq!(err.message(), "opening store");
    assert_eq!(value_as::<i32>(&err, &StorageKey::Code), Some(&2));
    assert_eq!(
        value_as::<&str>(&err, &StorageKey::Table),
        Some(&"sessions")
    );
}

#[test]
fn test_anyhow_context_layer_is_kept_as_message() {
    use anyhow::Context as _;

    let err = handle().context("handling request").unwrap_err();
    let err: ContextualError = err.into();

    assert_eq!(err.message(), "handling request");
    assert_eq!(err.contextual_parent().unwrap().message(), "opening store");
    assert_eq!(
        value_as::<&str>(&err, &StorageKey::Table),
        Some(&"sessions")
    );
}
