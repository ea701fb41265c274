//! Common test utilities and helpers
//!
//! Key types shared across integration tests, and tracing setup so that
//! library events show up in test output when `RUST_LOG` is set.

#![allow(dead_code)]

use ctx_errors::ContextKey;

/// Install a test-friendly tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keys owned by a storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Code,
    Table,
}

impl ContextKey for StorageKey {}

/// Keys owned by an API layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKey {
    Code,
    Route,
}

impl ContextKey for ApiKey {}

/// Error codes the storage layer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCode {
    NotFound,
    Conflict,
}

/// Error codes the API layer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCode {
    BadRequest,
    Unavailable,
}
