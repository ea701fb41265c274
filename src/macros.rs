/// Create a [`ContextualError`](crate::ContextualError) with a formatted message
///
/// ```rust
/// let err = ctx_errors::errorf!("user {} not found", 42);
/// assert_eq!(err.message(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::errorf(::std::format_args!($($arg)*))
    };
}

/// Wrap an error under a formatted message
///
/// ```rust
/// let err = ctx_errors::wrapf!("connection reset", "fetching {}", "/index");
/// assert_eq!(format!("{:#}", err), "fetching /index: connection reset");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::wrapf($err, ::std::format_args!($($arg)*))
    };
}
