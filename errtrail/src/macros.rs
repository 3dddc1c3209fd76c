//! Wrapping and constructor macros
//!
//! Every macro here declares a marker item at its call site, so the recorded
//! caller path always names the function the macro is written in.

/// Raw type name of a marker item declared at the call site.
#[doc(hidden)]
#[macro_export]
macro_rules! __marker {
    () => {{
        fn __here() {}
        ::std::any::type_name_of_val(&__here)
    }};
}

/// Path of the enclosing function, as recorded by a wrap layer.
///
/// ```rust
/// fn checkout() -> String {
///     errtrail::caller_path!()
/// }
///
/// assert!(checkout().ends_with("checkout"));
/// ```
#[macro_export]
macro_rules! caller_path {
    () => {
        $crate::caller::function_path($crate::__marker!())
    };
}

/// Wrap an error with the enclosing function's path and optional messages.
///
/// Accepts an [`Error`](crate::Error), an `Option<E>` or a `Result<T, E>`
/// (with `E: Into<Error>`); `None` and `Ok` pass through untouched and the
/// messages are not evaluated.
///
/// ```rust
/// use errtrail::{new, wrap};
///
/// fn load() -> errtrail::Error {
///     wrap!(new("disk full"), "loading index", "shard 3")
/// }
///
/// assert!(load().to_string().ends_with("load: loading index; shard 3;  ➡︎ disk full"));
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr $(,)?) => {{
        let marker = $crate::__marker!();
        $crate::Wrap::wrap_with($err, || $crate::Layer::here(marker, ::std::vec::Vec::new()))
    }};
    ($err:expr, $($msg:expr),+ $(,)?) => {{
        let marker = $crate::__marker!();
        $crate::Wrap::wrap_with($err, || {
            $crate::Layer::here(
                marker,
                ::std::vec![$(::std::convert::Into::<::std::string::String>::into($msg)),+],
            )
        })
    }};
}

/// Wrap an error with the enclosing function's path and a formatted message.
///
/// ```rust
/// use errtrail::{new, wrapf};
///
/// let err = wrapf!(new("oops"), "{} {}", "test", 1);
/// assert!(err.to_string().ends_with(": test 1;  ➡︎ oops"));
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)+) => {{
        let marker = $crate::__marker!();
        $crate::Wrap::wrap_with($err, || {
            $crate::Layer::here(marker, ::std::vec![::std::format!($($arg)+)])
        })
    }};
}

/// Build a typed leaf and wrap it once in the caller's path.
#[doc(hidden)]
#[macro_export]
macro_rules! __typed_error {
    (@wrap $leaf:expr) => {{
        let marker = $crate::__marker!();
        $crate::Wrap::wrap_with($crate::Error::new($leaf), || {
            $crate::Layer::here(marker, ::std::vec::Vec::new())
        })
    }};
    ($kind:ident, $msg:literal $(,)?) => {
        $crate::__typed_error!(@wrap $crate::$kind::new(::std::format!($msg)))
    };
    ($kind:ident, $msg:expr $(,)?) => {
        $crate::__typed_error!(@wrap $crate::$kind::new($msg))
    };
    ($kind:ident, $fmt:literal, $($arg:tt)+) => {
        $crate::__typed_error!(@wrap $crate::$kind::new(::std::format!($fmt, $($arg)+)))
    };
}

/// Create an [`ApplicationError`](crate::ApplicationError), wrapped in the caller's path.
///
/// Takes a message or `format!` arguments.
#[macro_export]
macro_rules! application_error {
    ($($arg:tt)+) => {
        $crate::__typed_error!(ApplicationError, $($arg)+)
    };
}

/// Create a [`ConflictError`](crate::ConflictError), wrapped in the caller's path.
#[macro_export]
macro_rules! conflict_error {
    ($($arg:tt)+) => {
        $crate::__typed_error!(ConflictError, $($arg)+)
    };
}

/// Create a [`ForbiddenError`](crate::ForbiddenError), wrapped in the caller's path.
#[macro_export]
macro_rules! forbidden_error {
    ($($arg:tt)+) => {
        $crate::__typed_error!(ForbiddenError, $($arg)+)
    };
}

/// Create a [`NotAuthorizedError`](crate::NotAuthorizedError), wrapped in the caller's path.
#[macro_export]
macro_rules! not_authorized_error {
    ($($arg:tt)+) => {
        $crate::__typed_error!(NotAuthorizedError, $($arg)+)
    };
}

/// Create a [`NotFoundError`](crate::NotFoundError), wrapped in the caller's path.
#[macro_export]
macro_rules! not_found_error {
    ($($arg:tt)+) => {
        $crate::__typed_error!(NotFoundError, $($arg)+)
    };
}

/// Create a [`ValidationError`](crate::ValidationError) for `field`, wrapped in
/// the caller's path. An empty field means no specific field.
///
/// ```rust
/// use errtrail::{validation_error, ValidationError};
///
/// let mut err = validation_error!("card_id", "Required");
/// if let Some(validation) = err.downcast_mut::<ValidationError>() {
///     validation.add_error("name", "Too short");
/// }
/// assert_eq!(err.original().to_string(), "card_id: Required\n - name: Too short;");
/// ```
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $msg:literal $(,)?) => {
        $crate::__typed_error!(@wrap $crate::ValidationError::new($field, ::std::format!($msg)))
    };
    ($field:expr, $msg:expr $(,)?) => {
        $crate::__typed_error!(@wrap $crate::ValidationError::new($field, $msg))
    };
    ($field:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::__typed_error!(@wrap $crate::ValidationError::new($field, ::std::format!($fmt, $($arg)+)))
    };
}
