//! Wrapping: adding a caller-path layer to errors

use crate::Error;

/// One wrap point: who wrapped, and what they had to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub(crate) caller_path: String,
    pub(crate) messages: Vec<String>,
}

impl Layer {
    /// Create a layer with an explicit caller label
    pub fn new<I, S>(caller_path: impl Into<String>, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            caller_path: caller_path.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a layer from the raw type name of a marker item, see
    /// [`crate::caller::function_path`]. Used by the wrapping macros.
    #[doc(hidden)]
    pub fn here(marker: &str, messages: Vec<String>) -> Self {
        Self {
            caller_path: crate::caller::function_path(marker),
            messages,
        }
    }
}

/// Values that can receive a wrap layer.
///
/// Absent errors (`None`, `Ok`) pass through untouched and the layer is never
/// built, so call sites can wrap return values unconditionally.
pub trait Wrap: Sized {
    /// What wrapping produces
    type Output;

    /// Wrap with a lazily built layer
    fn wrap_with<F>(self, layer: F) -> Self::Output
    where
        F: FnOnce() -> Layer;

    /// Wrap with an explicit caller label
    fn wrap_at<I, S>(self, caller_path: &str, messages: I) -> Self::Output
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrap_with(|| Layer::new(caller_path, messages))
    }
}

impl Wrap for Error {
    type Output = Error;

    fn wrap_with<F>(self, layer: F) -> Error
    where
        F: FnOnce() -> Layer,
    {
        self.wrapped(layer())
    }
}

impl<E> Wrap for Option<E>
where
    E: Into<Error>,
{
    type Output = Option<Error>;

    fn wrap_with<F>(self, layer: F) -> Option<Error>
    where
        F: FnOnce() -> Layer,
    {
        self.map(|error| error.into().wrapped(layer()))
    }
}

impl<T, E> Wrap for Result<T, E>
where
    E: Into<Error>,
{
    type Output = Result<T, Error>;

    fn wrap_with<F>(self, layer: F) -> Result<T, Error>
    where
        F: FnOnce() -> Layer,
    {
        self.map_err(|error| error.into().wrapped(layer()))
    }
}

/// Wrap `error` with an explicit caller label.
///
/// The [`wrap!`](crate::wrap!) macro fills the label in with the calling
/// function's path; use this where the call site wants to name itself.
///
/// ```rust
/// use errtrail::{new, wrap};
///
/// let err = wrap(new("disk full"), "storage::flush", ["segment 7"]);
/// assert_eq!(err.to_string(), "storage::flush: segment 7;  ➡︎ disk full");
///
/// let none: Option<errtrail::Error> = None;
/// assert!(wrap(none, "storage::flush", ["segment 7"]).is_none());
/// ```
pub fn wrap<W, I, S>(error: W, caller_path: &str, messages: I) -> W::Output
where
    W: Wrap,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    error.wrap_at(caller_path, messages)
}
