//! The Error value and its wrap chain

use crate::wrap::Layer;
use crate::ErrorKind;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, OnceLock};

const MESSAGES_PREFIX: &str = ": ";
const MESSAGE_SEPARATOR: &str = "; ";
const ARROW: &str = " \u{27a1}\u{fe0e} ";

type Leaf = dyn StdError + Send + Sync + 'static;

/// An error annotated with the call path it travelled through.
///
/// An `Error` is either an original (leaf) error or a wrap layer around
/// another `Error`. Each layer records the function that wrapped it and the
/// messages given at that point; the leaf is never touched, so its identity
/// and type survive any number of layers.
///
/// - `Display` renders the whole breadcrumb, outermost caller first:
///   `service::load: retrying;  ➡︎ repo::find ➡︎ user 42 not found`
/// - `Debug` renders a multi-line report with the kind and the numbered trail
/// - `==` compares the rendered original errors (see [`equals`])
/// - [`Error::is_same`] compares the identity of the original errors
///   (see [`is`])
///
/// Cloning is cheap and shares the original error, so a clone wrapped
/// elsewhere is still the same error.
///
/// # Example
///
/// ```rust
/// use errtrail::{not_found_error, wrap, NotFoundError};
///
/// fn find(id: u32) -> errtrail::Result<String> {
///     Err(not_found_error!("user {} not found", id))
/// }
///
/// fn load(id: u32) -> errtrail::Result<String> {
///     wrap!(find(id), "loading profile")
/// }
///
/// let err = load(42).unwrap_err();
/// assert!(err.is::<NotFoundError>());
/// assert_eq!(err.depth(), 2);
/// assert_eq!(err.original().to_string(), "user 42 not found");
/// ```
#[derive(Clone)]
pub struct Error {
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Leaf(Arc<Leaf>),
    Wrapped(Arc<WrappedError>),
}

/// A single wrap layer: the caller that wrapped, its messages, and the inner error.
#[derive(Debug)]
pub struct WrappedError {
    inner: Error,
    caller_path: String,
    messages: Vec<String>,
}

impl WrappedError {
    /// Path of the function that performed this wrap
    pub fn caller_path(&self) -> &str {
        &self.caller_path
    }

    /// Messages given at this wrap point, in order
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The error this layer wraps (possibly another layer)
    pub fn inner(&self) -> &Error {
        &self.inner
    }

    fn fmt_layer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.caller_path)?;

        if !self.messages.is_empty() {
            f.write_str(MESSAGES_PREFIX)?;
            for message in &self.messages {
                f.write_str(message)?;
                f.write_str(MESSAGE_SEPARATOR)?;
            }
        }

        f.write_str(ARROW)
    }
}

impl fmt::Display for WrappedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_layer(f)?;
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Plain message error built by [`Error::msg`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MessageError(String);

impl Error {
    /// Create an unwrapped error from any standard error
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            repr: Repr::Leaf(Arc::new(error)),
        }
    }

    /// Create an unwrapped error from a message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    /// Create an unwrapped error from a boxed standard error.
    ///
    /// A box produced by converting an `Error` gives back that same `Error`.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Compat>() {
            Ok(compat) => compat.0,
            Err(error) => Self {
                repr: Repr::Leaf(Arc::from(error)),
            },
        }
    }

    /// Convert an `anyhow::Error`, recovering the `Error` it was made from if any
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        match error.downcast::<Compat>() {
            Ok(compat) => compat.0,
            Err(error) => Self::from_boxed(error.into()),
        }
    }

    pub(crate) fn wrapped(self, layer: Layer) -> Self {
        Self {
            repr: Repr::Wrapped(Arc::new(WrappedError {
                inner: self,
                caller_path: layer.caller_path,
                messages: layer.messages,
            })),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// The innermost, unwrapped error of the chain
    pub fn original(&self) -> &Error {
        let mut current = self;
        while let Repr::Wrapped(node) = &current.repr {
            current = &node.inner;
        }
        current
    }

    /// Drop every wrap layer, keeping the original error
    pub fn into_original(self) -> Error {
        self.original().clone()
    }

    /// The original error as a standard error trait object
    pub fn as_std(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &**self.leaf()
    }

    fn leaf(&self) -> &Arc<Leaf> {
        let mut current = self;
        loop {
            match &current.repr {
                Repr::Leaf(leaf) => return leaf,
                Repr::Wrapped(node) => current = &node.inner,
            }
        }
    }

    /// Whether this value carries at least one wrap layer
    pub fn is_wrapped(&self) -> bool {
        matches!(self.repr, Repr::Wrapped(_))
    }

    /// Caller path of the outermost layer
    pub fn caller_path(&self) -> Option<&str> {
        self.layers().next().map(WrappedError::caller_path)
    }

    /// Messages of the outermost layer
    pub fn messages(&self) -> &[String] {
        self.layers().next().map_or(&[][..], WrappedError::messages)
    }

    /// Iterate over the wrap layers, outermost first
    pub fn layers(&self) -> Layers<'_> {
        Layers { next: Some(self) }
    }

    /// Number of wrap layers around the original error
    pub fn depth(&self) -> usize {
        self.layers().count()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Kind of the original error, if it is one of the typed kinds
    pub fn kind(&self) -> Option<ErrorKind> {
        ErrorKind::of(self.as_std())
    }

    /// Whether the original error is a `T`
    pub fn is<T>(&self) -> bool
    where
        T: StdError + 'static,
    {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrow the original error as a `T`
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.leaf().downcast_ref::<T>()
    }

    /// Mutably borrow the original error as a `T`.
    ///
    /// Returns `None` if the original is not a `T`, or if any part of the
    /// chain is shared with a clone.
    pub fn downcast_mut<T>(&mut self) -> Option<&mut T>
    where
        T: StdError + 'static,
    {
        let mut current = self;
        loop {
            match &mut current.repr {
                Repr::Leaf(leaf) => return Arc::get_mut(leaf)?.downcast_mut::<T>(),
                Repr::Wrapped(node) => current = &mut Arc::get_mut(node)?.inner,
            }
        }
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Whether both values wrap the very same original error
    pub fn is_same(&self, other: &Error) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(self.leaf()), Arc::as_ptr(other.leaf()))
    }

    /// Convert into a boxed standard error whose `source` is the original error
    pub fn into_std(self) -> Box<dyn StdError + Send + Sync + 'static> {
        Box::new(Compat(self))
    }
}

// =============================================================================
// Drop - unlink the chain one layer at a time
// =============================================================================

/// Stand-in leaf left behind in a layer whose inner error was moved out.
fn detached() -> Repr {
    static DETACHED: OnceLock<Arc<Leaf>> = OnceLock::new();
    let leaf = DETACHED.get_or_init(|| -> Arc<Leaf> { Arc::new(MessageError(String::new())) });
    Repr::Leaf(Arc::clone(leaf))
}

impl Drop for Error {
    fn drop(&mut self) {
        match &self.repr {
            Repr::Wrapped(node) if Arc::strong_count(node) == 1 => {}
            _ => return,
        }

        let mut repr = std::mem::replace(&mut self.repr, detached());
        while let Repr::Wrapped(node) = repr {
            match Arc::try_unwrap(node) {
                Ok(mut layer) => repr = std::mem::replace(&mut layer.inner.repr, detached()),
                // shared from here on, the other owners keep the rest alive
                Err(_) => break,
            }
        }
    }
}

/// Iterator over the wrap layers of an [`Error`], see [`Error::layers`].
pub struct Layers<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a WrappedError;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.next?.repr {
            Repr::Wrapped(node) => {
                self.next = Some(&node.inner);
                Some(&**node)
            }
            Repr::Leaf(_) => {
                self.next = None;
                None
            }
        }
    }
}

// =============================================================================
// Free-standing helpers (None plays the part of "no error")
// =============================================================================

/// Create an unwrapped error from a message
pub fn new(message: impl Into<String>) -> Error {
    Error::msg(message)
}

/// The original error of `error`, or `None` when there is no error
pub fn get_original_error(error: Option<&Error>) -> Option<&Error> {
    error.map(Error::original)
}

/// Identity comparison: both sides wrap the same original error.
///
/// Two absent errors are the same; an absent error is never the same as a
/// present one.
pub fn is(lhs: Option<&Error>, rhs: Option<&Error>) -> bool {
    match (lhs, rhs) {
        (None, None) => true,
        (Some(lhs), Some(rhs)) => lhs.is_same(rhs),
        _ => false,
    }
}

/// Equality comparison: both original errors render the same message.
///
/// Falls back to [`is`] when either side is absent.
pub fn equals(lhs: Option<&Error>, rhs: Option<&Error>) -> bool {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => is(lhs, rhs),
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) || self.as_std().to_string() == other.as_std().to_string()
    }
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Error::new(error)
    }
}

// =============================================================================
// Display - the breadcrumb trail, outermost caller first
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = self;
        loop {
            match &current.repr {
                Repr::Leaf(leaf) => return fmt::Display::fmt(leaf, f),
                Repr::Wrapped(node) => {
                    node.fmt_layer(f)?;
                    current = &node.inner;
                }
            }
        }
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let original = self.as_std();
        writeln!(f, "{}", original)?;

        if let Some(kind) = self.kind() {
            writeln!(f)?;
            writeln!(f, "    Kind: {}", kind)?;
        }

        if self.is_wrapped() {
            writeln!(f)?;
            writeln!(f, "    Trail:")?;
            for (i, layer) in self.layers().enumerate() {
                write!(f, "        {}: {}", i, layer.caller_path())?;
                if !layer.messages().is_empty() {
                    write!(f, " ({})", layer.messages().join("; "))?;
                }
                writeln!(f)?;
            }
        }

        if let Some(source) = original.source() {
            writeln!(f)?;
            writeln!(f, "    Source: {}", source)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error interop
// =============================================================================

/// `Error` cannot implement `std::error::Error` itself (it accepts every
/// standard error through `From`), so conversions go through this adapter.
struct Compat(Error);

impl fmt::Display for Compat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Compat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl StdError for Compat {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let original = self.0.as_std();
        if self.0.is_wrapped() {
            Some(original)
        } else {
            original.source()
        }
    }
}

impl From<Error> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(error: Error) -> Self {
        error.into_std()
    }
}

impl From<Error> for anyhow::Error {
    fn from(error: Error) -> Self {
        anyhow::Error::new(Compat(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{validation_error, wrap, wrapf, NotFoundError, ValidationError};

    fn wrap1() -> Error {
        wrap!(new("some error"))
    }

    fn wrap2() -> Error {
        wrap!(wrap1())
    }

    #[test]
    fn test_wrap_renders_breadcrumb() {
        assert_eq!(wrap!(new("some error")).to_string(), "tests::test_wrap_renders_breadcrumb ➡︎ some error");
        assert_eq!(wrap1().to_string(), "tests::wrap1 ➡︎ some error");
        assert_eq!(wrap2().to_string(), "tests::wrap2 ➡︎ tests::wrap1 ➡︎ some error");
    }

    #[test]
    fn test_wrap_with_messages() {
        let err = wrap!(new("some error"), "first", "second");
        assert_eq!(
            err.to_string(),
            "tests::test_wrap_with_messages: first; second;  ➡︎ some error"
        );
        assert_eq!(err.messages(), ["first", "second"]);
    }

    #[test]
    fn test_wrapf_formats_message() {
        let err = wrapf!(new("oops"), "{} {}", "test", 1);
        assert_eq!(err.to_string(), "tests::test_wrapf_formats_message: test 1;  ➡︎ oops");
    }

    #[test]
    fn test_wrap_none_stays_none() {
        let none: Option<Error> = None;
        assert!(wrap!(none, "never rendered").is_none());
        assert!(wrapf!(None::<Error>, "{}", 1).is_none());

        let ok: Result<u8, Error> = Ok(7);
        assert_eq!(wrap!(ok).ok(), Some(7));
    }

    #[test]
    fn test_original_is_fixed_point() {
        let leaf = new("root cause");
        let mut err = leaf.clone();
        for _ in 0..1_000 {
            err = wrap!(err);
        }

        assert_eq!(err.depth(), 1_000);
        assert!(err.original().is_same(&leaf));
        assert!(err.original().is_same(err.original().original()));
        assert!(!err.original().is_wrapped());
        assert!(err.to_string().ends_with(" ➡︎ root cause"));
    }

    #[test]
    fn test_is_identity() {
        let err_one = new("err 1");
        let err_two = new("err 2");

        let cases: Vec<(Option<Error>, Option<Error>, bool)> = vec![
            (None, Some(validation_error!("a", "b")), false),
            (Some(validation_error!("a", "b")), None, false),
            (None, Some(wrap!(validation_error!("a", "b"))), false),
            (Some(wrap!(validation_error!("a", "b"))), None, false),
            (Some(validation_error!("a", "b")), Some(validation_error!("b", "c")), false),
            (Some(validation_error!("a", "b")), Some(validation_error!("a", "b")), false),
            (Some(err_one.clone()), Some(err_two.clone()), false),
            (Some(err_one.clone()), Some(err_one.clone()), true),
            (Some(wrap!(err_one.clone())), Some(err_one.clone()), true),
            (Some(wrap!(err_one.clone())), Some(wrap!(err_one.clone())), true),
            (Some(wrap!(wrap!(wrap!(err_two.clone())))), Some(wrap!(err_two.clone())), true),
            (Some(wrap!(wrap!(wrap!(err_one.clone())))), Some(wrap!(err_two.clone())), false),
            (None, None, true),
        ];

        for (lhs, rhs, expected) in cases {
            assert_eq!(is(lhs.as_ref(), rhs.as_ref()), expected, "is({:?}, {:?})", lhs, rhs);
        }
    }

    #[test]
    fn test_equals_by_message() {
        let message = "Cartão deve ser informado!";

        let cases: Vec<(Option<Error>, Option<Error>, bool)> = vec![
            (None, None, true),
            (Some(validation_error!("card_id", message)), None, false),
            (None, Some(validation_error!("card_id", message)), false),
            (Some(validation_error!("card_id", message)), Some(validation_error!("card_id", message)), true),
            (Some(wrap!(wrap!(new("same")))), Some(new("same")), true),
            (Some(new("one")), Some(new("two")), false),
        ];

        for (lhs, rhs, expected) in cases {
            assert_eq!(equals(lhs.as_ref(), rhs.as_ref()), expected, "equals({:?}, {:?})", lhs, rhs);
        }
    }

    #[test]
    fn test_equal_but_not_same() {
        let lhs = validation_error!("a", "b");
        let rhs = validation_error!("a", "b");
        assert!(equals(Some(&lhs), Some(&rhs)));
        assert!(!is(Some(&lhs), Some(&rhs)));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_get_original_error() {
        assert!(get_original_error(None).is_none());

        let leaf = new("leaf");
        assert!(get_original_error(Some(&leaf)).is_some_and(|e| e.is_same(&leaf)));

        let wrapped = wrap!(leaf.clone(), "context");
        assert!(get_original_error(Some(&wrapped)).is_some_and(|e| e.is_same(&leaf)));

        let original = wrapped.into_original();
        assert!(original.is_same(&leaf));
        assert!(!original.is_wrapped());
    }

    #[test]
    fn test_layers_outermost_first() {
        let err = wrap!(wrap!(new("leaf"), "inner"), "outer");
        let paths: Vec<_> = err.layers().map(|l| (l.caller_path(), l.messages().to_vec())).collect();

        assert_eq!(
            paths,
            vec![
                ("tests::test_layers_outermost_first", vec!["outer".to_string()]),
                ("tests::test_layers_outermost_first", vec!["inner".to_string()]),
            ]
        );
        assert_eq!(err.caller_path(), Some("tests::test_layers_outermost_first"));
        assert_eq!(new("leaf").caller_path(), None);
        assert!(new("leaf").messages().is_empty());
    }

    #[test]
    fn test_downcast_through_layers() {
        let err = wrap!(Error::new(NotFoundError::new("gone")));
        assert!(err.is::<NotFoundError>());
        assert_eq!(err.downcast_ref::<NotFoundError>().map(|e| e.message()), Some("gone"));
        assert!(!err.is::<std::io::Error>());
    }

    #[test]
    fn test_very_deep_chain() {
        let mut err = validation_error!("card_id", "Required");
        for _ in 0..100_000 {
            err = wrap!(err);
        }
        assert_eq!(err.depth(), 100_001);

        if let Some(validation) = err.downcast_mut::<ValidationError>() {
            validation.add_error("name", "Too short");
        }
        assert_eq!(err.original().to_string(), "card_id: Required\n - name: Too short;");

        let shared = err.clone();
        drop(err);
        assert_eq!(shared.depth(), 100_001);
        drop(shared);
    }

    #[test]
    fn test_drop_keeps_shared_tail() {
        let mut tail = new("tail");
        for _ in 0..10 {
            tail = wrap!(tail);
        }

        let mut head = wrap!(tail.clone(), "head");
        for _ in 0..100_000 {
            head = wrap!(head);
        }
        drop(head);

        assert_eq!(tail.depth(), 10);
        assert_eq!(tail.original().to_string(), "tail");
    }

    #[test]
    fn test_downcast_mut_requires_unique_chain() {
        let mut err = wrap!(Error::new(NotFoundError::new("gone")));
        assert!(err.downcast_mut::<NotFoundError>().is_some());

        let _shared = err.clone();
        assert!(err.downcast_mut::<NotFoundError>().is_none());
    }

    #[test]
    fn test_debug_report() {
        let err = wrap!(wrap!(Error::new(NotFoundError::new("user 42")), "lookup"));
        let debug = format!("{:?}", err);

        assert!(debug.starts_with("user 42\n"));
        assert!(debug.contains("Kind: NotFound"));
        assert!(debug.contains("0: tests::test_debug_report\n"));
        assert!(debug.contains("1: tests::test_debug_report (lookup)"));
    }

    #[test]
    fn test_std_interop_roundtrip() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
        let err = wrap!(Error::from(io), "reading config");

        let boxed: Box<dyn StdError + Send + Sync> = err.clone().into();
        assert_eq!(boxed.to_string(), err.to_string());
        assert_eq!(boxed.source().map(|s| s.to_string()), Some("config.toml missing".to_string()));

        let back = Error::from_boxed(boxed);
        assert!(back.is_same(&err));
        assert_eq!(back.depth(), 1);
    }

    #[test]
    fn test_anyhow_interop() {
        let err = wrap!(new("boom"));
        let any: anyhow::Error = err.clone().into();
        assert_eq!(any.to_string(), err.to_string());

        let back = Error::from_anyhow(any);
        assert!(back.is_same(&err));

        let foreign = Error::from_anyhow(anyhow::anyhow!("plain"));
        assert_eq!(foreign.to_string(), "plain");
        assert!(!foreign.is_wrapped());
    }
}
