//! # errtrail
//!
//! Error wrapping with caller-path breadcrumbs and typed error kinds.
//!
//! ## Design Philosophy
//!
//! - **Wrap**: each layer records the function that wrapped and optional messages
//! - **Original**: the innermost error is never changed and can always be recovered
//! - **Kind**: the type of the original error is its classification
//! - **Identity**: wrapping never changes which error it is
//!
//! ## Usage
//!
//! ```rust
//! use errtrail::{not_found_error, wrap, ErrorKind};
//!
//! fn find_card(id: &str) -> errtrail::Result<()> {
//!     Err(not_found_error!("card {} not found", id))
//! }
//!
//! fn charge(id: &str) -> errtrail::Result<()> {
//!     wrap!(find_card(id), "charging card")
//! }
//!
//! let err = charge("c_42").unwrap_err();
//! assert_eq!(err.kind(), Some(ErrorKind::NotFound));
//! assert!(err.to_string().ends_with("charge: charging card;  ➡︎ main::find_card ➡︎ card c_42 not found"));
//! ```
//!
//! ## Principles
//!
//! - Wrap at every function boundary that adds diagnostic value
//! - `None` and `Ok` wrap to themselves, so return values can be wrapped unconditionally
//! - Branch on the original error, never on the rendered trail
//! - Compare with [`is`] for identity and [`equals`] (or `==`) for message equality

pub mod caller;
mod error;
mod kind;
mod macros;
mod report;
mod typed;
mod validation;
mod wrap;

pub use error::{equals, get_original_error, is, new, Error, Layers, WrappedError};
pub use kind::ErrorKind;
pub use report::LogErr;
pub use typed::{ApplicationError, ConflictError, ForbiddenError, NotAuthorizedError, NotFoundError};
pub use validation::ValidationError;
pub use wrap::{wrap, Layer, Wrap};

/// Result type alias using errtrail Error
pub type Result<T> = std::result::Result<T, Error>;
