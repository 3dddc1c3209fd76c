//! Error kinds recognised by errtrail

use crate::{
    ApplicationError, ConflictError, ForbiddenError, NotAuthorizedError, NotFoundError,
    ValidationError,
};
use std::error::Error as StdError;
use std::fmt;

/// The kind of a typed original error.
///
/// The kind is not stored anywhere: it is the type of the original error,
/// read back by [`ErrorKind::of`] (or [`crate::Error::kind`]) after unwrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Generic domain failure
    Application,

    /// A state precondition was violated
    Conflict,

    /// Policy denies access regardless of identity
    Forbidden,

    /// The identity lacks permission
    NotAuthorized,

    /// A referenced entity does not exist
    NotFound,

    /// Input is malformed, possibly on several fields
    Validation,
}

impl ErrorKind {
    /// Classify an original error by its type
    pub fn of(error: &(dyn StdError + 'static)) -> Option<Self> {
        if error.is::<ApplicationError>() {
            Some(ErrorKind::Application)
        } else if error.is::<ConflictError>() {
            Some(ErrorKind::Conflict)
        } else if error.is::<ForbiddenError>() {
            Some(ErrorKind::Forbidden)
        } else if error.is::<NotAuthorizedError>() {
            Some(ErrorKind::NotAuthorized)
        } else if error.is::<NotFoundError>() {
            Some(ErrorKind::NotFound)
        } else if error.is::<ValidationError>() {
            Some(ErrorKind::Validation)
        } else {
            None
        }
    }

    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Application => "Application",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotAuthorized => "NotAuthorized",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Validation => "Validation",
        }
    }

    /// Whether the error was caused by the request rather than by the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Application)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
