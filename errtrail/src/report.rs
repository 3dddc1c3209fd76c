//! Structured logging of errors through `tracing`

use crate::Error;

impl Error {
    /// Emit this error as a single `tracing` event.
    ///
    /// Client-caused kinds (see [`crate::ErrorKind::is_client_error`]) are
    /// logged at `WARN`, everything else at `ERROR`. The event carries the
    /// `kind`, the outermost `caller` and the wrap `depth` as fields, with the
    /// full breadcrumb as its message.
    pub fn log(&self) {
        let kind = self.kind();
        let kind_name = kind.map_or("Unknown", |kind| kind.as_str());
        let caller = self.caller_path().unwrap_or_default();
        let depth = self.depth();

        if kind.is_some_and(|kind| kind.is_client_error()) {
            tracing::warn!(kind = kind_name, caller, depth, "{}", self);
        } else {
            tracing::error!(kind = kind_name, caller, depth, "{}", self);
        }
    }
}

/// Log errors as they pass through a `Result`.
pub trait LogErr: Sized {
    /// Log the error, if any, and return `self` unchanged
    fn log_err(self) -> Self;
}

impl<T> LogErr for Result<T, Error> {
    fn log_err(self) -> Self {
        if let Err(error) = &self {
            error.log();
        }
        self
    }
}
