//! Validation errors with nested field failures

use serde::{Deserialize, Serialize};
use std::fmt;

const FIELD_SEPARATOR: &str = ": ";
const SUB_ERROR_PREFIX: &str = "\n - ";
const SUB_ERROR_SUFFIX: char = ';';

/// An input validation failure, optionally tied to a field, holding any
/// number of nested validation failures.
///
/// ```rust
/// use errtrail::ValidationError;
///
/// let mut err = ValidationError::new("card_id", "Required");
/// err.add_error("name", "Too short");
///
/// assert_eq!(err.to_string(), "card_id: Required\n - name: Too short;");
/// ```
///
/// Encodes as `{"field_name": ..., "message": ..., "errors": [...]}`, each
/// key omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "field_name", default, skip_serializing_if = "String::is_empty")]
    field: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

impl ValidationError {
    /// Create the unwrapped error. An empty `field` means no specific field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Get the field name (empty when not tied to a field)
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the nested validation errors, in the order they were added
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether any nested validation errors were added
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Append a nested validation error.
    ///
    /// This mutates the unwrapped error; for a wrapped value, reach the leaf
    /// first with [`crate::Error::downcast_mut`].
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.field.is_empty() {
            f.write_str(&self.field)?;
            f.write_str(FIELD_SEPARATOR)?;
        }

        f.write_str(&self.message)?;

        for error in &self.errors {
            f.write_str(SUB_ERROR_PREFIX)?;
            fmt::Display::fmt(error, f)?;
            fmt::Write::write_char(f, SUB_ERROR_SUFFIX)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}
