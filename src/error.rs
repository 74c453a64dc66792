//! Validation error types.
//!
//! Every field failure is reported as a [`ValidationError`] carrying a
//! machine-readable [`ErrorCode`] and a human-readable message. Errors are
//! scoped to a single field and are never mutated after creation.

use std::fmt;

use thiserror::Error;

/// A machine-readable reason code identifying the kind of validation failure.
///
/// Codes render in kebab-case (e.g. `invalid-format`), which is the form
/// REST API clients are expected to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A mandatory field was absent from the input.
    Required,
    /// A regex, date mask, or URL syntax mismatch.
    InvalidFormat,
    /// The value is not in the enumerated choice set.
    InvalidChoice,
    /// Numeric parsing failed.
    InvalidNumber,
    /// The value is out of range (or a disallowed future timestamp).
    InvalidValue,
    /// Malformed JSON text, or a JSON shape other than the expected one.
    InvalidJson,
    /// The decoded JSON value violates the supplied JSON Schema.
    InvalidSchema,
    /// The array has fewer items than `min_items`.
    TooFewItems,
    /// The array has more items than `max_items`.
    TooManyItems,
    /// The uploaded file exceeds `max_size`.
    FileTooLarge,
    /// The uploaded file's extension is not in `valid_extensions`.
    InvalidExtension,
}

impl ErrorCode {
    /// Returns the kebab-case string form of this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidFormat => "invalid-format",
            Self::InvalidChoice => "invalid-choice",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidValue => "invalid-value",
            Self::InvalidJson => "invalid-json",
            Self::InvalidSchema => "invalid-schema",
            Self::TooFewItems => "too-few-items",
            Self::TooManyItems => "too-many-items",
            Self::FileTooLarge => "file-too-large",
            Self::InvalidExtension => "invalid-extension",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-scoped validation failure.
///
/// # Examples
///
/// ```
/// use rest_form_fields::error::{ErrorCode, ValidationError};
///
/// let err = ValidationError::new(ErrorCode::Required, "This field is required.");
/// assert_eq!(err.code, ErrorCode::Required);
/// assert_eq!(err.to_string(), "This field is required.");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The machine-readable reason code.
    pub code: ErrorCode,
    /// The human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Required.as_str(), "required");
        assert_eq!(ErrorCode::InvalidFormat.as_str(), "invalid-format");
        assert_eq!(ErrorCode::InvalidChoice.as_str(), "invalid-choice");
        assert_eq!(ErrorCode::InvalidNumber.as_str(), "invalid-number");
        assert_eq!(ErrorCode::InvalidValue.as_str(), "invalid-value");
        assert_eq!(ErrorCode::InvalidJson.as_str(), "invalid-json");
        assert_eq!(ErrorCode::InvalidSchema.as_str(), "invalid-schema");
        assert_eq!(ErrorCode::TooFewItems.as_str(), "too-few-items");
        assert_eq!(ErrorCode::TooManyItems.as_str(), "too-many-items");
        assert_eq!(ErrorCode::FileTooLarge.as_str(), "file-too-large");
        assert_eq!(ErrorCode::InvalidExtension.as_str(), "invalid-extension");
    }

    #[test]
    fn test_display_uses_message() {
        let err = ValidationError::new(ErrorCode::InvalidNumber, "Enter a whole number.");
        assert_eq!(err.to_string(), "Enter a whole number.");
    }

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::TooManyItems.to_string(), "too-many-items");
    }
}
