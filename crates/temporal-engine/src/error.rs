//! Error types for temporal-engine operations.

use thiserror::Error;

/// Errors raised by constructors and operations.
///
/// Every error is reported by the call that detects it. Values are immutable,
/// so a failed operation never leaves a partially updated value behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// A field, option or result fell outside its permitted range, or a
    /// `reject` policy refused to pick a value.
    #[error("Range error: {0}")]
    Range(String),

    /// The time zone provider does not know the identifier.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// A required input was missing or could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TemporalError {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        TemporalError::Range(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        TemporalError::InvalidArgument(message.into())
    }

    /// Returns true for [`TemporalError::Range`].
    pub fn is_range(&self) -> bool {
        matches!(self, TemporalError::Range(_))
    }
}

pub type Result<T> = std::result::Result<T, TemporalError>;
