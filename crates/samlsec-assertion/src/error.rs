#![forbid(unsafe_code)]

//! The closed set of reasons an assertion is rejected.

use std::fmt;

/// Why an assertion failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    MultipleAssertions,
    InvalidTimestamp,
    SignatureNotFound,
    KeyResolutionFailed,
    ReferenceValidationFailed,
    SignatureInvalid,
}

impl FailureReason {
    /// The stable reason code, e.g. `SIGNATURE_INVALID`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleAssertions => "MULTIPLE_ASSERTIONS",
            Self::InvalidTimestamp => "INVALID_TIMESTAMP",
            Self::SignatureNotFound => "SIGNATURE_NOT_FOUND",
            Self::KeyResolutionFailed => "KEY_RESOLUTION_FAILED",
            Self::ReferenceValidationFailed => "REFERENCE_VALIDATION_FAILED",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed validation: one reason plus a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("MULTIPLE_ASSERTIONS: {0}")]
    MultipleAssertions(String),

    #[error("INVALID_TIMESTAMP: {0}")]
    InvalidTimestamp(String),

    #[error("SIGNATURE_NOT_FOUND: {0}")]
    SignatureNotFound(String),

    #[error("KEY_RESOLUTION_FAILED: {0}")]
    KeyResolutionFailed(String),

    #[error("REFERENCE_VALIDATION_FAILED: {0}")]
    ReferenceValidationFailed(String),

    #[error("SIGNATURE_INVALID: {0}")]
    SignatureInvalid(String),
}

impl ValidationError {
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::MultipleAssertions(_) => FailureReason::MultipleAssertions,
            Self::InvalidTimestamp(_) => FailureReason::InvalidTimestamp,
            Self::SignatureNotFound(_) => FailureReason::SignatureNotFound,
            Self::KeyResolutionFailed(_) => FailureReason::KeyResolutionFailed,
            Self::ReferenceValidationFailed(_) => FailureReason::ReferenceValidationFailed,
            Self::SignatureInvalid(_) => FailureReason::SignatureInvalid,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::MultipleAssertions(d)
            | Self::InvalidTimestamp(d)
            | Self::SignatureNotFound(d)
            | Self::KeyResolutionFailed(d)
            | Self::ReferenceValidationFailed(d)
            | Self::SignatureInvalid(d) => d,
        }
    }
}
