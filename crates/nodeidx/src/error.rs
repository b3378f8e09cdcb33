use crate::{config::ConfigError, types::TypeOrdinal};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// True if this error reports a type ordinal beyond the index slots.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Index(IndexError::TypeOutOfRange { .. }))
        )
    }

    /// True if a handle-set query ran without a live store binding.
    #[must_use]
    pub const fn is_not_connected(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Index(IndexError::StoreNotConnected))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Index(IndexError),

    #[error("{0}")]
    Config(ConfigError),
}

///
/// IndexError
///
/// Index-specific failures. All variants are integration errors on the
/// caller's side and are never recovered inside the crate.
///

#[derive(Debug, ThisError)]
pub enum IndexError {
    #[error("type ordinal {ty} out of range for index with {len} slots (resize not called?)")]
    TypeOutOfRange { ty: TypeOrdinal, len: usize },

    #[error("node store not connected")]
    StoreNotConnected,

    #[error("type hierarchy reports {count} types, beyond the {max} addressable ordinals")]
    OrdinalSpaceExhausted { count: usize, max: usize },
}

impl IndexError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::TypeOutOfRange { .. }
            | Self::StoreNotConnected
            | Self::OrdinalSpaceExhausted { .. } => ErrorClass::InvariantViolation,
        }
    }
}

impl From<IndexError> for InternalError {
    fn from(err: IndexError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Index,
            message: err.to_string(),
            detail: Some(ErrorDetail::Index(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Index,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Index => "index",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
