//! Per-operation result signal
//!
//! Remote calls never abort a session. Every loader and writer operation
//! reports what happened through an [`Outcome`], so callers can tell
//! "the table is empty" apart from "the call failed".

use std::fmt;

use crate::error::TallyError;

/// What happened to a single loader or writer operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation completed
    Success(T),
    /// Input was rejected before anything was sent to the store
    Rejected { reason: String },
    /// The store or service failed; nothing happened
    Failed { reason: String },
}

impl<T> Outcome<T> {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Convert a library error, keeping validation errors as rejections
    pub fn from_error(err: TallyError) -> Self {
        match err {
            TallyError::Validation(reason) => Self::Rejected { reason },
            other => Self::Failed {
                reason: other.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The failure or rejection reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Rejected { reason } | Self::Failed { reason } => Some(reason),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Rejected { reason } => Outcome::Rejected { reason },
            Self::Failed { reason } => Outcome::Failed { reason },
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Degrade to an empty value, handing back the reason when it was not a success
    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Self::Success(value) => (value, None),
            Self::Rejected { reason } | Self::Failed { reason } => (T::default(), Some(reason)),
        }
    }
}

impl<T> From<Result<T, TallyError>> for Outcome<T> {
    fn from(result: Result<T, TallyError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::from_error(err),
        }
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(_) => write!(f, "ok"),
            Self::Rejected { reason } => write!(f, "rejected: {}", reason),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
