//! Error types for the request framework.

use crate::actions::ActionName;
use crate::request::RequestState;
use thiserror::Error;

/// Result type alias for request operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Errors raised during the synchronous phase of an action.
///
/// All of these propagate to the caller before any state change or
/// side-effect registration, so a failed action leaves no partial effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A payload field is malformed, missing, or not permitted.
    #[error("invalid value for '{field}': {reason}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// User-facing reason for the failure.
        reason: String,
    },

    /// A reference (topic, creator, record) could not be resolved to a
    /// live entity.
    #[error("could not resolve {reference}")]
    Resolution {
        /// Human-readable description of the dangling reference.
        reference: String,
    },

    /// The action is not permitted for the request's current state.
    #[error("action '{action}' is not allowed in state {state:?}")]
    IllegalTransition {
        /// The rejected action.
        action: ActionName,
        /// The state the request was in.
        state: RequestState,
    },
}

impl RequestError {
    /// Build a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a resolution error.
    pub fn resolution(reference: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.into(),
        }
    }

    /// Returns `true` if this error is due to invalid caller input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Errors raised by post-commit operations.
///
/// By the time one of these occurs the primary transaction has already
/// committed, so they are logged and swallowed rather than surfaced to the
/// original caller. They never roll back the committed state change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// An email could not be handed to the mail transport.
    #[error("email delivery failed: {0}")]
    Email(String),

    /// A notification could not be dispatched.
    #[error("notification dispatch failed: {0}")]
    Notification(String),

    /// A search-index update for the parent aggregate failed.
    #[error("parent reindex failed: {0}")]
    Reindex(String),
}
