//! # Error Types
//!
//! Two kinds of failure cross this layer's boundary:
//!
//! - **InvalidArgument**: a shape, rank, zero-length or value mismatch found
//!   while checking arguments. Always raised before any numeric work starts.
//!   The message text is part of the observable contract and is displayed
//!   verbatim.
//! - **TypeTagMismatch**: an opaque context handle was retrieved as the wrong
//!   kind of context. This is caller misuse, never something to recover from.

use thiserror::Error;

/// Errors raised by the signature shape algebra and context plumbing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigError {
    /// A malformed argument was rejected.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// A handle carried a tag or payload other than the one requested.
    #[error("Handle type mismatch: expected {expected}, found {found}")]
    TypeTagMismatch { expected: String, found: String },
}

impl SigError {
    /// Build an `InvalidArgument` error from a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// True for the `InvalidArgument` variant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, SigError>;
