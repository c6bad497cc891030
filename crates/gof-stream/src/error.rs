//! Error types for stream operations.

use thiserror::Error;

use crate::state::{Operation, RejectReason, StateKind};

/// Errors returned by stream operations.
///
/// There is exactly one kind: the operation is not legal in the mode the
/// stream is currently in. It is never retried and never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The attempted operation is illegal in the current state.
    #[error("{operation} rejected on {stream} ({state}): {reason}")]
    InvalidStateTransition {
        operation: Operation,
        state: StateKind,
        stream: String,
        reason: RejectReason,
    },
}

impl StreamError {
    /// The operation that was attempted.
    pub fn operation(&self) -> Operation {
        match self {
            Self::InvalidStateTransition { operation, .. } => *operation,
        }
    }

    /// The state the stream was in when the operation was rejected.
    pub fn state(&self) -> StateKind {
        match self {
            Self::InvalidStateTransition { state, .. } => *state,
        }
    }

    /// Why the operation was rejected.
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::InvalidStateTransition { reason, .. } => *reason,
        }
    }
}

/// Convenience type alias for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
