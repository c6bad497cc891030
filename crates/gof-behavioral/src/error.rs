//! Error types for behavioral operations.

use thiserror::Error;

/// Errors that can occur in the behavioral pattern components.
#[derive(Debug, Error)]
pub enum BehavioralError {
    /// The canvas has no command left to undo.
    #[error("no more commands to undo")]
    NothingToUndo,

    /// The mediator has no device with this id.
    #[error("device not found: {id}")]
    DeviceNotFound { id: u32 },

    /// The device does not understand the command.
    #[error("unrecognized command: {command}")]
    UnrecognizedCommand { command: String },

    /// The command is known but its arguments are malformed.
    #[error("invalid command {command:?}: {reason}")]
    InvalidCommand { command: String, reason: String },

    /// No handler is registered for the message class.
    #[error("handler not found for class {class} (message {id})")]
    HandlerNotFound { id: String, class: String },

    /// Undo or redo before anything was saved.
    #[error("no history versions")]
    NoHistory,

    /// Undo past the first snapshot or redo past the last.
    #[error("no more history versions")]
    NoMoreHistory,

    /// A single-row query matched nothing.
    #[error("no rows found")]
    NoRows,

    /// A row did not have the expected shape.
    #[error("scan error: {0}")]
    Scan(String),

    /// The sort policy name is not known.
    #[error("unknown sort policy: {0}")]
    UnknownPolicy(String),

    /// An alarm was set for a time of day that does not exist.
    #[error("invalid alarm time {hour:02}:{minute:02}")]
    InvalidAlarmTime { hour: u32, minute: u32 },

    /// The ticker task could not be joined.
    #[error("ticker task failed: {0}")]
    Ticker(String),

    /// A lock protecting shared state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for behavioral operations.
pub type Result<T> = std::result::Result<T, BehavioralError>;
