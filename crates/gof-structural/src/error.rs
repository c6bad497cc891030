//! Error types for structural operations.

use thiserror::Error;

/// Errors that can occur in the structural pattern services.
#[derive(Debug, Error)]
pub enum StructuralError {
    /// The gift does not exist in the inventory.
    #[error("gift not found: {gift_id}")]
    GiftNotFound { gift_id: u32 },

    /// The user has no points account.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: u32 },

    /// The user cannot afford the gift.
    #[error("insufficient user points: required {required}, available {available}")]
    InsufficientPoints { required: u32, available: u32 },

    /// The gift is out of stock.
    #[error("insufficient gift stock: {gift_id}")]
    InsufficientStock { gift_id: u32 },

    /// The order does not exist.
    #[error("no such order: {id}")]
    OrderNotFound { id: u32 },

    /// The user lacks the permission for the operation.
    #[error("permission denied: {user} lacks {permission}")]
    PermissionDenied { user: String, permission: String },

    /// Writing exported data failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock protecting shared state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for structural operations.
pub type Result<T> = std::result::Result<T, StructuralError>;
