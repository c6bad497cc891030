//! Error types for creational operations.

use thiserror::Error;

use crate::device::DeviceKind;

/// Errors that can occur while creating objects.
#[derive(Debug, Error)]
pub enum CreationalError {
    /// No factory is registered for the vendor.
    #[error("no factory registered for vendor: {vendor}")]
    FactoryNotRegistered { vendor: String },

    /// The simple factory does not know this vendor.
    #[error("unsupported vendor: {vendor}")]
    UnsupportedVendor { vendor: String },

    /// A factory was asked to build a product from info of another kind.
    #[error("device {id} is a {actual}, expected {expected}")]
    DeviceKindMismatch {
        id: u32,
        expected: DeviceKind,
        actual: DeviceKind,
    },

    /// The query builder was finished without a table.
    #[error("query has no table")]
    MissingTable,

    /// The prototype configuration could not be parsed.
    #[error("invalid prototype config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A lock protecting shared state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for creational operations.
pub type Result<T> = std::result::Result<T, CreationalError>;
