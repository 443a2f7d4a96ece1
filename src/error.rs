//! Error type shared by every fallible list operation.

use ibig::UBig;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A single index is outside `0..length` (or `0..=length` for insertion).
    #[error("index {index} is out of range for length {length}")]
    IndexOutOfRange { index: UBig, length: UBig },

    /// `index + count` runs past the end of the list.
    #[error("range starting at {index} with count {count} is out of bounds for length {length}")]
    RangeOutOfBounds { index: UBig, count: UBig, length: UBig },

    #[error("capacity {capacity} is below length {length}")]
    CapacityBelowLength { capacity: UBig, length: UBig },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The requested amount does not fit in a native collection.
    #[error("{0} elements do not fit in memory-addressable storage")]
    TooLarge(UBig),

    #[error("operation `{operation}` is not supported")]
    Unsupported { operation: &'static str },

    /// A structural invariant was found false. Always a library bug.
    #[error("internal consistency error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn internal(message: impl Into<String>) -> Error {
        return Error::Internal(message.into());
    }
}
