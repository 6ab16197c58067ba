#![forbid(unsafe_code)]
//! Shared error type for the key codecs and key managers.

/// Errors raised while encoding, decoding, or editing key arrays.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The buffer being decoded is truncated or ill-formed.
    #[error("corruption: {0}")]
    Corruption(&'static str),
    /// A caller supplied an argument the codec cannot represent.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
    /// An index fell outside the key array.
    #[error("index {index} out of bounds for {len} keys")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of keys held by the manager.
        len: usize,
    },
    /// The operation is not available for this representation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Fails with [`KeyError::IndexOutOfBounds`] unless `index < len`.
#[inline]
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(KeyError::IndexOutOfBounds { index, len })
    }
}
