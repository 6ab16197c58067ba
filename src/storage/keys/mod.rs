//! Immutable sorted key arrays for B-tree pages.
//!
//! A [`KeyManager`] owns the strictly increasing keys of one page version.
//! Every structural edit returns a new manager and leaves the receiver
//! untouched, so readers holding an older page keep a stable view without
//! locking.

mod array;
mod fixed;
mod object;
mod packed;
mod search;


use core::fmt;
use std::sync::Arc;

use crate::types::{check_index, KeyError, Result};

pub use fixed::FixedBytesKeyManager;
pub use object::ObjectKeyManager;
pub use packed::{IntKeyManager, LongKeyManager, PackedKeyManager};
pub use search::insertion_point;

/// Estimated heap overhead of one key array, in bytes.
pub const ARRAY_OVERHEAD: usize = 24;

/// Shared handle to a key manager; page versions clone it freely.
pub type SharedKeys<T> = Arc<dyn KeyManager<T>>;

/// Sorted, duplicate-free keys of one page.
pub trait KeyManager<T: 'static>: Send + Sync + fmt::Debug {
    /// Number of keys held.
    fn key_count(&self) -> usize;

    /// Returns a copy of the key at `index`.
    fn key(&self, index: usize) -> Result<T>;

    /// Searches for `key`, probing near `hint` first.
    ///
    /// Returns the index of `key`, or `-(insertion_point + 1)` when it is
    /// absent. `hint` is typically a previous result plus one; any value is
    /// accepted and only affects the number of comparisons.
    fn binary_search(&self, key: &T, hint: isize) -> isize;

    /// Returns a manager holding these keys followed by `extra`.
    ///
    /// The caller guarantees that the result stays strictly increasing.
    fn expand_keys(&self, extra: &[T]) -> Result<SharedKeys<T>>;

    /// Returns a manager over keys `start..end`.
    fn copy(&self, start: usize, end: usize) -> Result<SharedKeys<T>>;

    /// Returns a manager with `key` inserted at `index` (`0..=key_count`).
    fn insert_key(&self, index: usize, key: T) -> Result<SharedKeys<T>>;

    /// Returns a manager without the key at `index`.
    fn remove(&self, index: usize) -> Result<SharedKeys<T>>;

    /// Serializes the first `count` keys to `out`.
    fn write(&self, count: usize, out: &mut Vec<u8>) -> Result<()>;

    /// Exact number of bytes [`KeyManager::write`] emits for all keys.
    fn serialized_data_size(&self) -> usize;

    /// Estimated working-set size for page cache accounting.
    fn memory(&self) -> usize;

    /// Whether the manager holds no keys.
    fn is_empty(&self) -> bool {
        self.key_count() == 0
    }

    /// Copies all keys out in order.
    fn to_vec(&self) -> Result<Vec<T>> {
        (0..self.key_count()).map(|idx| self.key(idx)).collect()
    }
}

/// Validates a `start..end` range against `len` keys.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if end > len {
        return Err(KeyError::IndexOutOfBounds { index: end, len });
    }
    if start > end {
        return Err(KeyError::Invalid("copy range start after end"));
    }
    Ok(())
}

/// Validates that `count` keys can be written from a manager holding `len`.
pub(crate) fn check_write_count(count: usize, len: usize) -> Result<()> {
    if count > len {
        return Err(KeyError::IndexOutOfBounds { index: count, len });
    }
    Ok(())
}

/// Validates an insert position (`index == len` appends).
pub(crate) fn check_insert(index: usize, len: usize) -> Result<()> {
    check_index(index, len + 1).map_err(|_| KeyError::IndexOutOfBounds { index, len })
}
