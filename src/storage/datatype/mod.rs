//! Serialization contracts for page keys and values.
//!
//! A [`DataType`] describes how one value is encoded, decoded, and
//! accounted for in memory. A [`KeyableDataType`] adds a total order and
//! picks the [`KeyManager`](crate::storage::keys::KeyManager) layout used
//! for pages keyed by that type. Data types carry no per-call state; most
//! are zero-sized.

mod binary;
mod numeric;
mod string;

use core::fmt;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::primitives::bytes::buf::Cursor;
use crate::storage::keys::{ObjectKeyManager, SharedKeys};
use crate::storage::options::KeyManagerOptions;
use crate::types::Result;

pub use binary::{ByteArrayDataType, FixedByteArrayDataType};
pub use numeric::{IntDataType, LongDataType};
pub use string::{AsciiStringDataType, StringDataType};

/// Encoding and memory accounting for one value type.
pub trait DataType: Clone + Send + Sync + fmt::Debug + 'static {
    /// Decoded value type.
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Memory cost shared by every value, or `None` when it varies per value.
    fn fixed_memory(&self) -> Option<usize> {
        None
    }

    /// Estimated in-memory cost of `value`.
    fn memory(&self, value: &Self::Value) -> usize;

    /// Estimated in-memory cost of a run of values.
    fn storage_memory(&self, values: &[Self::Value]) -> usize {
        match self.fixed_memory() {
            Some(each) => each * values.len(),
            None => values.iter().map(|value| self.memory(value)).sum(),
        }
    }

    /// Exact number of bytes [`DataType::write`] emits for `value`.
    fn encoded_len(&self, value: &Self::Value) -> usize;

    /// Appends the encoding of `value`.
    fn write(&self, out: &mut Vec<u8>, value: &Self::Value);

    /// Decodes one value.
    fn read(&self, cur: &mut Cursor<'_>) -> Result<Self::Value>;

    /// Appends the encodings of `values` in order.
    fn write_batch(&self, out: &mut Vec<u8>, values: &[Self::Value]) {
        for value in values {
            self.write(out, value);
        }
    }

    /// Decodes `len` values written by [`DataType::write_batch`].
    fn read_batch(&self, cur: &mut Cursor<'_>, len: usize) -> Result<Vec<Self::Value>> {
        let mut storage = self.create_storage(len);
        for _ in 0..len {
            storage.push(self.read(cur)?);
        }
        Ok(storage)
    }

    /// Allocates storage for `size` values.
    fn create_storage(&self, size: usize) -> Vec<Self::Value> {
        Vec::with_capacity(size)
    }

    /// Checks that `value` can be stored by this type.
    ///
    /// Key managers call this on every key entering them from outside, so
    /// a value the wire format cannot represent is rejected with
    /// [`KeyError::Invalid`](crate::types::KeyError::Invalid) instead of
    /// corrupting the page.
    fn validate(&self, _value: &Self::Value) -> Result<()> {
        Ok(())
    }

    /// Value equality.
    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a == b
    }

    /// Whether a page-level compressor should still compress these values.
    ///
    /// Types whose key managers already pack their keys return `false`.
    fn is_generic_compression_applicable(&self) -> bool {
        true
    }
}

/// A [`DataType`] usable as a B-tree key.
pub trait KeyableDataType: DataType {
    /// Total order used to sort keys.
    fn compare(&self, a: &Self::Value, b: &Self::Value) -> Ordering;

    /// Returns a manager holding no keys.
    fn create_empty_manager(&self) -> SharedKeys<Self::Value> {
        Arc::new(ObjectKeyManager::new(self.clone(), Vec::new()))
    }

    /// Decodes `count` keys into the manager layout chosen by this type.
    fn create_manager_with(
        &self,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<SharedKeys<Self::Value>> {
        Ok(Arc::new(ObjectKeyManager::read(
            self.clone(),
            cur,
            count,
            options,
        )?))
    }

    /// Decodes `count` keys with default options.
    fn create_manager(&self, cur: &mut Cursor<'_>, count: usize) -> Result<SharedKeys<Self::Value>> {
        self.create_manager_with(cur, count, &KeyManagerOptions::default())
    }

    /// Builds a manager from keys already in memory.
    ///
    /// `keys` must be strictly increasing under [`KeyableDataType::compare`].
    /// Fails when any key is rejected by [`DataType::validate`].
    fn create_manager_from(&self, keys: Vec<Self::Value>) -> Result<SharedKeys<Self::Value>> {
        if keys.is_empty() {
            return Ok(self.create_empty_manager());
        }
        Ok(Arc::new(ObjectKeyManager::try_new(self.clone(), keys)?))
    }
}
