use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use super::search::hinted_binary_search;
use super::{check_insert, check_range, check_write_count, KeyManager, ObjectKeyManager, SharedKeys, ARRAY_OVERHEAD};
use crate::primitives::bytes::buf::Cursor;
use crate::storage::datatype::{DataType, FixedByteArrayDataType};
use crate::storage::options::KeyManagerOptions;
use crate::types::{check_index, KeyError, Result};

/// Fixed-length byte keys stored back to back in one shared buffer.
///
/// Reads and searches work on slices of the buffer; range copies share it
/// through [`Bytes::slice`]. Inserts and removals materialize the keys into
/// an [`ObjectKeyManager`].
#[derive(Debug, Clone)]
pub struct FixedBytesKeyManager {
    data_type: FixedByteArrayDataType,
    count: usize,
    bytes: Bytes,
}

impl FixedBytesKeyManager {
    /// A manager holding no keys.
    pub fn empty(data_type: FixedByteArrayDataType) -> Self {
        Self {
            data_type,
            count: 0,
            bytes: Bytes::new(),
        }
    }

    /// Packs strictly increasing `keys` into one buffer.
    ///
    /// Fails with [`KeyError::Invalid`] unless every key is exactly
    /// `data_type.key_len()` bytes.
    pub fn from_keys(data_type: FixedByteArrayDataType, keys: &[Vec<u8>]) -> Result<Self> {
        let width = data_type.key_len();
        let mut buf = Vec::with_capacity(keys.len() * width);
        for key in keys {
            data_type.validate(key)?;
            buf.extend_from_slice(key);
        }
        let manager = Self {
            data_type,
            count: keys.len(),
            bytes: Bytes::from(buf),
        };
        debug_assert!(manager.is_sorted(), "keys must be strictly increasing");
        Ok(manager)
    }

    /// Takes `count` keys straight from the page buffer.
    pub fn read(
        data_type: FixedByteArrayDataType,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<Self> {
        let total = count
            .checked_mul(data_type.key_len())
            .ok_or(KeyError::Corruption("fixed key run length overflow"))?;
        let bytes = Bytes::copy_from_slice(cur.take(total)?);
        let manager = Self {
            data_type,
            count,
            bytes,
        };
        if options.verify_order_on_read && !manager.is_sorted() {
            debug!(count, "keys.fixed.read.unordered");
            return Err(KeyError::Corruption("key array not strictly increasing"));
        }
        debug_assert!(manager.is_sorted(), "keys must be strictly increasing");
        trace!(count, width = data_type.key_len(), "keys.fixed.read");
        Ok(manager)
    }

    /// Borrows the key at `index`.
    pub fn slice(&self, index: usize) -> Result<&[u8]> {
        check_index(index, self.count)?;
        Ok(self.slot(index))
    }

    fn slot(&self, index: usize) -> &[u8] {
        let width = self.data_type.key_len();
        &self.bytes[index * width..(index + 1) * width]
    }

    fn is_sorted(&self) -> bool {
        (1..self.count).all(|idx| self.slot(idx - 1) < self.slot(idx))
    }

    fn materialize(&self) -> Vec<Vec<u8>> {
        self.bytes
            .chunks_exact(self.data_type.key_len())
            .map(<[u8]>::to_vec)
            .collect()
    }

    fn object(&self, keys: Vec<Vec<u8>>) -> SharedKeys<Vec<u8>> {
        if keys.is_empty() {
            return Arc::new(Self::empty(self.data_type));
        }
        Arc::new(ObjectKeyManager::new(self.data_type, keys))
    }
}

impl KeyManager<Vec<u8>> for FixedBytesKeyManager {
    fn key_count(&self) -> usize {
        self.count
    }

    fn key(&self, index: usize) -> Result<Vec<u8>> {
        Ok(self.slice(index)?.to_vec())
    }

    fn binary_search(&self, key: &Vec<u8>, hint: isize) -> isize {
        hinted_binary_search(self.count, hint, |x| key.as_slice().cmp(self.slot(x)))
    }

    fn expand_keys(&self, extra: &[Vec<u8>]) -> Result<SharedKeys<Vec<u8>>> {
        extra.iter().try_for_each(|key| self.data_type.validate(key))?;
        let mut keys = self.materialize();
        keys.extend_from_slice(extra);
        Ok(self.object(keys))
    }

    fn copy(&self, start: usize, end: usize) -> Result<SharedKeys<Vec<u8>>> {
        check_range(start, end, self.count)?;
        let width = self.data_type.key_len();
        Ok(Arc::new(Self {
            data_type: self.data_type,
            count: end - start,
            bytes: self.bytes.slice(start * width..end * width),
        }))
    }

    fn insert_key(&self, index: usize, key: Vec<u8>) -> Result<SharedKeys<Vec<u8>>> {
        check_insert(index, self.count)?;
        self.data_type.validate(&key)?;
        let mut keys = self.materialize();
        keys.insert(index, key);
        Ok(self.object(keys))
    }

    fn remove(&self, index: usize) -> Result<SharedKeys<Vec<u8>>> {
        check_index(index, self.count)?;
        let mut keys = self.materialize();
        keys.remove(index);
        Ok(self.object(keys))
    }

    fn write(&self, count: usize, out: &mut Vec<u8>) -> Result<()> {
        check_write_count(count, self.count)?;
        out.extend_from_slice(&self.bytes[..count * self.data_type.key_len()]);
        Ok(())
    }

    fn serialized_data_size(&self) -> usize {
        self.bytes.len()
    }

    fn memory(&self) -> usize {
        ARRAY_OVERHEAD + self.bytes.len()
    }
}
