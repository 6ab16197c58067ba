use std::sync::Arc;

use tracing::{debug, trace};

use super::array::{concat, copy_except, copy_with_gap};
use super::search::{hinted_binary_search, strictly_increasing};
use super::{check_insert, check_range, check_write_count, KeyManager, SharedKeys, ARRAY_OVERHEAD};
use crate::primitives::bytes::buf::Cursor;
use crate::storage::datatype::KeyableDataType;
use crate::storage::options::KeyManagerOptions;
use crate::types::{check_index, KeyError, Result};

/// Key manager backed by a plain array of decoded keys.
///
/// Fallback layout for every key type without a specialized manager;
/// ordering and encoding are delegated to the owning data type.
#[derive(Debug, Clone)]
pub struct ObjectKeyManager<D: KeyableDataType> {
    data_type: D,
    keys: Vec<D::Value>,
    memory: usize,
}

impl<D: KeyableDataType> ObjectKeyManager<D> {
    /// Wraps `keys`, which must be strictly increasing under `data_type`.
    pub fn new(data_type: D, keys: Vec<D::Value>) -> Self {
        debug_assert!(
            strictly_increasing(&keys, |a, b| data_type.compare(a, b)),
            "keys must be strictly increasing"
        );
        let memory = ARRAY_OVERHEAD + data_type.storage_memory(&keys);
        Self {
            data_type,
            keys,
            memory,
        }
    }

    /// Like [`ObjectKeyManager::new`], but rejects keys the data type
    /// cannot store.
    pub fn try_new(data_type: D, keys: Vec<D::Value>) -> Result<Self> {
        keys.iter().try_for_each(|key| data_type.validate(key))?;
        Ok(Self::new(data_type, keys))
    }

    /// Decodes `count` keys written by [`KeyManager::write`].
    pub fn read(
        data_type: D,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<Self> {
        let start = cur.off;
        let keys = data_type.read_batch(cur, count)?;
        if options.verify_order_on_read
            && !strictly_increasing(&keys, |a, b| data_type.compare(a, b))
        {
            debug!(count, "keys.object.read.unordered");
            return Err(KeyError::Corruption("key array not strictly increasing"));
        }
        trace!(count, bytes = cur.off - start, "keys.object.read");
        Ok(Self::new(data_type, keys))
    }

    /// The data type that orders and encodes these keys.
    pub fn data_type(&self) -> &D {
        &self.data_type
    }

    /// Borrows the keys in order.
    pub fn keys(&self) -> &[D::Value] {
        &self.keys
    }

    fn with_keys(&self, keys: Vec<D::Value>) -> SharedKeys<D::Value> {
        if keys.is_empty() {
            return self.data_type.create_empty_manager();
        }
        Arc::new(Self::new(self.data_type.clone(), keys))
    }
}

impl<D: KeyableDataType> KeyManager<D::Value> for ObjectKeyManager<D> {
    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn key(&self, index: usize) -> Result<D::Value> {
        check_index(index, self.keys.len())?;
        Ok(self.keys[index].clone())
    }

    fn binary_search(&self, key: &D::Value, hint: isize) -> isize {
        hinted_binary_search(self.keys.len(), hint, |x| {
            self.data_type.compare(key, &self.keys[x])
        })
    }

    fn expand_keys(&self, extra: &[D::Value]) -> Result<SharedKeys<D::Value>> {
        extra.iter().try_for_each(|key| self.data_type.validate(key))?;
        Ok(self.with_keys(concat(&self.keys, extra)))
    }

    fn copy(&self, start: usize, end: usize) -> Result<SharedKeys<D::Value>> {
        check_range(start, end, self.keys.len())?;
        Ok(self.with_keys(self.keys[start..end].to_vec()))
    }

    fn insert_key(&self, index: usize, key: D::Value) -> Result<SharedKeys<D::Value>> {
        check_insert(index, self.keys.len())?;
        self.data_type.validate(&key)?;
        Ok(self.with_keys(copy_with_gap(&self.keys, index, key)))
    }

    fn remove(&self, index: usize) -> Result<SharedKeys<D::Value>> {
        check_index(index, self.keys.len())?;
        Ok(self.with_keys(copy_except(&self.keys, index)))
    }

    fn write(&self, count: usize, out: &mut Vec<u8>) -> Result<()> {
        check_write_count(count, self.keys.len())?;
        self.data_type.write_batch(out, &self.keys[..count]);
        Ok(())
    }

    fn serialized_data_size(&self) -> usize {
        self.keys
            .iter()
            .map(|key| self.data_type.encoded_len(key))
            .sum()
    }

    fn memory(&self) -> usize {
        self.memory
    }
}
