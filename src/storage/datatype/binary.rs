use std::cmp::Ordering;
use std::sync::Arc;

use super::{DataType, KeyableDataType};
use crate::primitives::bytes::{buf::Cursor, var};
use crate::storage::keys::{FixedBytesKeyManager, ObjectKeyManager, SharedKeys};
use crate::storage::options::KeyManagerOptions;
use crate::types::{KeyError, Result};

const BYTE_ARRAY_OVERHEAD: usize = 16;

/// Variable-length byte strings: varint length followed by the bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteArrayDataType;

impl DataType for ByteArrayDataType {
    type Value = Vec<u8>;

    fn memory(&self, value: &Vec<u8>) -> usize {
        BYTE_ARRAY_OVERHEAD + value.len()
    }

    fn encoded_len(&self, value: &Vec<u8>) -> usize {
        var::len_u64(value.len() as u64) + value.len()
    }

    fn write(&self, out: &mut Vec<u8>, value: &Vec<u8>) {
        var::encode_u64(value.len() as u64, out);
        out.extend_from_slice(value);
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<Vec<u8>> {
        let len = cur.read_len()?;
        Ok(cur.take(len)?.to_vec())
    }
}

impl KeyableDataType for ByteArrayDataType {
    fn compare(&self, a: &Vec<u8>, b: &Vec<u8>) -> Ordering {
        a.as_slice().cmp(b.as_slice())
    }
}

/// Byte strings of one fixed length, stored without a length prefix.
///
/// Because every key has the same width, a page of these keys decodes into
/// a single contiguous buffer ([`FixedBytesKeyManager`]) instead of one
/// allocation per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedByteArrayDataType {
    len: usize,
}

impl FixedByteArrayDataType {
    /// Data type for keys of exactly `len` bytes.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(KeyError::Invalid("fixed key length must be positive"));
        }
        Ok(Self { len })
    }

    /// Width of every key in bytes.
    pub fn key_len(&self) -> usize {
        self.len
    }
}

impl DataType for FixedByteArrayDataType {
    type Value = Vec<u8>;

    fn fixed_memory(&self) -> Option<usize> {
        Some(self.len)
    }

    fn memory(&self, _value: &Vec<u8>) -> usize {
        self.len
    }

    fn encoded_len(&self, _value: &Vec<u8>) -> usize {
        self.len
    }

    fn write(&self, out: &mut Vec<u8>, value: &Vec<u8>) {
        debug_assert_eq!(value.len(), self.len, "fixed key has wrong length");
        out.extend_from_slice(value);
    }

    fn read(&self, _cur: &mut Cursor<'_>) -> Result<Vec<u8>> {
        Err(KeyError::Unsupported(
            "fixed byte array keys are read in bulk only",
        ))
    }

    fn read_batch(&self, cur: &mut Cursor<'_>, len: usize) -> Result<Vec<Vec<u8>>> {
        let total = len
            .checked_mul(self.len)
            .ok_or(KeyError::Corruption("fixed key run length overflow"))?;
        Ok(cur
            .take(total)?
            .chunks_exact(self.len)
            .map(<[u8]>::to_vec)
            .collect())
    }

    fn validate(&self, value: &Vec<u8>) -> Result<()> {
        if value.len() != self.len {
            return Err(KeyError::Invalid("fixed key has wrong length"));
        }
        Ok(())
    }

    fn equals(&self, a: &Vec<u8>, b: &Vec<u8>) -> bool {
        a.len() == self.len && a == b
    }
}

impl KeyableDataType for FixedByteArrayDataType {
    fn compare(&self, a: &Vec<u8>, b: &Vec<u8>) -> Ordering {
        a.as_slice().cmp(b.as_slice())
    }

    fn create_empty_manager(&self) -> SharedKeys<Vec<u8>> {
        Arc::new(FixedBytesKeyManager::empty(*self))
    }

    fn create_manager_with(
        &self,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<SharedKeys<Vec<u8>>> {
        if options.contiguous_fixed_bytes {
            Ok(Arc::new(FixedBytesKeyManager::read(
                *self, cur, count, options,
            )?))
        } else {
            Ok(Arc::new(ObjectKeyManager::read(*self, cur, count, options)?))
        }
    }

    fn create_manager_from(&self, keys: Vec<Vec<u8>>) -> Result<SharedKeys<Vec<u8>>> {
        Ok(Arc::new(FixedBytesKeyManager::from_keys(*self, &keys)?))
    }
}
