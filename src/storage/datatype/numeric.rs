use std::cmp::Ordering;
use std::sync::Arc;

use super::{DataType, KeyableDataType};
use crate::primitives::bytes::{buf::Cursor, var};
use crate::storage::keys::{IntKeyManager, LongKeyManager, SharedKeys};
use crate::storage::options::KeyManagerOptions;
use crate::types::Result;

/// 32-bit signed integers, varint encoded as their unsigned image.
///
/// Pages keyed by this type use [`IntKeyManager`], which bit-packs the keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntDataType;

/// 64-bit signed integers, varint encoded as their unsigned image.
///
/// Pages keyed by this type use [`LongKeyManager`], which bit-packs the keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongDataType;

impl DataType for IntDataType {
    type Value = i32;

    fn fixed_memory(&self) -> Option<usize> {
        Some(4)
    }

    fn memory(&self, _value: &i32) -> usize {
        4
    }

    fn encoded_len(&self, value: &i32) -> usize {
        var::len_u32(*value as u32)
    }

    fn write(&self, out: &mut Vec<u8>, value: &i32) {
        var::encode_u32(*value as u32, out);
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<i32> {
        Ok(cur.read_var_u32()? as i32)
    }

    fn is_generic_compression_applicable(&self) -> bool {
        false
    }
}

impl KeyableDataType for IntDataType {
    fn compare(&self, a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn create_empty_manager(&self) -> SharedKeys<i32> {
        Arc::new(IntKeyManager::empty())
    }

    fn create_manager_with(
        &self,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<SharedKeys<i32>> {
        Ok(Arc::new(IntKeyManager::read(cur, count, options)?))
    }

    fn create_manager_from(&self, keys: Vec<i32>) -> Result<SharedKeys<i32>> {
        Ok(Arc::new(IntKeyManager::new(keys)))
    }
}

impl DataType for LongDataType {
    type Value = i64;

    fn fixed_memory(&self) -> Option<usize> {
        Some(8)
    }

    fn memory(&self, _value: &i64) -> usize {
        8
    }

    fn encoded_len(&self, value: &i64) -> usize {
        var::len_u64(*value as u64)
    }

    fn write(&self, out: &mut Vec<u8>, value: &i64) {
        var::encode_u64(*value as u64, out);
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<i64> {
        Ok(cur.read_var_u64()? as i64)
    }

    fn is_generic_compression_applicable(&self) -> bool {
        false
    }
}

impl KeyableDataType for LongDataType {
    fn compare(&self, a: &i64, b: &i64) -> Ordering {
        a.cmp(b)
    }

    fn create_empty_manager(&self) -> SharedKeys<i64> {
        Arc::new(LongKeyManager::empty())
    }

    fn create_manager_with(
        &self,
        cur: &mut Cursor<'_>,
        count: usize,
        options: &KeyManagerOptions,
    ) -> Result<SharedKeys<i64>> {
        Ok(Arc::new(LongKeyManager::read(cur, count, options)?))
    }

    fn create_manager_from(&self, keys: Vec<i64>) -> Result<SharedKeys<i64>> {
        Ok(Arc::new(LongKeyManager::new(keys)))
    }
}
