use std::sync::Arc;

use tracing::{debug, trace};

use super::array::{concat, copy_except, copy_with_gap};
use super::search::{hinted_binary_search, strictly_increasing};
use super::{check_insert, check_range, check_write_count, KeyManager, SharedKeys, ARRAY_OVERHEAD};
use crate::primitives::bytes::{buf::Cursor, var};
use crate::primitives::packing::{
    compress_integrated, compress_variable, decompress_integrated, decompress_variable,
    estimate_compressed_array_length, split_aligned, variable_len, PackedInt,
};
use crate::storage::options::KeyManagerOptions;
use crate::types::{check_index, KeyError, Result};

/// Key manager for fixed-width integer keys held in a primitive array.
///
/// Pages are written with the integrated binary packing codec: the
/// unaligned prefix as varint deltas, then a varint word count followed
/// by the packed words of the aligned blocks, each word big-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedKeyManager<T: PackedInt> {
    keys: Vec<T>,
}

/// Manager for 32-bit integer keys.
pub type IntKeyManager = PackedKeyManager<i32>;
/// Manager for 64-bit integer keys.
pub type LongKeyManager = PackedKeyManager<i64>;

impl<T: PackedInt> PackedKeyManager<T> {
    /// Wraps `keys`, which must be strictly increasing.
    pub fn new(keys: Vec<T>) -> Self {
        debug_assert!(
            strictly_increasing(&keys, |a, b| a.cmp(b)),
            "keys must be strictly increasing"
        );
        Self { keys }
    }

    /// A manager holding no keys.
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// Borrows the keys in order.
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    /// Decodes `count` keys written by [`KeyManager::write`].
    pub fn read(cur: &mut Cursor<'_>, count: usize, options: &KeyManagerOptions) -> Result<Self> {
        let start = cur.off;
        let mut keys = vec![T::default(); count];
        let (remainder, aligned) = split_aligned::<T>(count);
        decompress_variable(cur, &mut keys[..remainder])?;
        let mut words = 0usize;
        if aligned > 0 {
            words = usize::try_from(cur.read_var_u64()?)
                .map_err(|_| KeyError::Corruption("packed word count exceeds usize"))?;
            let byte_len = words
                .checked_mul(T::BYTES)
                .ok_or(KeyError::Corruption("packed word count overflow"))?;
            let packed: Vec<T> = cur
                .take(byte_len)?
                .chunks_exact(T::BYTES)
                .map(T::get_be)
                .collect();
            let init = frame_of_reference(&keys, remainder);
            let consumed = decompress_integrated(&packed, init, &mut keys[remainder..])?;
            if consumed != words {
                return Err(KeyError::Corruption("packed word count mismatch"));
            }
        }
        if options.verify_order_on_read && !strictly_increasing(&keys, |a, b| a.cmp(b)) {
            debug!(count, "keys.packed.read.unordered");
            return Err(KeyError::Corruption("key array not strictly increasing"));
        }
        trace!(
            count,
            remainder,
            words,
            bytes = cur.off - start,
            "keys.packed.read"
        );
        Ok(Self::new(keys))
    }

    fn with_keys(keys: Vec<T>) -> SharedKeys<T> {
        Arc::new(Self::new(keys))
    }
}

/// Key preceding the first aligned block, or zero when there is no prefix.
fn frame_of_reference<T: PackedInt>(keys: &[T], remainder: usize) -> T {
    if remainder == 0 {
        T::default()
    } else {
        keys[remainder - 1]
    }
}

fn encode<T: PackedInt>(keys: &[T], out: &mut Vec<u8>) {
    let (remainder, aligned) = split_aligned::<T>(keys.len());
    compress_variable(&keys[..remainder], out);
    if aligned == 0 {
        trace!(count = keys.len(), remainder, "keys.packed.write");
        return;
    }
    let init = frame_of_reference(keys, remainder);
    let tail = &keys[remainder..];
    let mut packed = vec![T::default(); estimate_compressed_array_length(tail, init)];
    let words = compress_integrated(tail, init, &mut packed);
    var::encode_u64(words as u64, out);
    out.reserve(words * T::BYTES);
    for &word in &packed[..words] {
        word.put_be(out);
    }
    trace!(count = keys.len(), remainder, words, "keys.packed.write");
}

fn encoded_len<T: PackedInt>(keys: &[T]) -> usize {
    let (remainder, aligned) = split_aligned::<T>(keys.len());
    let mut len = variable_len(&keys[..remainder]);
    if aligned > 0 {
        let init = frame_of_reference(keys, remainder);
        let words = estimate_compressed_array_length(&keys[remainder..], init);
        len += var::len_u64(words as u64) + words * T::BYTES;
    }
    len
}

impl<T: PackedInt> KeyManager<T> for PackedKeyManager<T> {
    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn key(&self, index: usize) -> Result<T> {
        check_index(index, self.keys.len())?;
        Ok(self.keys[index])
    }

    fn binary_search(&self, key: &T, hint: isize) -> isize {
        let keys = &self.keys;
        hinted_binary_search(keys.len(), hint, |x| key.cmp(&keys[x]))
    }

    fn expand_keys(&self, extra: &[T]) -> Result<SharedKeys<T>> {
        Ok(Self::with_keys(concat(&self.keys, extra)))
    }

    fn copy(&self, start: usize, end: usize) -> Result<SharedKeys<T>> {
        check_range(start, end, self.keys.len())?;
        Ok(Self::with_keys(self.keys[start..end].to_vec()))
    }

    fn insert_key(&self, index: usize, key: T) -> Result<SharedKeys<T>> {
        check_insert(index, self.keys.len())?;
        Ok(Self::with_keys(copy_with_gap(&self.keys, index, key)))
    }

    fn remove(&self, index: usize) -> Result<SharedKeys<T>> {
        check_index(index, self.keys.len())?;
        if self.keys.len() == 1 {
            return Ok(Arc::new(Self::empty()));
        }
        Ok(Self::with_keys(copy_except(&self.keys, index)))
    }

    fn write(&self, count: usize, out: &mut Vec<u8>) -> Result<()> {
        check_write_count(count, self.keys.len())?;
        encode(&self.keys[..count], out);
        Ok(())
    }

    fn serialized_data_size(&self) -> usize {
        encoded_len(&self.keys)
    }

    fn memory(&self) -> usize {
        ARRAY_OVERHEAD + self.keys.len() * T::BYTES
    }
}
