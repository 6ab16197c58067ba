//! Byte-aligned delta encoding for the unaligned key prefix.

use super::{delta, PackedInt};
use crate::primitives::bytes::{buf::Cursor, var};
use crate::types::Result;

/// Appends each key of `input` as a varint delta from its predecessor.
///
/// The first key is written relative to zero, so signed values below zero
/// take the full varint width of their unsigned image.
pub fn compress_variable<T: PackedInt>(input: &[T], out: &mut Vec<u8>) {
    let mut prev = T::default();
    for &value in input {
        var::encode_u64(delta(prev, value), out);
        prev = value;
    }
}

/// Exact number of bytes [`compress_variable`] writes for `input`.
pub fn variable_len<T: PackedInt>(input: &[T]) -> usize {
    let mut prev = T::default();
    input
        .iter()
        .map(|&value| {
            let len = var::len_u64(delta(prev, value));
            prev = value;
            len
        })
        .sum()
}

/// Reads `out.len()` delta-encoded keys written by [`compress_variable`].
pub fn decompress_variable<T: PackedInt>(cur: &mut Cursor<'_>, out: &mut [T]) -> Result<()> {
    let mut acc = 0u64;
    for slot in out.iter_mut() {
        acc = acc.wrapping_add(cur.read_var_u64()?);
        *slot = T::from_bits(acc);
    }
    Ok(())
}
