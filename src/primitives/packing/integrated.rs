//! Block-aligned frame-of-reference compression.

use super::bitpack::{max_diff_bits, pack, unpack};
use super::{PackedInt, BLOCKS_PER_HEADER};
use crate::types::{KeyError, Result};

/// Bit widths for every block of `input`, each relative to its predecessor.
fn block_widths<T: PackedInt>(input: &[T], mut init: T) -> Vec<u32> {
    input
        .chunks_exact(T::BLOCK_SIZE)
        .map(|block| {
            let bits = max_diff_bits(init, block);
            init = block[T::BLOCK_SIZE - 1];
            bits
        })
        .collect()
}

/// Exact number of packed words [`compress_integrated`] produces for `input`.
///
/// `input.len()` must be a multiple of `T::BLOCK_SIZE`.
pub fn estimate_compressed_array_length<T: PackedInt>(input: &[T], init: T) -> usize {
    debug_assert_eq!(input.len() % T::BLOCK_SIZE, 0, "input not block aligned");
    let widths = block_widths(input, init);
    widths.len().div_ceil(BLOCKS_PER_HEADER) + widths.iter().map(|&w| w as usize).sum::<usize>()
}

/// Compresses a block-aligned, strictly increasing run into `out`.
///
/// `init` is the key immediately preceding `input[0]` (zero if none).
/// Returns the number of words written; `out` must hold at least
/// [`estimate_compressed_array_length`] words. An empty input writes nothing.
pub fn compress_integrated<T: PackedInt>(input: &[T], init: T, out: &mut [T]) -> usize {
    debug_assert_eq!(input.len() % T::BLOCK_SIZE, 0, "input not block aligned");
    let widths = block_widths(input, init);
    let mut pos = 0usize;
    let mut prev = init;
    let group_len = BLOCKS_PER_HEADER * T::BLOCK_SIZE;
    for (group, group_widths) in input.chunks(group_len).zip(widths.chunks(BLOCKS_PER_HEADER)) {
        let header = group_widths
            .iter()
            .fold(0u64, |header, &bits| header << 8 | u64::from(bits));
        out[pos] = T::from_bits(header);
        pos += 1;
        for (block, &bits) in group.chunks_exact(T::BLOCK_SIZE).zip(group_widths) {
            pack(prev, block, &mut out[pos..], bits);
            pos += bits as usize;
            prev = block[T::BLOCK_SIZE - 1];
        }
    }
    pos
}

/// Decompresses `out.len()` keys (a multiple of `T::BLOCK_SIZE`) from `packed`.
///
/// `init` must be the same frame of reference passed to
/// [`compress_integrated`]. Returns the number of packed words consumed,
/// or [`KeyError::Corruption`] when `packed` is too short or names a width
/// wider than `T`.
pub fn decompress_integrated<T: PackedInt>(packed: &[T], init: T, out: &mut [T]) -> Result<usize> {
    debug_assert_eq!(out.len() % T::BLOCK_SIZE, 0, "output not block aligned");
    let mut pos = 0usize;
    let mut prev = init;
    let group_len = BLOCKS_PER_HEADER * T::BLOCK_SIZE;
    for group in out.chunks_mut(group_len) {
        let blocks = group.len() / T::BLOCK_SIZE;
        let header = packed
            .get(pos)
            .ok_or(KeyError::Corruption("packed block header missing"))?
            .to_bits();
        pos += 1;
        for (idx, block) in group.chunks_exact_mut(T::BLOCK_SIZE).enumerate() {
            let shift = 8 * (blocks - 1 - idx) as u32;
            let bits = ((header >> shift) & 0xff) as u32;
            if bits > T::BITS {
                return Err(KeyError::Corruption("packed block width exceeds key width"));
            }
            let end = pos + bits as usize;
            if end > packed.len() {
                return Err(KeyError::Corruption("packed block truncated"));
            }
            unpack(prev, &packed[pos..end], block, bits);
            pos = end;
            prev = block[T::BLOCK_SIZE - 1];
        }
    }
    Ok(pos)
}
