//! Packing of a single block of deltas at a fixed bit width.
//!
//! Deltas form a little-endian bit stream: delta `j` starts at bit
//! `j * width`, low bits first, spilling into the next word when it
//! crosses a word boundary. A block of `BLOCK_SIZE` deltas at width `w`
//! therefore fills exactly `w` words.

use super::{delta, low_mask, PackedInt};

/// Bit width needed for the largest delta of `block` against `init`.
pub(crate) fn max_diff_bits<T: PackedInt>(init: T, block: &[T]) -> u32 {
    let mut prev = init;
    let mut mask = 0u64;
    for &value in block {
        mask |= delta(prev, value);
        prev = value;
    }
    64 - mask.leading_zeros()
}

/// Packs the deltas of `block` (relative to `init`) into `out[..bits]`.
pub(crate) fn pack<T: PackedInt>(init: T, block: &[T], out: &mut [T], bits: u32) {
    debug_assert_eq!(block.len(), T::BLOCK_SIZE);
    debug_assert!(out.len() >= bits as usize);
    if bits == 0 {
        return;
    }
    if bits == T::BITS {
        // deltas at full width reconstruct to the raw values
        out[..T::BLOCK_SIZE].copy_from_slice(block);
        return;
    }
    let mut word = 0usize;
    let mut used = 0u32;
    let mut acc = 0u64;
    let mut prev = init;
    for &value in block {
        let d = delta(prev, value);
        prev = value;
        acc |= d << used;
        used += bits;
        if used >= T::BITS {
            out[word] = T::from_bits(acc);
            word += 1;
            used -= T::BITS;
            acc = if used == 0 { 0 } else { d >> (bits - used) };
        }
    }
    debug_assert_eq!(used, 0);
    debug_assert_eq!(word, bits as usize);
}

/// Reverses [`pack`], writing `T::BLOCK_SIZE` keys into `out`.
pub(crate) fn unpack<T: PackedInt>(init: T, packed: &[T], out: &mut [T], bits: u32) {
    debug_assert_eq!(out.len(), T::BLOCK_SIZE);
    if bits == 0 {
        out.fill(init);
        return;
    }
    if bits == T::BITS {
        out.copy_from_slice(&packed[..T::BLOCK_SIZE]);
        return;
    }
    let mask = low_mask(bits);
    let mut prev = init.to_bits();
    let mut bit_pos = 0u32;
    for slot in out.iter_mut() {
        let word = (bit_pos / T::BITS) as usize;
        let offset = bit_pos % T::BITS;
        let mut d = packed[word].to_bits() >> offset;
        if offset + bits > T::BITS {
            d |= packed[word + 1].to_bits() << (T::BITS - offset);
        }
        prev = prev.wrapping_add(d & mask);
        *slot = T::from_bits(prev);
        bit_pos += bits;
    }
}

#[cfg(test)]
mod tests {
    use super::{max_diff_bits, pack, unpack};
    use crate::primitives::packing::PackedInt;

    fn ramp<T: PackedInt>(start: u64, step: u64) -> Vec<T> {
        (0..T::BLOCK_SIZE as u64)
            .map(|i| T::from_bits(start + i * step))
            .collect()
    }

    #[test]
    fn widths_follow_largest_gap() {
        let block: Vec<i32> = ramp(1, 1);
        assert_eq!(max_diff_bits(0, &block), 1);
        let block: Vec<i32> = ramp(100, 5);
        assert_eq!(max_diff_bits(99, &block), 3);
        let block: Vec<i64> = ramp(0, 1 << 40);
        assert_eq!(max_diff_bits(0, &block), 41);
    }

    #[test]
    fn zero_width_block_is_constant_run() {
        // only reachable with equal keys, which never occur in a key page
        let block = vec![7i32; 32];
        assert_eq!(max_diff_bits(7, &block), 0);
        let mut out = vec![0i32; 32];
        unpack(7, &[], &mut out, 0);
        assert_eq!(out, block);
    }

    #[test]
    fn every_width_roundtrips_i32() {
        for bits in 1..=32u32 {
            let step = if bits == 32 { 1 << 31 } else { (1u64 << bits) - 1 };
            let block: Vec<i32> = ramp(3, step);
            let init = 3i32.wrapping_sub(step as i32);
            assert_eq!(max_diff_bits(init, &block), bits, "width {bits}");
            let mut packed = vec![0i32; bits as usize];
            pack(init, &block, &mut packed, bits);
            let mut out = vec![0i32; 32];
            unpack(init, &packed, &mut out, bits);
            assert_eq!(out, block, "width {bits}");
        }
    }

    #[test]
    fn every_width_roundtrips_u64() {
        for width in 1..=64u32 {
            let gap = if width == 64 { 1 << 63 } else { (1u64 << width) - 1 };
            let mut block = Vec::with_capacity(64);
            let mut value = 0u64;
            for i in 0..64u64 {
                value = value.wrapping_add(if i % 2 == 0 { gap } else { 1 });
                block.push(value);
            }
            let bits = max_diff_bits(0u64, &block);
            assert_eq!(bits, width);
            let mut packed = vec![0u64; bits as usize];
            pack(0, &block, &mut packed, bits);
            let mut out = vec![0u64; 64];
            unpack(0, &packed, &mut out, bits);
            assert_eq!(out, block, "width {bits}");
        }
    }
}
