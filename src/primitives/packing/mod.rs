#![forbid(unsafe_code)]
//! Integrated binary packing for monotonically increasing integer runs.
//!
//! A sorted key array is stored as a short *variable* prefix followed by
//! zero or more aligned blocks of [`PackedInt::BLOCK_SIZE`] keys:
//!
//! * the prefix (`len % BLOCK_SIZE` keys) is written as LEB128 deltas from
//!   the previous key, the first one relative to zero;
//! * aligned blocks are frame-of-reference encoded: each block stores the
//!   deltas against its predecessor packed at the smallest bit width that
//!   holds the largest delta. Up to four blocks share one header word
//!   whose bytes carry their bit widths, the first block in the most
//!   significant used byte.
//!
//! The codec does not validate ordering. Callers verify monotonicity
//! before compressing; decoding trusts previously written data.

mod bitpack;
mod integrated;
mod variable;

pub use integrated::{
    compress_integrated, decompress_integrated, estimate_compressed_array_length,
};
pub use variable::{compress_variable, decompress_variable, variable_len};

use core::fmt::Debug;

/// Keys per aligned block for 32-bit integers.
pub const INT_BLOCK_SIZE: usize = 32;
/// Keys per aligned block for 64-bit integers.
pub const LONG_BLOCK_SIZE: usize = 64;
/// Number of blocks whose bit widths share one header word.
pub const BLOCKS_PER_HEADER: usize = 4;

/// Fixed-width integer that the packing codec can compress.
///
/// Arithmetic happens on the two's complement bit pattern widened to
/// `u64`, so signed keys sort and pack exactly like their unsigned image
/// as long as the run is strictly increasing in the key's own order.
pub trait PackedInt: Copy + Ord + Default + Debug + Send + Sync + 'static {
    /// Width of the integer in bits.
    const BITS: u32;
    /// Keys per aligned block; one block of width `w` occupies `w` words.
    const BLOCK_SIZE: usize;
    /// Size of one packed word on the wire.
    const BYTES: usize;

    /// Zero-extended bit pattern.
    fn to_bits(self) -> u64;

    /// Truncating inverse of [`PackedInt::to_bits`].
    fn from_bits(bits: u64) -> Self;

    /// Appends the big-endian encoding of one packed word.
    fn put_be(self, out: &mut Vec<u8>);

    /// Decodes one big-endian packed word.
    fn get_be(src: &[u8]) -> Self;
}

macro_rules! packed_int {
    ($ty:ty, $unsigned:ty, $block:expr) => {
        impl PackedInt for $ty {
            const BITS: u32 = (core::mem::size_of::<$ty>() * 8) as u32;
            const BLOCK_SIZE: usize = $block;
            const BYTES: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn to_bits(self) -> u64 {
                u64::from(self as $unsigned)
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $ty
            }

            #[inline]
            fn put_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            #[inline]
            fn get_be(src: &[u8]) -> Self {
                let mut arr = [0u8; core::mem::size_of::<$ty>()];
                arr.copy_from_slice(&src[..core::mem::size_of::<$ty>()]);
                <$ty>::from_be_bytes(arr)
            }
        }
    };
}

packed_int!(i32, u32, INT_BLOCK_SIZE);
packed_int!(u32, u32, INT_BLOCK_SIZE);
packed_int!(i64, u64, LONG_BLOCK_SIZE);
packed_int!(u64, u64, LONG_BLOCK_SIZE);

/// Mask selecting the low `bits` bits.
#[inline]
pub(crate) fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Delta between two consecutive keys, reduced to the key width.
#[inline]
pub(crate) fn delta<T: PackedInt>(prev: T, next: T) -> u64 {
    next.to_bits().wrapping_sub(prev.to_bits()) & low_mask(T::BITS)
}

/// Splits `count` keys into the variable prefix length and the aligned tail length.
#[inline]
pub fn split_aligned<T: PackedInt>(count: usize) -> (usize, usize) {
    let remainder = count % T::BLOCK_SIZE;
    (remainder, count - remainder)
}
