#![forbid(unsafe_code)]
//! Varint and buffer utilities shared by the key codecs.

pub mod var {
    //! Unsigned LEB128 varints: seven payload bits per byte, low group first.

    use crate::types::{KeyError, Result};

    /// Maximum encoded length of a u32 varint.
    pub const MAX_U32_LEN: usize = 5;
    /// Maximum encoded length of a u64 varint.
    pub const MAX_U64_LEN: usize = 10;

    /// Encodes a u64 as an unsigned varint.
    pub fn encode_u64(mut v: u64, out: &mut Vec<u8>) {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                out.push(byte);
                break;
            }
            out.push(byte | 0x80);
        }
    }

    /// Encodes a u32 as an unsigned varint (at most five bytes).
    #[inline]
    pub fn encode_u32(v: u32, out: &mut Vec<u8>) {
        encode_u64(u64::from(v), out);
    }

    /// Number of bytes [`encode_u64`] emits for `v`.
    #[inline]
    pub fn len_u64(v: u64) -> usize {
        let bits = 64 - (v | 1).leading_zeros() as usize;
        bits.div_ceil(7)
    }

    /// Number of bytes [`encode_u32`] emits for `v`.
    #[inline]
    pub fn len_u32(v: u32) -> usize {
        len_u64(u64::from(v))
    }

    /// Decodes a u64 varint from a slice, updating the offset.
    pub fn decode_u64(src: &[u8], off: &mut usize) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        for i in 0..MAX_U64_LEN {
            let byte = *src
                .get(*off)
                .ok_or(KeyError::Corruption("varint decode truncated"))?;
            *off += 1;
            let payload = u64::from(byte & 0x7f);
            if i == MAX_U64_LEN - 1 && payload > 1 {
                return Err(KeyError::Corruption("varint overflow (more than 64 bits)"));
            }
            result |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(KeyError::Corruption("varint too long"))
    }

    /// Decodes a u32 varint from a slice, updating the offset.
    pub fn decode_u32(src: &[u8], off: &mut usize) -> Result<u32> {
        let start = *off;
        let value = decode_u64(src, off)?;
        if *off - start > MAX_U32_LEN {
            return Err(KeyError::Corruption("varint too long for u32"));
        }
        u32::try_from(value).map_err(|_| KeyError::Corruption("varint overflow (more than 32 bits)"))
    }
}

pub mod buf {
    //! A slice-backed cursor for parsing key pages.

    use core::fmt;

    use super::var;
    use crate::types::{KeyError, Result};

    /// A cursor for reading bytes from a slice with offset tracking.
    pub struct Cursor<'a> {
        /// The underlying byte slice.
        pub buf: &'a [u8],
        /// Current read offset.
        pub off: usize,
    }

    impl<'a> Cursor<'a> {
        /// Creates a new cursor starting at offset 0.
        pub fn new(buf: &'a [u8]) -> Self {
            Self { buf, off: 0 }
        }

        /// Takes the next `n` bytes from the cursor, advancing the offset.
        pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
            let end = self
                .off
                .checked_add(n)
                .ok_or(KeyError::Corruption("cursor offset overflow"))?;
            let slice = self
                .buf
                .get(self.off..end)
                .ok_or(KeyError::Corruption("cursor take beyond buffer"))?;
            self.off = end;
            Ok(slice)
        }

        /// Reads an unsigned varint that must fit in 32 bits.
        pub fn read_var_u32(&mut self) -> Result<u32> {
            var::decode_u32(self.buf, &mut self.off)
        }

        /// Reads an unsigned varint.
        pub fn read_var_u64(&mut self) -> Result<u64> {
            var::decode_u64(self.buf, &mut self.off)
        }

        /// Reads a varint length prefix and checks it against the remaining bytes.
        pub fn read_len(&mut self) -> Result<usize> {
            let len = usize::try_from(self.read_var_u64()?)
                .map_err(|_| KeyError::Corruption("length prefix exceeds usize"))?;
            if len > self.remaining() {
                return Err(KeyError::Corruption("length prefix beyond buffer"));
            }
            Ok(len)
        }

        /// Returns the number of bytes remaining in the buffer.
        pub fn remaining(&self) -> usize {
            self.buf.len().saturating_sub(self.off)
        }
    }

    impl fmt::Debug for Cursor<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Cursor")
                .field("off", &self.off)
                .field("remaining", &self.remaining())
                .finish()
        }
    }
}
