use std::cmp::Ordering;

use super::{DataType, KeyableDataType};
use crate::primitives::bytes::{buf::Cursor, var};
use crate::types::{KeyError, Result};

/// Heap overhead of one owned string.
const STRING_OVERHEAD: usize = 24;

/// UTF-8 strings: varint byte length followed by the bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringDataType;

/// Strings restricted to ASCII, stored one byte per character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AsciiStringDataType;

fn write_str(out: &mut Vec<u8>, value: &str) {
    var::encode_u64(value.len() as u64, out);
    out.extend_from_slice(value.as_bytes());
}

fn str_len(value: &str) -> usize {
    var::len_u64(value.len() as u64) + value.len()
}

impl DataType for StringDataType {
    type Value = String;

    fn memory(&self, value: &String) -> usize {
        STRING_OVERHEAD + 2 * value.chars().count()
    }

    fn encoded_len(&self, value: &String) -> usize {
        str_len(value)
    }

    fn write(&self, out: &mut Vec<u8>, value: &String) {
        write_str(out, value);
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<String> {
        let len = cur.read_len()?;
        let bytes = cur.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| KeyError::Corruption("string key not utf-8"))
    }
}

impl KeyableDataType for StringDataType {
    /// Orders by UTF-8 bytes, which is code point order.
    ///
    /// This differs from UTF-16 code unit order only when a supplementary
    /// character (U+10000 and up) meets one in U+E000..=U+FFFF: here the
    /// supplementary character sorts last, in UTF-16 it sorts first.
    fn compare(&self, a: &String, b: &String) -> Ordering {
        a.cmp(b)
    }
}

impl DataType for AsciiStringDataType {
    type Value = String;

    fn memory(&self, value: &String) -> usize {
        STRING_OVERHEAD + value.len()
    }

    fn encoded_len(&self, value: &String) -> usize {
        str_len(value)
    }

    fn write(&self, out: &mut Vec<u8>, value: &String) {
        debug_assert!(value.is_ascii(), "ascii key contains non-ascii characters");
        write_str(out, value);
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<String> {
        let len = cur.read_len()?;
        let bytes = cur.take(len)?;
        if !bytes.is_ascii() {
            return Err(KeyError::Corruption("ascii key contains non-ascii byte"));
        }
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }
}

impl KeyableDataType for AsciiStringDataType {
    fn compare(&self, a: &String, b: &String) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }
}
