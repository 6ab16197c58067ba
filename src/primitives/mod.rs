//! Low-level primitives for encoding key pages.
//!
//! Includes byte utilities and the integrated binary packing codec used
//! by the fixed-width integer key managers.

/// Byte-level utilities and encoding/decoding.
///
/// Varints and a bounds-checked read cursor.
pub mod bytes;

/// Delta and bit-packing compression for sorted integer keys.
pub mod packing;
