//! Page key storage: data types, key managers, and their options.

/// Value encodings and the key manager each key type selects.
///
/// Integer types pick packed managers, fixed-length byte strings pick the
/// contiguous manager, everything else the object manager.
pub mod datatype;

/// Immutable key managers and the hinted binary search they share.
pub mod keys;

/// Knobs for decoding key managers from page buffers.
pub mod options;

pub use datatype::{DataType, KeyableDataType};
pub use keys::{KeyManager, SharedKeys};
pub use options::KeyManagerOptions;
