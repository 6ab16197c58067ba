//! Sorted key storage for copy-on-write B-tree pages.
//!
//! Each page owns an immutable [`KeyManager`](storage::keys::KeyManager)
//! chosen by the key's [`KeyableDataType`](storage::datatype::KeyableDataType).
//! Integer keys are kept in primitive arrays and written with integrated
//! binary packing; fixed-width byte keys share one contiguous buffer; every
//! other type falls back to an array of decoded values.

#![warn(missing_docs)]

pub mod primitives;
pub mod storage;
pub mod types;

pub use storage::datatype::{DataType, KeyableDataType};
pub use storage::keys::{KeyManager, SharedKeys};
pub use storage::options::KeyManagerOptions;
pub use types::{KeyError, Result};
