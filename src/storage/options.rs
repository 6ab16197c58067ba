use crate::primitives::packing::{INT_BLOCK_SIZE, LONG_BLOCK_SIZE};
use crate::types::{KeyError, Result};

/// Default number of keys per page.
///
/// Two long blocks plus one leading key: the leading key becomes the frame
/// of reference so the first aligned block is packed at its real width,
/// and a split still leaves each half block aligned.
pub const DEFAULT_KEYS_PER_PAGE: usize = 2 * LONG_BLOCK_SIZE + 1;

/// Configuration knobs consulted when key managers are built from a page buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyManagerOptions {
    /// Whether to check strict key order after decoding a page.
    pub verify_order_on_read: bool,
    /// Whether fixed-length byte keys decode into one contiguous buffer.
    pub contiguous_fixed_bytes: bool,
    /// Number of keys a page is expected to hold.
    pub keys_per_page: usize,
}

impl Default for KeyManagerOptions {
    fn default() -> Self {
        Self {
            verify_order_on_read: false,
            contiguous_fixed_bytes: true,
            keys_per_page: DEFAULT_KEYS_PER_PAGE,
        }
    }
}

impl KeyManagerOptions {
    /// Options that reject out-of-order pages instead of trusting them.
    pub fn verifying() -> Self {
        Self::default().verify_order_on_read(true)
    }

    /// Enables or disables order verification on decode.
    pub fn verify_order_on_read(mut self, enabled: bool) -> Self {
        self.verify_order_on_read = enabled;
        self
    }

    /// Enables or disables the contiguous layout for fixed-length byte keys.
    pub fn contiguous_fixed_bytes(mut self, enabled: bool) -> Self {
        self.contiguous_fixed_bytes = enabled;
        self
    }

    /// Sets the expected page capacity.
    pub fn keys_per_page(mut self, keys: usize) -> Self {
        self.keys_per_page = keys;
        self
    }

    /// Whether `keys_per_page` minus the leading key fills whole packing blocks.
    pub fn packing_friendly(&self) -> bool {
        let tail = self.keys_per_page.saturating_sub(1);
        tail > 0 && tail % INT_BLOCK_SIZE == 0 && tail % LONG_BLOCK_SIZE == 0
    }

    /// Checks the options for values the key managers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.keys_per_page == 0 {
            return Err(KeyError::Invalid("keys_per_page must be positive"));
        }
        Ok(())
    }
}
