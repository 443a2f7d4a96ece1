//! Construction-time shape parameters.

use crate::error::{Error, Result};

/// Smallest accepted exponent.
pub const MIN_BIT_LENGTH: u32 = 2;
/// Largest accepted exponent.
pub const MAX_BIT_LENGTH: u32 = 30;
/// Exponent used by [`BigListConfig::default`].
pub const DEFAULT_BIT_LENGTH: u32 = 16;

/// Fan-out and leaf size of a [`BigList`](crate::BigList), both powers of two.
///
/// Fixed for the lifetime of a list. Small values are useful in tests because
/// they produce deep trees from few elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BigListConfig {
    subbranches_bit_length: u32,
    leaf_size_bit_length: u32,
}

impl Default for BigListConfig {
    fn default() -> Self {
        return BigListConfig {
            subbranches_bit_length: DEFAULT_BIT_LENGTH,
            leaf_size_bit_length: DEFAULT_BIT_LENGTH,
        };
    }
}

impl BigListConfig {
    /// Fan-out `2^subbranches_bit_length`, leaf capacity `2^leaf_size_bit_length`.
    pub fn new(subbranches_bit_length: u32, leaf_size_bit_length: u32) -> Result<BigListConfig> {
        check_bits(subbranches_bit_length, "subbranches bit length must be within 2..=30")?;
        check_bits(leaf_size_bit_length, "leaf size bit length must be within 2..=30")?;
        return Ok(BigListConfig {
            subbranches_bit_length,
            leaf_size_bit_length,
        });
    }

    /// Same exponent for fan-out and leaf size.
    pub fn with_subbranches(subbranches_bit_length: u32) -> Result<BigListConfig> {
        return BigListConfig::new(subbranches_bit_length, subbranches_bit_length);
    }

    #[inline]
    pub fn subbranches_bit_length(&self) -> u32 {
        return self.subbranches_bit_length;
    }

    #[inline]
    pub fn leaf_size_bit_length(&self) -> u32 {
        return self.leaf_size_bit_length;
    }

    /// Maximum number of branches of an internal node.
    #[inline]
    pub fn fanout(&self) -> usize {
        return 1usize << self.subbranches_bit_length;
    }

    /// Maximum number of elements stored in one leaf.
    #[inline]
    pub fn leaf_size(&self) -> usize {
        return 1usize << self.leaf_size_bit_length;
    }
}

fn check_bits(bits: u32, message: &'static str) -> Result<()> {
    if !(MIN_BIT_LENGTH..=MAX_BIT_LENGTH).contains(&bits) {
        return Err(Error::InvalidConfig(message));
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BigListConfig::default();
        assert_eq!(config.fanout(), 1 << 16);
        assert_eq!(config.leaf_size(), 1 << 16);
    }

    #[test]
    fn leaf_defaults_to_fanout() {
        let config = BigListConfig::with_subbranches(3).unwrap();
        assert_eq!(config.leaf_size_bit_length(), 3);
        assert_eq!(config.fanout(), 8);
    }

    #[test]
    fn rejects_out_of_range_bits() {
        assert!(BigListConfig::new(1, 4).is_err());
        assert!(BigListConfig::new(4, 31).is_err());
        assert!(BigListConfig::new(30, 2).is_ok());
    }
}
