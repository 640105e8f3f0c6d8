//! Codec configuration.
//!
//! The table-log bounds live here rather than in process-wide constants so
//! that every compress call carries its own limits into the selector.

use crate::error::{Error, Result};

/// Smallest table log the format can express (the header stores `log - 5`).
pub const MIN_TABLE_LOG: u32 = 5;

/// Largest table log supported: states must fit in 16 bits.
pub const MAX_TABLE_LOG: u32 = 15;

/// Table-log ceiling used when none is configured.
pub const DEFAULT_TABLE_LOG: u32 = 11;

/// Symbol ceiling used when none is configured.
pub const DEFAULT_MAX_SYMBOL_VALUE: u8 = 255;

/// Compression parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FseConfig {
    /// Largest byte value accepted in the input.
    pub max_symbol_value: u8,
    /// Upper bound for the selected table log.
    pub max_table_log: u32,
    /// Lower bound for the selected table log.
    pub min_table_log: u32,
}

impl Default for FseConfig {
    fn default() -> Self {
        Self {
            max_symbol_value: DEFAULT_MAX_SYMBOL_VALUE,
            max_table_log: DEFAULT_TABLE_LOG,
            min_table_log: MIN_TABLE_LOG,
        }
    }
}

impl FseConfig {
    /// Default configuration: byte alphabet, table log between 5 and 11.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted symbol.
    pub fn with_max_symbol_value(mut self, max_symbol_value: u8) -> Self {
        self.max_symbol_value = max_symbol_value;
        self
    }

    /// Set the table-log ceiling.
    pub fn with_max_table_log(mut self, max_table_log: u32) -> Self {
        self.max_table_log = max_table_log;
        self
    }

    /// Set the table-log floor.
    pub fn with_min_table_log(mut self, min_table_log: u32) -> Self {
        self.min_table_log = min_table_log;
        self
    }

    /// Check that both bounds are within `MIN_TABLE_LOG..=MAX_TABLE_LOG`
    /// and ordered.
    pub fn validate(&self) -> Result<()> {
        for log in [self.min_table_log, self.max_table_log] {
            if !(MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&log) {
                return Err(Error::InvalidTableLog(log));
            }
        }
        if self.min_table_log > self.max_table_log {
            return Err(Error::InvalidTableLog(self.min_table_log));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FseConfig::default();
        assert_eq!(config.max_table_log, 11);
        assert_eq!(config.min_table_log, 5);
        assert_eq!(config.max_symbol_value, 255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_logs() {
        assert_eq!(
            FseConfig::new().with_max_table_log(16).validate(),
            Err(Error::InvalidTableLog(16))
        );
        assert_eq!(
            FseConfig::new().with_min_table_log(4).validate(),
            Err(Error::InvalidTableLog(4))
        );
        assert_eq!(
            FseConfig::new()
                .with_min_table_log(9)
                .with_max_table_log(8)
                .validate(),
            Err(Error::InvalidTableLog(9))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let config = FseConfig::new().with_max_table_log(13);
        let json = serde_json::to_string(&config).unwrap();
        let back: FseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
