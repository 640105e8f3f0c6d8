//! Error types for the FSE codec.

use thiserror::Error;

/// Error variants for FSE operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An input byte is larger than the configured maximum symbol value.
    #[error("symbol {symbol} exceeds max symbol value {max}")]
    InvalidSymbol {
        /// The offending byte.
        symbol: u8,
        /// The configured ceiling.
        max: u8,
    },

    /// Inputs shorter than two bytes carry no distribution worth coding.
    #[error("input of {0} bytes is too short to entropy code")]
    DegenerateInput(usize),

    /// The symbol count does not fit the 32-bit header field.
    #[error("input of {0} bytes is too large for a single block")]
    InputTooLarge(usize),

    /// A table log outside the supported range was requested.
    #[error("table log {0} is outside the supported range")]
    InvalidTableLog(u32),

    /// The table has fewer slots than there are distinct symbols.
    #[error("cannot fit {symbols} symbols into a table of log {table_log}")]
    NormalizationFailed {
        /// Number of distinct symbols present.
        symbols: usize,
        /// Table log that was too small.
        table_log: u32,
    },

    /// The header region is truncated or inconsistent.
    #[error("corrupt header: {0}")]
    CorruptHeader(&'static str),

    /// The bitstream does not decode to the declared symbol count.
    #[error("corrupt bitstream: {0}")]
    CorruptStream(&'static str),
}

/// A specialized Result type for FSE operations.
pub type Result<T> = std::result::Result<T, Error>;
