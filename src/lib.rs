//! # Finite State Entropy (FSE)
//!
//! *A table-driven asymmetric numeral system coder for byte streams.*
//!
//! ## Intuition First
//!
//! Huffman coding hands every symbol a whole number of bits. A symbol seen
//! 90% of the time still costs one full bit, even though its information
//! content is about 0.15 bits.
//!
//! FSE keeps a small integer *state* instead. Encoding a symbol moves the
//! state to a new value and sheds just enough low bits to stay inside a fixed
//! window `[L, 2L)`. Frequent symbols own many states, so they rarely force
//! bits out; rare symbols own few and shed many. Averaged over a message,
//! the cost per symbol approaches `-log2(p)`.
//!
//! ## Historical Context
//!
//! ```text
//! 2009  Duda        Asymmetric numeral systems
//! 2013  Collet      FSE: tANS with precomputed transition tables
//! 2016  zstd        FSE for literal lengths, match lengths and offsets
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─► histogram ─► table log ─► normalized counts ─┬─► CompressionTable ─► encoder ─► bits
//!                                                       └─► header
//! bits + header ─► normalized counts ─► DecompressionTable ─► decoder ─► bytes
//! ```
//!
//! 1. [`histogram`] counts byte occurrences and trims the alphabet.
//! 2. [`normalize`] chooses a table log and rescales the counts to sum to
//!    exactly `2^table_log`.
//! 3. [`tans`] spreads the symbols across the table and derives both
//!    automata from that one spread.
//! 4. [`encoder`] walks the input backward with two interleaved states;
//!    [`decoder`] reads the stream from its tail and walks forward.
//!
//! ## Example
//!
//! ```rust
//! let input = b"abracadabra, abracadabra, abracadabra";
//! let packed = fse::compress(input)?;
//! assert_eq!(fse::decompress(&packed)?, input);
//! # Ok::<(), fse::Error>(())
//! ```
//!
//! ## Failure Modes
//!
//! 1. **Degenerate inputs**: fewer than two bytes carry no distribution and
//!    are rejected; callers store them raw.
//! 2. **Wide alphabets under a small ceiling**: a table log ceiling that
//!    leaves fewer slots than distinct symbols cannot be normalized.
//!
//! ## References
//!
//! - Duda, J. (2009). "Asymmetric numeral systems."
//! - Collet, Y. (2013). "Finite State Entropy: a new breed of entropy coder."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod histogram;
pub mod normalize;
pub mod tans;

pub use config::FseConfig;
pub use decoder::FseDecoder;
pub use encoder::FseEncoder;
pub use error::{Error, Result};
pub use normalize::NormalizedCounts;
pub use tans::{CompressionTable, DecompressionTable};

/// Compress `input` with the default configuration.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    FseEncoder::default().compress(input)
}

/// Compress `input` with an explicit configuration.
pub fn compress_with(input: &[u8], config: FseConfig) -> Result<Vec<u8>> {
    FseEncoder::new(config)?.compress(input)
}

/// Decompress a block produced by [`compress`] or [`compress_with`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    FseDecoder::new().decompress(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use crate::normalize::RARE;

    #[test]
    fn test_uniform_scenario() {
        let input = b"aaaabbbbccccdddd";
        let packed = compress(input).unwrap();
        let (header, _) = Header::read(&packed).unwrap();
        assert_eq!(header.normalized.table_log(), 5);
        let present: Vec<(u8, i32)> = header.normalized.present().collect();
        assert_eq!(present, vec![(b'a', 8), (b'b', 8), (b'c', 8), (b'd', 8)]);
        assert_eq!(header.symbol_count, 16);
        assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_rare_symbol_at_end() {
        let mut input = vec![b'x'; 200];
        input.push(b'y');
        let packed = compress(&input).unwrap();
        let (header, _) = Header::read(&packed).unwrap();
        assert_eq!(header.normalized.probabilities()[b'y' as usize], RARE);
        let out = decompress(&packed).unwrap();
        assert_eq!(out.len(), 201);
        assert_eq!(out[200], b'y');
        assert_eq!(out, input);
    }

    #[test]
    fn test_several_rare_symbols() {
        let mut input = vec![b'a'; 1000];
        input.insert(17, b'q');
        input.insert(500, b'r');
        input.push(b's');
        let packed = compress(&input).unwrap();
        let (header, _) = Header::read(&packed).unwrap();
        for s in b"qrs" {
            assert_eq!(header.normalized.probabilities()[*s as usize], RARE);
        }
        assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_single_symbol_of_table_size() {
        for table_log in [5u32, 8, 11] {
            let input = vec![b'z'; 1 << table_log];
            let packed = compress(&input).unwrap();
            assert_eq!(decompress(&packed).unwrap(), input);
        }
    }

    #[test]
    fn test_two_bytes() {
        for input in [b"ab", b"aa", b"\x00\xff"] {
            assert_eq!(decompress(&compress(input).unwrap()).unwrap(), input);
        }
    }

    #[test]
    fn test_compresses_skewed_text() {
        let input: Vec<u8> = b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(20_000)
            .copied()
            .collect();
        let packed = compress(&input).unwrap();
        assert!(packed.len() < input.len() * 3 / 4);
        assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_compress_with_custom_config() {
        let config = FseConfig::new()
            .with_max_symbol_value(b'z')
            .with_max_table_log(6);
        let input = b"hello world hello world".repeat(50);
        let packed = compress_with(&input, config).unwrap();
        let (header, _) = Header::read(&packed).unwrap();
        assert_eq!(header.normalized.table_log(), 6);
        assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_table_log_ceiling_too_small_for_alphabet() {
        let input: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        let config = FseConfig::new().with_max_table_log(7);
        assert_eq!(
            compress_with(&input, config).unwrap_err(),
            Error::NormalizationFailed {
                symbols: 256,
                table_log: 7
            }
        );
    }

    #[test]
    fn test_corrupt_stream_end_mark() {
        let mut packed = compress(b"aaaabbbbccccdddd").unwrap();
        packed.push(0);
        assert_eq!(
            decompress(&packed).unwrap_err(),
            Error::CorruptStream("missing end mark")
        );
    }

    #[test]
    fn test_header_only_buffer() {
        let packed = compress(b"aaaabbbbccccdddd").unwrap();
        let (_, offset) = Header::read(&packed).unwrap();
        assert_eq!(
            decompress(&packed[..offset]).unwrap_err(),
            Error::CorruptStream("missing end mark")
        );
        assert!(matches!(
            decompress(&packed[..offset - 1]),
            Err(Error::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_concurrent_calls_are_independent() {
        let inputs: Vec<Vec<u8>> = (0..8u8)
            .map(|t| (0..5000u32).map(|i| ((i * (t as u32 + 3)) % 37) as u8 + t).collect())
            .collect();
        let encoder = FseEncoder::default();
        let decoder = FseDecoder::new();
        std::thread::scope(|scope| {
            for input in &inputs {
                let (encoder, decoder) = (&encoder, &decoder);
                scope.spawn(move || {
                    let packed = encoder.compress(input).unwrap();
                    assert_eq!(&decoder.decompress(&packed).unwrap(), input);
                });
            }
        });
    }
}
