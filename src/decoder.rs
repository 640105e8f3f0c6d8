//! FSE block decoder.

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::tans::DecompressionTable;

/// Upper bound on the output buffer reserved up front from a header's
/// declared length.
const MAX_PREALLOCATION: usize = 1 << 20;

/// FSE decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FseDecoder;

impl FseDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decompress a block produced by [`crate::FseEncoder::compress`].
    ///
    /// # Errors
    /// - `CorruptHeader` if the header is truncated or inconsistent.
    /// - `CorruptStream` if the bitstream lacks its end mark, runs out early,
    ///   or has bits left once every symbol is decoded.
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (header, offset) = Header::read(input)?;
        let table = DecompressionTable::new(&header.normalized);
        log::debug!(
            "decompressing {} symbols from {} bytes, table log {}",
            header.symbol_count,
            input.len(),
            table.table_log()
        );
        decode_symbols(&input[offset..], &table, header.symbol_count)
    }
}

/// Decode `symbol_count` symbols from `stream`.
///
/// The states come off the tail first, `state1` then `state2`. All but the
/// last two symbols advance their state with bits from the stream, in the
/// order `state1`, `state2`, `state1`, ... The last two are the encoder's
/// seed states and consume nothing.
pub(crate) fn decode_symbols(
    stream: &[u8],
    table: &DecompressionTable,
    symbol_count: usize,
) -> Result<Vec<u8>> {
    debug_assert!(symbol_count >= 2);
    let table_log = table.table_log();
    let mut reader = BitReader::new(stream)?;
    let mut state1 = reader.read_bits(table_log)?;
    let mut state2 = reader.read_bits(table_log)?;

    let body = symbol_count - 2;
    let mut out = Vec::with_capacity(symbol_count.min(MAX_PREALLOCATION));

    let mut decoded = 0;
    while decoded + 1 < body {
        out.push(table.decode_symbol(&mut state1, &mut reader)?);
        out.push(table.decode_symbol(&mut state2, &mut reader)?);
        reader.reload();
        decoded += 2;
    }
    if decoded < body {
        out.push(table.decode_symbol(&mut state1, &mut reader)?);
    }

    // An odd body leaves state2 next in turn.
    if body & 1 == 0 {
        out.push(table.symbol(state1));
        out.push(table.symbol(state2));
    } else {
        out.push(table.symbol(state2));
        out.push(table.symbol(state1));
    }

    if !reader.is_exhausted() {
        return Err(Error::CorruptStream("trailing bits after last symbol"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_symbols;
    use crate::normalize::NormalizedCounts;
    use crate::tans::CompressionTable;

    fn roundtrip_with(norm: &NormalizedCounts, input: &[u8]) -> Vec<u8> {
        let ctable = CompressionTable::new(norm);
        let dtable = DecompressionTable::new(norm);
        let mut stream = Vec::new();
        encode_symbols(input, &ctable, &mut stream);
        decode_symbols(&stream, &dtable, input.len()).unwrap()
    }

    #[test]
    fn test_tail_ordering_for_every_short_length() {
        let norm = NormalizedCounts::new(5, vec![8, 8, 8, 8]).unwrap();
        let pattern = [3u8, 1, 0, 2, 2, 1, 3, 0, 1];
        for len in 2..=pattern.len() {
            assert_eq!(roundtrip_with(&norm, &pattern[..len]), &pattern[..len]);
        }
    }

    #[test]
    fn test_zero_bit_symbols_are_counted_not_inferred() {
        let norm = NormalizedCounts::new(5, vec![32]).unwrap();
        for len in [2usize, 3, 7, 32, 33, 1000] {
            assert_eq!(roundtrip_with(&norm, &vec![0u8; len]), vec![0u8; len]);
        }
    }

    #[test]
    fn test_wide_table_pairs_schedule() {
        // Table log 15 flushes per pair instead of per quartet.
        let mut probs = vec![0i32; 4];
        probs[0] = 20000;
        probs[1] = 12000;
        probs[2] = -1;
        probs[3] = 767;
        let norm = NormalizedCounts::new(15, probs).unwrap();
        let cycle = [0u8, 1, 0, 3, 1, 2, 0];
        let input: Vec<u8> = (0..1003).map(|i| cycle[i % cycle.len()]).collect();
        assert_eq!(roundtrip_with(&norm, &input), input);
    }

    #[test]
    fn test_trailing_bits_are_rejected() {
        let norm = NormalizedCounts::new(5, vec![8, 8, 8, 8]).unwrap();
        let ctable = CompressionTable::new(&norm);
        let dtable = DecompressionTable::new(&norm);
        let mut stream = Vec::new();
        encode_symbols(&[0, 1, 2, 3, 0, 1], &ctable, &mut stream);
        assert_eq!(
            decode_symbols(&stream, &dtable, 4).unwrap_err(),
            Error::CorruptStream("trailing bits after last symbol")
        );
        assert!(decode_symbols(&stream, &dtable, 40).is_err());
    }
}
