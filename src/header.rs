//! Compressed buffer header.
//!
//! ```text
//! [table_log - 5][max_symbol]
//! { [symbol][probability] } for each present symbol, ascending
//! [symbol count: u32 LE]
//! ```
//!
//! Probabilities take one byte up to table log 7 and two bytes big-endian
//! above it. In both widths the all-ones pattern is the rare sentinel and
//! every other value is a plain slot count. The run of entries ends with the
//! entry for `max_symbol`, which is always present.

use crate::config::{MAX_TABLE_LOG, MIN_TABLE_LOG};
use crate::error::{Error, Result};
use crate::normalize::{NormalizedCounts, RARE};

/// Smallest table log whose probabilities are stored in two bytes.
pub const WIDE_PROBABILITY_TABLE_LOG: u32 = 8;

/// Distribution and length of one compressed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Symbol probabilities the tables are built from.
    pub normalized: NormalizedCounts,
    /// Number of symbols in the block.
    pub symbol_count: usize,
}

impl Header {
    /// Serialize onto the end of `out`.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let count = u32::try_from(self.symbol_count)
            .map_err(|_| Error::InputTooLarge(self.symbol_count))?;
        let normalized = &self.normalized;
        let wide = normalized.table_log() >= WIDE_PROBABILITY_TABLE_LOG;

        out.push((normalized.table_log() - MIN_TABLE_LOG) as u8);
        out.push(normalized.max_symbol());
        for (symbol, probability) in normalized.present() {
            out.push(symbol);
            if wide {
                let value = if probability == RARE { u16::MAX } else { probability as u16 };
                out.extend_from_slice(&value.to_be_bytes());
            } else {
                out.push(if probability == RARE { u8::MAX } else { probability as u8 });
            }
        }
        out.extend_from_slice(&count.to_le_bytes());
        Ok(())
    }

    /// Parse a header from the front of `input`.
    ///
    /// Returns the header and the offset of the first bitstream byte.
    pub fn read(input: &[u8]) -> Result<(Self, usize)> {
        let mut pos = 0;
        let table_log = next_byte(input, &mut pos)? as u32 + MIN_TABLE_LOG;
        if table_log > MAX_TABLE_LOG {
            return Err(Error::CorruptHeader("table log out of range"));
        }
        let max_symbol = next_byte(input, &mut pos)?;
        let wide = table_log >= WIDE_PROBABILITY_TABLE_LOG;

        let mut probabilities = vec![0i32; max_symbol as usize + 1];
        let mut previous: Option<u8> = None;
        loop {
            let symbol = next_byte(input, &mut pos)?;
            if symbol > max_symbol {
                return Err(Error::CorruptHeader("symbol above max symbol"));
            }
            if previous.map_or(false, |p| symbol <= p) {
                return Err(Error::CorruptHeader("symbols out of order"));
            }
            let probability = if wide {
                let hi = next_byte(input, &mut pos)?;
                let lo = next_byte(input, &mut pos)?;
                match u16::from_be_bytes([hi, lo]) {
                    u16::MAX => RARE,
                    v => v as i32,
                }
            } else {
                match next_byte(input, &mut pos)? {
                    u8::MAX => RARE,
                    v => v as i32,
                }
            };
            if probability == 0 {
                return Err(Error::CorruptHeader("zero probability entry"));
            }
            probabilities[symbol as usize] = probability;
            previous = Some(symbol);
            if symbol == max_symbol {
                break;
            }
        }

        let mut count = [0u8; 4];
        for b in count.iter_mut() {
            *b = next_byte(input, &mut pos)?;
        }
        let symbol_count = u32::from_le_bytes(count) as usize;
        if symbol_count < 2 {
            return Err(Error::CorruptHeader("symbol count below two"));
        }

        let normalized = NormalizedCounts::new(table_log, probabilities)?;
        Ok((
            Self {
                normalized,
                symbol_count,
            },
            pos,
        ))
    }
}

#[inline]
fn next_byte(input: &[u8], pos: &mut usize) -> Result<u8> {
    let b = *input
        .get(*pos)
        .ok_or(Error::CorruptHeader("truncated header"))?;
    *pos += 1;
    Ok(b)
}
