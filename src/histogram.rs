//! Symbol frequency counting.

use crate::error::{Error, Result};

/// Inputs at least this long are counted in four interleaved stripes.
const STRIPED_THRESHOLD: usize = 1500;

/// Per-symbol occurrence counts over an active alphabet `0..=max_symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u32>,
    total: usize,
}

impl Histogram {
    /// Occurrence count per symbol, indexed by symbol value.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Highest symbol with a nonzero count (0 for an empty input).
    pub fn max_symbol(&self) -> u8 {
        (self.counts.len() - 1) as u8
    }

    /// Number of symbols counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Largest single count.
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Count every byte of `input`, rejecting bytes above `max_symbol_value`.
///
/// The returned alphabet is trimmed so that its last symbol is the highest
/// one that actually occurs.
pub fn count_symbols(input: &[u8], max_symbol_value: u8) -> Result<Histogram> {
    let mut counts = if input.len() < STRIPED_THRESHOLD {
        count_simple(input, max_symbol_value)?
    } else {
        count_striped(input, max_symbol_value)?
    };

    let active = counts.iter().rposition(|&c| c > 0).unwrap_or(0);
    counts.truncate(active + 1);

    Ok(Histogram {
        counts,
        total: input.len(),
    })
}

fn count_simple(input: &[u8], max_symbol_value: u8) -> Result<Vec<u32>> {
    let mut counts = vec![0u32; max_symbol_value as usize + 1];
    for &b in input {
        if b > max_symbol_value {
            return Err(Error::InvalidSymbol {
                symbol: b,
                max: max_symbol_value,
            });
        }
        counts[b as usize] += 1;
    }
    Ok(counts)
}

fn count_striped(input: &[u8], max_symbol_value: u8) -> Result<Vec<u32>> {
    let mut stripes = [[0u32; 256]; 4];

    let mut chunks = input.chunks_exact(4);
    for chunk in &mut chunks {
        stripes[0][chunk[0] as usize] += 1;
        stripes[1][chunk[1] as usize] += 1;
        stripes[2][chunk[2] as usize] += 1;
        stripes[3][chunk[3] as usize] += 1;
    }
    for &b in chunks.remainder() {
        stripes[0][b as usize] += 1;
    }

    let mut merged = [0u32; 256];
    for stripe in &stripes {
        for (total, &c) in merged.iter_mut().zip(stripe.iter()) {
            *total += c;
        }
    }

    if let Some(symbol) = (max_symbol_value as usize + 1..256).find(|&s| merged[s] > 0) {
        return Err(Error::InvalidSymbol {
            symbol: symbol as u8,
            max: max_symbol_value,
        });
    }

    Ok(merged[..=max_symbol_value as usize].to_vec())
}
