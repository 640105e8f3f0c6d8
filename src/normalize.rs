//! Table-log selection and count normalization.
//!
//! Raw counts are rescaled so that their sum is exactly `2^table_log`, the
//! number of states in the automaton. Symbols too rare to earn a full slot
//! by proportion are flagged with [`RARE`] and given exactly one.

use crate::config::{FseConfig, MAX_TABLE_LOG, MIN_TABLE_LOG};
use crate::error::{Error, Result};
use crate::histogram::Histogram;

/// Sentinel probability: present, with the minimum representable share.
pub const RARE: i32 = -1;

/// A probability distribution over `2^table_log` slots.
///
/// Entry `s` is `0` when symbol `s` is absent, [`RARE`] when it owns a
/// single low-probability slot, and otherwise its slot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCounts {
    table_log: u32,
    probabilities: Vec<i32>,
}

impl NormalizedCounts {
    /// Validate and wrap a distribution.
    ///
    /// The effective slot sum (counting [`RARE`] as one) must equal
    /// `2^table_log`, and the last entry must be present.
    pub fn new(table_log: u32, probabilities: Vec<i32>) -> Result<Self> {
        if !(MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&table_log) {
            return Err(Error::InvalidTableLog(table_log));
        }
        if probabilities.is_empty() || probabilities.len() > 256 {
            return Err(Error::CorruptHeader("alphabet size out of range"));
        }
        if probabilities.last() == Some(&0) {
            return Err(Error::CorruptHeader("max symbol is absent"));
        }
        let mut sum = 0u64;
        for &p in &probabilities {
            if p < RARE {
                return Err(Error::CorruptHeader("negative probability"));
            }
            sum += if p == RARE { 1 } else { p as u64 };
        }
        if sum != 1u64 << table_log {
            return Err(Error::CorruptHeader("probabilities do not fill the table"));
        }
        Ok(Self {
            table_log,
            probabilities,
        })
    }

    /// Exponent of the table size.
    pub fn table_log(&self) -> u32 {
        self.table_log
    }

    /// Number of states, `2^table_log`.
    pub fn table_size(&self) -> u32 {
        1 << self.table_log
    }

    /// Highest symbol of the distribution.
    pub fn max_symbol(&self) -> u8 {
        (self.probabilities.len() - 1) as u8
    }

    /// Raw probabilities, [`RARE`] included.
    pub fn probabilities(&self) -> &[i32] {
        &self.probabilities
    }

    /// Slots owned by `symbol`, with [`RARE`] counted as one.
    pub fn slots(&self, symbol: usize) -> u32 {
        match self.probabilities[symbol] {
            RARE => 1,
            p => p as u32,
        }
    }

    /// Present symbols and their probabilities, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, i32)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .filter(|(_, &p)| p != 0)
            .map(|(s, &p)| (s as u8, p))
    }
}

/// Pick the table log for an input of `input_len` bytes holding
/// `distinct_symbols` different values.
///
/// Starts from the configured ceiling and shrinks it when the input is too
/// short to use that many states, then clamps into the configured range.
/// The result is grown again (up to the ceiling) if the table would hold
/// fewer slots than there are symbols.
pub fn optimal_table_log(config: &FseConfig, input_len: usize, distinct_symbols: usize) -> u32 {
    let max_bits_src = if input_len > 1 {
        usize::BITS - 1 - (input_len - 1).leading_zeros()
    } else {
        log::warn!("input of {} bytes is too short for entropy coding", input_len);
        0
    };
    let mut table_log = config.max_table_log;
    if max_bits_src < table_log {
        table_log = max_bits_src;
    }
    table_log = table_log.max(config.min_table_log).min(config.max_table_log);

    while (1usize << table_log) < distinct_symbols && table_log < config.max_table_log {
        table_log += 1;
    }
    table_log
}

/// Rescale `histogram` so that its probabilities sum to `2^table_log`.
pub fn normalize_counts(histogram: &Histogram, table_log: u32) -> Result<NormalizedCounts> {
    if !(MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&table_log) {
        return Err(Error::InvalidTableLog(table_log));
    }
    let total = histogram.total() as u64;
    if total == 0 {
        return Err(Error::DegenerateInput(0));
    }
    let table_size = 1i64 << table_log;
    let distinct = histogram.distinct();
    if distinct as i64 > table_size {
        return Err(Error::NormalizationFailed {
            symbols: distinct,
            table_log,
        });
    }

    let scale = 62 - table_log;
    let step = (1u64 << 62) / total;
    let low_threshold = total >> table_log;

    let counts = histogram.counts();
    let mut probabilities = vec![0i32; counts.len()];
    let mut remaining = table_size;
    let mut largest = 0usize;
    let mut largest_probability = 0i32;

    for (symbol, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if count as u64 <= low_threshold {
            probabilities[symbol] = RARE;
            remaining -= 1;
        } else {
            let probability = ((count as u64 * step) >> scale).max(1) as i32;
            if probability > largest_probability {
                largest_probability = probability;
                largest = symbol;
            }
            probabilities[symbol] = probability;
            remaining -= probability as i64;
        }
    }

    if remaining > 0 {
        if largest_probability == 0 {
            return Err(Error::NormalizationFailed {
                symbols: distinct,
                table_log,
            });
        }
        probabilities[largest] += remaining as i32;
    }
    // Rare symbols were rounded up to a whole slot; repay the overshoot from
    // whichever symbol currently holds the most slots.
    while remaining < 0 {
        let (richest, &slots) = probabilities
            .iter()
            .enumerate()
            .max_by_key(|&(s, &p)| (p, std::cmp::Reverse(s)))
            .ok_or(Error::NormalizationFailed {
                symbols: distinct,
                table_log,
            })?;
        if slots <= 1 {
            return Err(Error::NormalizationFailed {
                symbols: distinct,
                table_log,
            });
        }
        probabilities[richest] -= 1;
        remaining += 1;
    }

    log::trace!(
        "normalized {} symbols to table log {}: {:?}",
        distinct,
        table_log,
        probabilities
    );

    NormalizedCounts::new(table_log, probabilities)
}
