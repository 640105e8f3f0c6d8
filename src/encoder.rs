//! FSE block encoder.

use crate::bits::{BitWriter, CONTAINER_BITS};
use crate::config::FseConfig;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::histogram::count_symbols;
use crate::normalize::{normalize_counts, optimal_table_log};
use crate::tans::CompressionTable;

/// FSE encoder.
///
/// Holds only its configuration; every call builds and drops its own tables.
#[derive(Debug, Clone, Default)]
pub struct FseEncoder {
    config: FseConfig,
}

impl FseEncoder {
    /// Create an encoder, rejecting an invalid configuration.
    pub fn new(config: FseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this encoder was built with.
    pub fn config(&self) -> &FseConfig {
        &self.config
    }

    /// Compress `input` into a self-describing block.
    ///
    /// # Errors
    /// - `DegenerateInput` for inputs shorter than two bytes.
    /// - `InvalidSymbol` if a byte exceeds the configured maximum.
    /// - `NormalizationFailed` if the table-log ceiling leaves fewer slots
    ///   than there are distinct symbols.
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.len() < 2 {
            return Err(Error::DegenerateInput(input.len()));
        }

        let histogram = count_symbols(input, self.config.max_symbol_value)?;
        let table_log = optimal_table_log(&self.config, input.len(), histogram.distinct());
        let normalized = normalize_counts(&histogram, table_log)?;
        log::debug!(
            "compressing {} bytes: {} symbols, max symbol {}, table log {}",
            input.len(),
            histogram.distinct(),
            histogram.max_symbol(),
            table_log
        );

        let header = Header {
            normalized,
            symbol_count: input.len(),
        };
        let mut out = Vec::with_capacity(input.len() / 2 + 64);
        header.write(&mut out)?;
        let header_len = out.len();

        let table = CompressionTable::new(&header.normalized);
        encode_symbols(input, &table, &mut out);

        log::debug!(
            "compressed {} bytes into {} ({} header)",
            input.len(),
            out.len(),
            header_len
        );
        Ok(out)
    }
}

/// Encode `input` backward with two interleaved states and append the
/// bitstream to `out`.
///
/// The last symbols seed the states. Remaining symbols alternate between
/// `state2` and `state1`, flushed once per quartet when four worst-case
/// codes fit the container, once per pair otherwise. The final states and a
/// `1` end mark close the stream.
pub(crate) fn encode_symbols(input: &[u8], table: &CompressionTable, out: &mut Vec<u8>) {
    debug_assert!(input.len() >= 2);
    let table_log = table.table_log();
    let mut writer = BitWriter::new(out);
    let mut position = input.len();

    let (mut state1, mut state2) = if input.len() & 1 == 1 {
        position -= 1;
        let mut state1 = table.initial_state(input[position]);
        position -= 1;
        let state2 = table.initial_state(input[position]);
        position -= 1;
        table.encode_symbol(&mut state1, input[position], &mut writer);
        writer.flush();
        (state1, state2)
    } else {
        position -= 1;
        let state2 = table.initial_state(input[position]);
        position -= 1;
        let state1 = table.initial_state(input[position]);
        (state1, state2)
    };

    // `position` is even from here on.
    let quartets = CONTAINER_BITS > table_log * 4 + 7;
    if quartets && position & 2 != 0 {
        position -= 1;
        table.encode_symbol(&mut state2, input[position], &mut writer);
        position -= 1;
        table.encode_symbol(&mut state1, input[position], &mut writer);
        writer.flush();
    }

    while position > 0 {
        position -= 1;
        table.encode_symbol(&mut state2, input[position], &mut writer);
        position -= 1;
        table.encode_symbol(&mut state1, input[position], &mut writer);
        if quartets {
            position -= 1;
            table.encode_symbol(&mut state2, input[position], &mut writer);
            position -= 1;
            table.encode_symbol(&mut state1, input[position], &mut writer);
        }
        writer.flush();
    }

    writer.add_bits(state2, table_log);
    writer.add_bits(state1, table_log);
    writer.add_bits(1, 1);
    writer.finish();
}
