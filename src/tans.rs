//! Table Asymmetric Numeral Systems (tANS) tables.
//!
//! Both directions are derived from one spread of the symbols over the
//! `2^table_log` slots. The encoder's state table lists, per symbol and in
//! slot order, the states `table_size + slot` that the symbol can move to;
//! the decoder's table is indexed by `slot` and inverts that transition.

use crate::bits::{highest_set_bit, BitReader, BitWriter};
use crate::error::Result;
use crate::normalize::{NormalizedCounts, RARE};

/// Walk step for the spread. It is odd, so it is coprime with any table
/// size and the walk visits every slot once per cycle.
#[inline]
fn spread_step(table_size: usize) -> usize {
    (table_size >> 1) + (table_size >> 3) + 3
}

/// Assign a symbol to every slot of the table.
///
/// Rare symbols take the high end, filled downward in ascending symbol
/// order. Every other symbol is dealt out along the spread walk, which skips
/// the slots already claimed by rare symbols.
pub fn spread_symbols(normalized: &NormalizedCounts) -> Vec<u8> {
    let table_size = normalized.table_size() as usize;
    let mask = table_size - 1;
    let step = spread_step(table_size);
    let mut table = vec![0u8; table_size];

    let mut high = table_size;
    for (symbol, _) in normalized.present().filter(|&(_, p)| p == RARE) {
        high -= 1;
        table[high] = symbol;
    }

    let mut position = 0;
    for (symbol, occurrences) in normalized.present().filter(|&(_, p)| p > 0) {
        for _ in 0..occurrences {
            table[position] = symbol;
            position = (position + step) & mask;
            while position >= high {
                position = (position + step) & mask;
            }
        }
    }
    debug_assert_eq!(position, 0, "spread did not close its cycle");

    table
}

/// Per-symbol constants that turn an encoder state into an output bit count
/// and a next-state index without any table walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolTransform {
    /// `(max_bits_out << 16) - min_state_plus`. Adding a state and shifting
    /// right by 16 yields the number of bits to emit for that state.
    pub state_based_bits_out: u32,
    /// Bits emitted from states at or above `min_state_plus`; one fewer
    /// below it.
    pub max_bits_out: u32,
    /// `slots << max_bits_out`.
    pub min_state_plus: u32,
    /// Added to `state >> bits` to index this symbol's run of the state table.
    pub next_state_offset: i32,
}

/// Encode-side automaton for one distribution.
#[derive(Clone, Debug)]
pub struct CompressionTable {
    table_log: u32,
    max_symbol: u8,
    state_table: Vec<u16>,
    transforms: Vec<SymbolTransform>,
}

impl CompressionTable {
    /// Build the state table and symbol transforms for `normalized`.
    pub fn new(normalized: &NormalizedCounts) -> Self {
        let table_log = normalized.table_log();
        let table_size = normalized.table_size();
        let symbols = normalized.probabilities().len();
        let spread = spread_symbols(normalized);

        let mut cumulative = vec![0u32; symbols + 1];
        for s in 0..symbols {
            cumulative[s + 1] = cumulative[s] + normalized.slots(s);
        }

        let mut rank = cumulative[..symbols].to_vec();
        let mut state_table = vec![0u16; table_size as usize];
        for (position, &symbol) in spread.iter().enumerate() {
            let r = &mut rank[symbol as usize];
            state_table[*r as usize] = (table_size + position as u32) as u16;
            *r += 1;
        }

        let transforms = (0..symbols)
            .map(|s| {
                let slots = normalized.slots(s);
                if slots == 0 {
                    return SymbolTransform::default();
                }
                // A single slot gives `max_bits_out == table_log`, since
                // `highest_set_bit(0)` is 0.
                let max_bits_out = table_log - highest_set_bit(slots - 1);
                let min_state_plus = slots << max_bits_out;
                SymbolTransform {
                    state_based_bits_out: (max_bits_out << 16) - min_state_plus,
                    max_bits_out,
                    min_state_plus,
                    next_state_offset: cumulative[s] as i32 - slots as i32,
                }
            })
            .collect();

        log::trace!("compression state table (log {}): {:?}", table_log, state_table);

        Self {
            table_log,
            max_symbol: normalized.max_symbol(),
            state_table,
            transforms,
        }
    }

    /// Exponent of the table size.
    pub fn table_log(&self) -> u32 {
        self.table_log
    }

    /// Highest symbol the table can encode.
    pub fn max_symbol(&self) -> u8 {
        self.max_symbol
    }

    /// Reachable states grouped by symbol, each in `[table_size, 2*table_size)`.
    pub fn state_table(&self) -> &[u16] {
        &self.state_table
    }

    /// Transform constants, indexed by symbol.
    pub fn transforms(&self) -> &[SymbolTransform] {
        &self.transforms
    }

    #[inline]
    fn next_state(&self, sub_state: u32, transform: &SymbolTransform) -> u32 {
        self.state_table[(sub_state as i32 + transform.next_state_offset) as usize] as u32
    }

    /// Seed a state with `symbol` without emitting bits.
    ///
    /// The synthetic source state is `min_state_plus`, the smallest state
    /// that emits `max_bits_out` bits, which lands on the symbol's first
    /// state.
    pub fn initial_state(&self, symbol: u8) -> u32 {
        let transform = &self.transforms[symbol as usize];
        self.next_state(transform.min_state_plus >> transform.max_bits_out, transform)
    }

    /// Encode `symbol`: emit the low bits of `state`, then move to the next
    /// state.
    #[inline]
    pub fn encode_symbol(&self, state: &mut u32, symbol: u8, writer: &mut BitWriter<'_>) {
        let transform = &self.transforms[symbol as usize];
        let nb_bits = (*state + transform.state_based_bits_out) >> 16;
        writer.add_bits(*state, nb_bits);
        *state = self.next_state(*state >> nb_bits, transform);
    }
}

/// A decode-side state: the symbol it yields and how to find the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Added to the bits read to form the next state.
    pub baseline: u16,
    /// Number of bits to read from the stream.
    pub nb_bits: u8,
    /// The decoded symbol.
    pub symbol: u8,
}

/// Decode-side automaton for one distribution.
#[derive(Clone, Debug)]
pub struct DecompressionTable {
    table_log: u32,
    entries: Vec<DecodeEntry>,
}

impl DecompressionTable {
    /// Build the per-state decode entries for `normalized`.
    pub fn new(normalized: &NormalizedCounts) -> Self {
        let table_log = normalized.table_log();
        let table_size = normalized.table_size();
        let spread = spread_symbols(normalized);

        let mut next: Vec<u32> = (0..normalized.probabilities().len())
            .map(|s| normalized.slots(s))
            .collect();

        let entries: Vec<DecodeEntry> = spread
            .iter()
            .map(|&symbol| {
                let n = &mut next[symbol as usize];
                let nb_bits = table_log - highest_set_bit(*n);
                let baseline = (*n << nb_bits) - table_size;
                *n += 1;
                DecodeEntry {
                    baseline: baseline as u16,
                    nb_bits: nb_bits as u8,
                    symbol,
                }
            })
            .collect();

        log::trace!("decompression table (log {}): {:?}", table_log, entries);

        Self { table_log, entries }
    }

    /// Exponent of the table size.
    pub fn table_log(&self) -> u32 {
        self.table_log
    }

    /// Decode entries, indexed by state.
    pub fn entries(&self) -> &[DecodeEntry] {
        &self.entries
    }

    /// Symbol held by `state`, without advancing.
    #[inline]
    pub fn symbol(&self, state: u32) -> u8 {
        self.entries[state as usize].symbol
    }

    /// Yield the symbol of `state` and advance it with bits from `reader`.
    #[inline]
    pub fn decode_symbol(&self, state: &mut u32, reader: &mut BitReader<'_>) -> Result<u8> {
        let entry = self.entries[*state as usize];
        let low_bits = reader.read_bits(entry.nb_bits as u32)?;
        *state = entry.baseline as u32 + low_bits;
        Ok(entry.symbol)
    }
}
