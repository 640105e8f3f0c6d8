//! Bit container shared by the encoder and decoder.
//!
//! The writer appends fields at increasing bit positions and drains whole
//! bytes from the low end, so the stream is a little-endian integer. The
//! reader consumes that integer from its most significant end: it loads
//! bytes from the tail of the buffer and hands back fields in the reverse
//! order they were written.

use crate::error::{Error, Result};

/// Width of the accumulator in bits.
pub const CONTAINER_BITS: u32 = u64::BITS;

/// Position of the highest set bit, `0` for `0`.
#[inline]
pub fn highest_set_bit(value: u32) -> u32 {
    if value == 0 {
        0
    } else {
        31 - value.leading_zeros()
    }
}

/// Forward bit packer appending to a byte buffer.
pub struct BitWriter<'a> {
    out: &'a mut Vec<u8>,
    container: u64,
    bit_pos: u32,
}

impl<'a> BitWriter<'a> {
    /// Start packing bits at the end of `out`.
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            container: 0,
            bit_pos: 0,
        }
    }

    /// Append the low `nb_bits` bits of `value`.
    ///
    /// The caller flushes often enough that the container never holds more
    /// than [`CONTAINER_BITS`] live bits.
    #[inline]
    pub fn add_bits(&mut self, value: u32, nb_bits: u32) {
        debug_assert!(nb_bits <= 16);
        debug_assert!(self.bit_pos + nb_bits <= CONTAINER_BITS);
        let mask = (1u64 << nb_bits) - 1;
        self.container |= (value as u64 & mask) << self.bit_pos;
        self.bit_pos += nb_bits;
    }

    /// Move every complete byte into the output.
    #[inline]
    pub fn flush(&mut self) {
        while self.bit_pos >= 8 {
            self.out.push(self.container as u8);
            self.container >>= 8;
            self.bit_pos -= 8;
        }
    }

    /// Flush, including a trailing partial byte.
    pub fn finish(mut self) {
        self.flush();
        if self.bit_pos > 0 {
            self.out.push(self.container as u8);
        }
    }
}

/// Backward bit reader over a stream produced by [`BitWriter`].
pub struct BitReader<'a> {
    stream: &'a [u8],
    /// Bytes `stream[..remaining]` have not been loaded yet.
    remaining: usize,
    container: u64,
    /// Live bits, always the low end of `container`.
    bits: u32,
}

impl<'a> BitReader<'a> {
    /// Prime the reader and skip past the end-marker bit.
    pub fn new(stream: &'a [u8]) -> Result<Self> {
        let last = match stream.last() {
            Some(&b) if b != 0 => b,
            _ => return Err(Error::CorruptStream("missing end mark")),
        };
        let mut reader = Self {
            stream,
            remaining: stream.len(),
            container: 0,
            bits: 0,
        };
        reader.reload();
        reader.bits -= last.leading_zeros() + 1;
        Ok(reader)
    }

    /// Pull bytes from the tail until the container is nearly full or the
    /// stream is exhausted.
    #[inline]
    pub fn reload(&mut self) {
        while self.bits <= CONTAINER_BITS - 8 && self.remaining > 0 {
            self.remaining -= 1;
            self.container = (self.container << 8) | self.stream[self.remaining] as u64;
            self.bits += 8;
        }
    }

    /// Take the next `nb_bits` bits, most recently written first.
    #[inline]
    pub fn read_bits(&mut self, nb_bits: u32) -> Result<u32> {
        if nb_bits == 0 {
            return Ok(0);
        }
        if self.bits < nb_bits {
            self.reload();
            if self.bits < nb_bits {
                return Err(Error::CorruptStream("read past start of stream"));
            }
        }
        self.bits -= nb_bits;
        Ok(((self.container >> self.bits) & ((1u64 << nb_bits) - 1)) as u32)
    }

    /// True once every bit below the end mark has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.bits == 0 && self.remaining == 0
    }
}
