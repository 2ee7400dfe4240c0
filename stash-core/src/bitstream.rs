//! Bit-level I/O for the Stash codecs.
//!
//! This module provides `BitWriter` and `BitReader`, the only components in
//! the workspace that pack individual bits into bytes. Huffman, LZ77 and RLE
//! all encode through them.
//!
//! # Bit Ordering
//!
//! Bits are packed MSB-first: the first bit written lands in the most
//! significant bit of the first byte. Multi-bit values are written high bit
//! first, so a 32-bit value written at a byte boundary reads back as a
//! big-endian word.
//!
//! # End of Stream
//!
//! Reads never fail on exhausted input. `read_bit` returns `None` once the
//! source is empty, and `read_bits(n)` returns `None` when fewer than `n`
//! bits remain (a partial value is never returned).
//!
//! # Example
//!
//! ```
//! use stash_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b1100, 4).unwrap();
//! let output = writer.into_vec();
//! assert_eq!(output, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&output);
//! assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
//! assert_eq!(reader.read_bits(4).unwrap(), Some(0b1100));
//! ```

use crate::error::{Result, StashError};

/// Largest bit count accepted by `write_bits` / `read_bits`.
pub const MAX_BITS: u8 = 32;

/// An in-memory, MSB-first bit writer.
///
/// Complete bytes are appended to the output as soon as they fill. Call
/// `flush()` (or `into_vec()`) to pad the final partial byte with zeros.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Completed output bytes.
    output: Vec<u8>,
    /// Pending bits, right-aligned.
    buffer: u64,
    /// Number of pending bits in `buffer` (always < 8 between calls).
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far (excluding padding).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Append bits without validating `count`.
    #[inline]
    fn push_bits(&mut self, value: u32, count: u8) {
        if count == 0 {
            return;
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count) - 1
        };

        self.buffer = (self.buffer << count) | u64::from(value & mask);
        self.bits_in_buffer += count;
        self.total_bits_written += u64::from(count);

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
        self.buffer &= (1u64 << self.bits_in_buffer) - 1;
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.push_bits(u32::from(bit), 1);
    }

    /// Write the low `count` bits of `value`, high bit first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBitCount` if `count` exceeds 32.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count > MAX_BITS {
            return Err(StashError::invalid_bit_count(count));
        }
        self.push_bits(value, count);
        Ok(())
    }

    /// Write a full byte (equivalent to `write_bits(value, 8)`).
    #[inline]
    pub fn write_byte(&mut self, value: u8) {
        self.push_bits(u32::from(value), 8);
    }

    /// Pad the pending partial byte with zero bits and emit it.
    pub fn flush(&mut self) {
        if self.bits_in_buffer > 0 {
            let padding = 8 - self.bits_in_buffer;
            let byte = (self.buffer << padding) as u8;
            self.output.push(byte);
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
    }

    /// Flush and return the written bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.flush();
        self.output
    }
}

/// An MSB-first bit reader over a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Index of the byte holding the next bit.
    byte_pos: usize,
    /// Bits already consumed from `data[byte_pos]` (0-7).
    bit_pos: u8,
    /// Total bits read.
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
            total_bits_read: 0,
        }
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of unread bits left in the source.
    pub fn remaining_bits(&self) -> u64 {
        let remaining_bytes = self.data.len().saturating_sub(self.byte_pos) as u64;
        (remaining_bytes * 8).saturating_sub(u64::from(self.bit_pos))
    }

    /// Check whether every bit of the source has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.byte_pos >= self.data.len()
    }

    /// Read a single bit, or `None` at end of stream.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.byte_pos)?;
        let bit = (byte >> (7 - self.bit_pos)) & 1;

        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        self.total_bits_read += 1;

        Some(bit == 1)
    }

    /// Read `count` bits without validating `count`.
    fn pull_bits(&mut self, count: u8) -> Option<u32> {
        if self.remaining_bits() < u64::from(count) {
            // Partial values are never returned; the stream is spent.
            self.total_bits_read += self.remaining_bits();
            self.byte_pos = self.data.len();
            self.bit_pos = 0;
            return None;
        }

        let mut value = 0u64;
        for _ in 0..count {
            let bit = self.read_bit()?;
            value = (value << 1) | u64::from(bit);
        }
        Some(value as u32)
    }

    /// Read `count` bits, high bit first.
    ///
    /// Returns `Ok(None)` if fewer than `count` bits remain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBitCount` if `count` exceeds 32.
    pub fn read_bits(&mut self, count: u8) -> Result<Option<u32>> {
        if count > MAX_BITS {
            return Err(StashError::invalid_bit_count(count));
        }
        Ok(self.pull_bits(count))
    }

    /// Read a full byte, or `None` if fewer than 8 bits remain.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        self.pull_bits(8).map(|v| v as u8)
    }
}
