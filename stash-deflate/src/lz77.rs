//! LZ77 sliding-window compression.
//!
//! For each position the encoder searches every earlier position in the
//! window for the longest run equal to the upcoming bytes, and emits either a
//! literal or an `(offset, length)` back-reference. Matching is greedy.
//!
//! # Stream Format
//!
//! ```text
//! u32                     original length
//! repeated tokens:
//!   0 + u8                literal
//!   1 + u12 offset + u5   back-reference (offset 1-4095, length 3-18)
//! zero padding to the next byte
//! ```
//!
//! All fields are written MSB-first through the shared [`BitWriter`].

use stash_core::bitstream::{BitReader, BitWriter};
use stash_core::error::{Result, StashError};
use stash_core::traits::Codec;

/// Sliding window size.
pub const WINDOW_SIZE: usize = 4096;

/// Largest back-reference distance the 12-bit offset field can carry.
pub const MAX_OFFSET: usize = WINDOW_SIZE - 1;

/// Lookahead horizon (maximum match length).
pub const LOOKAHEAD: usize = 18;

/// Minimum match length worth encoding as a back-reference.
pub const MIN_MATCH: usize = 3;

const OFFSET_BITS: u8 = 12;
const LENGTH_BITS: u8 = 5;

/// A token produced by LZ77 compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz77Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously seen data.
    Match {
        /// Distance back from the current position (1-4095).
        offset: u16,
        /// Number of bytes to copy (3-18).
        length: u16,
    },
}

impl Lz77Token {
    /// Number of input bytes this token covers.
    pub fn covered_len(&self) -> usize {
        match *self {
            Lz77Token::Literal(_) => 1,
            Lz77Token::Match { length, .. } => length as usize,
        }
    }
}

/// Find the longest match for `data[pos..]` in the preceding window.
///
/// Returns `(offset, length)`; the earliest candidate wins ties.
fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let max_len = LOOKAHEAD.min(data.len() - pos);
    let window_start = pos.saturating_sub(MAX_OFFSET);

    let mut best_offset = 0;
    let mut best_len = 0;

    for candidate in window_start..pos {
        let mut len = 0;
        // Matches may run into the lookahead (overlapping copy).
        while len < max_len && data[candidate + len] == data[pos + len] {
            len += 1;
        }
        if len > best_len {
            best_len = len;
            best_offset = pos - candidate;
            if len == max_len {
                break;
            }
        }
    }

    (best_offset, best_len)
}

/// Split `input` into greedy LZ77 tokens.
pub fn tokenize(input: &[u8]) -> Vec<Lz77Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let (offset, length) = longest_match(input, pos);
        if length >= MIN_MATCH {
            tokens.push(Lz77Token::Match {
                offset: offset as u16,
                length: length as u16,
            });
            pos += length;
        } else {
            tokens.push(Lz77Token::Literal(input[pos]));
            pos += 1;
        }
    }

    tokens
}

/// LZ77-compress `input`.
///
/// # Errors
///
/// Returns `InputTooLarge` if `input` is longer than `u32::MAX` bytes.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let length = u32::try_from(input.len())
        .map_err(|_| StashError::input_too_large(input.len() as u64, u64::from(u32::MAX)))?;

    let mut writer = BitWriter::with_capacity(input.len() + 4);
    writer.write_bits(length, 32)?;

    for token in tokenize(input) {
        match token {
            Lz77Token::Literal(byte) => {
                writer.write_bit(false);
                writer.write_byte(byte);
            }
            Lz77Token::Match { offset, length } => {
                writer.write_bit(true);
                writer.write_bits(u32::from(offset), OFFSET_BITS)?;
                writer.write_bits(u32::from(length), LENGTH_BITS)?;
            }
        }
    }

    Ok(writer.into_vec())
}

/// LZ77-decompress `input`.
///
/// Back-references with a zero offset or zero length are skipped without
/// producing output. A stream that ends early yields the bytes decoded so
/// far, and a final match that overshoots the declared length is truncated.
///
/// # Errors
///
/// Returns `UnexpectedEof` if the length word is missing and `InvalidOffset`
/// for a back-reference reaching before the start of the output.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = BitReader::new(input);
    let length = reader
        .read_bits(32)?
        .ok_or_else(|| StashError::unexpected_eof("LZ77 original length"))?
        as usize;

    let mut output: Vec<u8> = Vec::with_capacity(length.min(input.len() * 8));

    while output.len() < length {
        let Some(is_match) = reader.read_bit() else {
            break;
        };

        if is_match {
            let (Some(offset), Some(count)) =
                (reader.read_bits(OFFSET_BITS)?, reader.read_bits(LENGTH_BITS)?)
            else {
                break;
            };
            let (offset, count) = (offset as usize, count as usize);

            if offset == 0 || count == 0 {
                continue;
            }
            if offset > output.len() {
                return Err(StashError::invalid_offset(offset, output.len()));
            }

            let count = count.min(length - output.len());
            let start = output.len() - offset;
            // Byte-at-a-time so overlapping references repeat their pattern.
            for i in 0..count {
                let byte = output[start + i];
                output.push(byte);
            }
        } else {
            let Some(byte) = reader.read_byte() else {
                break;
            };
            output.push(byte);
        }
    }

    Ok(output)
}

/// The LZ77 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz77;

impl Codec for Lz77 {
    fn name(&self) -> &'static str {
        "LZ77"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        decompress(input)
    }
}
