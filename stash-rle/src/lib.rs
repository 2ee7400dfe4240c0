//! # Stash RLE
//!
//! Run-length encoding for raw, uncompressed image data (BMP, PPM and
//! friends) where neighbouring pixels repeat.
//!
//! Each run of identical bytes becomes a `(length, value)` pair, with runs
//! capped at 255 so the length fits one byte. Runs of length 0 are never
//! produced. Pairs are written through the shared bit writer.
//!
//! ## Example
//!
//! ```rust
//! use stash_rle::{compress, decompress};
//!
//! let encoded = compress(b"AAAAAAAAAA").unwrap();
//! assert_eq!(encoded, vec![10, b'A']);
//! assert_eq!(decompress(&encoded).unwrap(), b"AAAAAAAAAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

use stash_core::bitstream::{BitReader, BitWriter};
use stash_core::error::{Result, StashError};
use stash_core::traits::Codec;

/// Longest run a single pair can describe.
pub const MAX_RUN_LENGTH: usize = 255;

/// Split `data` into `(length, value)` runs of at most [`MAX_RUN_LENGTH`].
pub fn runs(data: &[u8]) -> Vec<(u8, u8)> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        let mut run_len = 1;

        // Count consecutive identical bytes
        while i + run_len < data.len() && data[i + run_len] == byte && run_len < MAX_RUN_LENGTH {
            run_len += 1;
        }

        result.push((run_len as u8, byte));
        i += run_len;
    }

    result
}

/// Encode data as `(length, value)` byte pairs.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = BitWriter::with_capacity(data.len() / 2 + 2);
    for (length, value) in runs(data) {
        writer.write_byte(length);
        writer.write_byte(value);
    }
    Ok(writer.into_vec())
}

/// Decode `(length, value)` byte pairs.
///
/// # Errors
///
/// Returns `IncompleteRleRun` when a length byte has no value byte after it.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = BitReader::new(data);
    let mut result = Vec::with_capacity(data.len() * 4);

    while let Some(length) = reader.read_byte() {
        let Some(value) = reader.read_byte() else {
            return Err(StashError::incomplete_rle_run(data.len() - 1));
        };
        result.resize(result.len() + length as usize, value);
    }

    Ok(result)
}

/// The run-length codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rle;

impl Codec for Rle {
    fn name(&self) -> &'static str {
        "RLE"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        decompress(input)
    }
}
