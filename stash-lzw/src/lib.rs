//! # Stash LZW
//!
//! Dictionary-based LZW compression with fixed 16-bit codes.
//!
//! ## Format
//!
//! - **Seeded dictionary**: codes 0-255 are the single-byte strings
//! - **Capped growth**: at most 4096 entries; once full, the table is frozen
//!   and matching continues against it
//! - **Fixed-width codes**: a big-endian `u32` code count, then one
//!   big-endian `u16` per code
//!
//! Unlike the bit-packed codecs, LZW does not go through the bit writer: its
//! codes are whole 16-bit words.
//!
//! ## Example
//!
//! ```rust
//! use stash_lzw::{compress, decompress};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod decoder;
mod dictionary;
mod encoder;

pub use decoder::LzwDecoder;
pub use dictionary::{LzwDictionary, MAX_DICT_SIZE};
pub use encoder::LzwEncoder;

use stash_core::error::Result;
use stash_core::traits::Codec;

/// Compress data with LZW.
///
/// # Example
///
/// ```rust
/// use stash_lzw::compress;
///
/// let data = b"ABABABABABABABABABAB";
/// let compressed = compress(data).unwrap();
/// // 4-byte count plus 8 two-byte codes
/// assert_eq!(compressed.len(), 20);
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    LzwEncoder::new().encode(data)
}

/// Decompress LZW-compressed data.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    LzwDecoder::new().decode(data)
}

/// The LZW codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lzw;

impl Codec for Lzw {
    fn name(&self) -> &'static str {
        "LZW"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        decompress(input)
    }
}
