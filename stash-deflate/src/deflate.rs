//! DEFLATE-style composite: LZ77 followed by Huffman.
//!
//! The Huffman stage treats the LZ77 output as an opaque byte sequence with
//! its own frequency statistics. Decompression runs the stages in reverse.

use stash_core::error::Result;
use stash_core::traits::Codec;

use crate::{huffman, lz77};

/// Compress `input` with LZ77 and then Huffman.
///
/// # Example
///
/// ```
/// use stash_deflate::deflate::{compress, decompress};
///
/// let data = b"to be or not to be, that is the question";
/// let packed = compress(data).unwrap();
/// assert_eq!(decompress(&packed).unwrap(), data);
/// ```
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = lz77::compress(input)?;
    huffman::compress(&tokens)
}

/// Reverse [`compress`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = huffman::decompress(input)?;
    lz77::decompress(&tokens)
}

/// The composite LZ77 + Huffman codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflate;

impl Codec for Deflate {
    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        decompress(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_compose() {
        let data = b"abcabcabcabcabcabc-xyz-xyz-xyz".repeat(4);
        let staged = huffman::compress(&lz77::compress(&data).unwrap()).unwrap();
        assert_eq!(compress(&data).unwrap(), staged);
    }

    #[test]
    fn test_repetitive_input_shrinks() {
        let data = b"All work and no play makes Jack a dull boy. ".repeat(500);
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len() / 4);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_empty() {
        assert!(compress(&[]).unwrap().is_empty());
        assert!(decompress(&[]).unwrap().is_empty());
    }
}
