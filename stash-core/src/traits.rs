//! The common codec interface.
//!
//! Every codec in the workspace works on whole in-memory buffers: one call
//! compresses or decompresses the full input and returns the full output.

use crate::error::Result;

/// A whole-buffer compressor/decompressor.
///
/// Implementations are stateless unit structs, so a `&dyn Codec` can be
/// shared freely and chosen at runtime by name.
///
/// # Contract
///
/// For every byte sequence `x`, `decompress(&compress(x)?)? == x`. Empty
/// input always produces empty output in both directions.
pub trait Codec {
    /// Short human-readable codec name (e.g. `"LZW"`).
    fn name(&self) -> &'static str;

    /// Compress `input` into a new buffer.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress `input` into a new buffer.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress(input)
    }
}

/// Pass-through codec used for content that is already compressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Store;

impl Codec for Store {
    fn name(&self) -> &'static str {
        "STORE"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_passthrough() {
        let codec = Store;
        let data = b"already compressed".to_vec();
        assert_eq!(codec.compress(&data).unwrap(), data);
        assert_eq!(codec.decompress(&data).unwrap(), data);
        assert_eq!(codec.name(), "STORE");
    }

    #[test]
    fn test_codec_through_reference() {
        fn run(codec: impl Codec, data: &[u8]) -> Vec<u8> {
            codec.decompress(&codec.compress(data).unwrap()).unwrap()
        }
        let dynamic: &dyn Codec = &Store;
        assert_eq!(run(dynamic, b"xyz"), b"xyz");
    }
}
