//! Raw single-buffer codec commands.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use stash_core::Codec;
use stash_deflate::{Deflate, Huffman, Lz77};
use stash_lzw::Lzw;
use stash_rle::Rle;

use crate::utils::{CliResult, format_size};

/// Codec selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecKind {
    /// Static Huffman coding
    Huffman,
    /// LZ77 sliding window
    Lz77,
    /// LZ77 followed by Huffman
    Deflate,
    /// LZW dictionary coding
    Lzw,
    /// Run-length coding
    Rle,
}

impl CodecKind {
    fn codec(self) -> &'static dyn Codec {
        match self {
            Self::Huffman => &Huffman,
            Self::Lz77 => &Lz77,
            Self::Deflate => &Deflate,
            Self::Lzw => &Lzw,
            Self::Rle => &Rle,
        }
    }
}

pub fn cmd_compress(input: &Path, output: &Path, kind: CodecKind, verbose: bool) -> CliResult {
    let codec = kind.codec();
    let data = fs::read(input)?;
    let packed = codec.compress(&data)?;
    fs::write(output, &packed)?;

    if verbose {
        println!(
            "{}: {} -> {} with {}",
            input.display(),
            format_size(data.len() as u64),
            format_size(packed.len() as u64),
            codec.name()
        );
    }
    Ok(())
}

pub fn cmd_decompress(input: &Path, output: &Path, kind: CodecKind, verbose: bool) -> CliResult {
    let codec = kind.codec();
    let data = fs::read(input)?;
    let unpacked = codec.decompress(&data)?;
    fs::write(output, &unpacked)?;

    if verbose {
        println!(
            "{}: {} -> {} with {}",
            input.display(),
            format_size(data.len() as u64),
            format_size(unpacked.len() as u64),
            codec.name()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_codec_restores_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let packed = dir.path().join("in.pack");
        let restored = dir.path().join("out.txt");
        let text = b"she sells sea shells by the sea shore ".repeat(30);
        fs::write(&input, &text).unwrap();

        for kind in CodecKind::value_variants() {
            cmd_compress(&input, &packed, *kind, false).unwrap();
            cmd_decompress(&packed, &restored, *kind, false).unwrap();
            assert_eq!(fs::read(&restored).unwrap(), text, "{kind:?}");
        }
    }
}
