//! # Stash Core
//!
//! Core components shared by every Stash crate.
//!
//! - [`bitstream`]: MSB-first bit writer/reader used by Huffman, LZ77 and RLE
//! - [`hash`]: SHA-256 / MD5 content hashing and verification
//! - [`crc`]: CRC-32 for the container metadata section
//! - [`traits`]: the whole-buffer [`Codec`] trait
//! - [`error`]: the shared error type
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Front end: stash CLI                                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Container: classification, dedup, metadata, manager     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec: Huffman, LZ77, DEFLATE-style, LZW, RLE           │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate): BitWriter/BitReader, hashing, CRC    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stash_core::bitstream::{BitReader, BitWriter};
//! use stash_core::hash::sha256_hex;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0xABC, 12).unwrap();
//! let bytes = writer.into_vec();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(12).unwrap(), Some(0xABC));
//!
//! assert_eq!(sha256_hex(b"abc").len(), 64);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod hash;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc32;
pub use error::{Result, StashError};
pub use hash::{bytes_equal, md5_hex, sha256_hex, verify_md5, verify_sha256};
pub use traits::{Codec, Store};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{Result, StashError};
    pub use crate::hash::sha256_hex;
    pub use crate::traits::Codec;
}
