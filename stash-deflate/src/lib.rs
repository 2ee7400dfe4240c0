//! # Stash Deflate
//!
//! Pure Rust Huffman, LZ77 and DEFLATE-style composite codecs.
//!
//! ## Codecs
//!
//! - [`huffman`]: byte-frequency prefix coding; the frequency table travels
//!   in the stream header and the tree is rebuilt on decode
//! - [`lz77`]: greedy sliding-window matching (window 4096, lookahead 18,
//!   minimum match 3)
//! - [`deflate`]: LZ77 output fed through Huffman as opaque bytes
//!
//! All three work on whole in-memory buffers and share the MSB-first bit
//! writer from `stash-core`.
//!
//! ## Example
//!
//! ```rust
//! use stash_core::Codec;
//! use stash_deflate::{Deflate, Huffman, Lz77};
//!
//! let original = b"Hello, World! Hello, World!";
//! for codec in [&Huffman as &dyn Codec, &Lz77, &Deflate] {
//!     let compressed = codec.compress(original).unwrap();
//!     assert_eq!(codec.decompress(&compressed).unwrap(), original);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod huffman;
pub mod lz77;

// Re-exports
pub use deflate::{Deflate, compress, decompress};
pub use huffman::{CodeTable, Huffman, HuffmanTree};
pub use lz77::{Lz77, Lz77Token, tokenize};
