//! Error types for Stash operations.
//!
//! A single error type is shared by every codec and by the archive layer, so
//! a failure anywhere in a create/extract call surfaces to the caller as one
//! `StashError` for the whole operation.

use std::io;
use thiserror::Error;

/// The main error type for Stash operations.
#[derive(Debug, Error)]
pub enum StashError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A bit-width outside 0-32 was requested from the bit codec.
    #[error("Invalid bit count: {count} (must be 0-32)")]
    InvalidBitCount {
        /// The requested bit count.
        count: u8,
    },

    /// LZW code that is neither in the dictionary nor the next assignable id.
    #[error("Invalid LZW code: {code} (next assignable code is {next_code})")]
    InvalidLzwCode {
        /// The offending code.
        code: u16,
        /// The id the dictionary would have assigned next.
        next_code: usize,
    },

    /// RLE length byte without a paired value byte.
    #[error("Incomplete RLE run at byte offset {offset}")]
    IncompleteRleRun {
        /// Byte offset of the dangling length byte.
        offset: usize,
    },

    /// LZ77 back-reference reaching before the start of the decoded output.
    #[error("Invalid LZ77 offset: {offset} exceeds decoded length {available}")]
    InvalidOffset {
        /// The back-reference distance.
        offset: usize,
        /// Number of bytes decoded so far.
        available: usize,
    },

    /// A metadata record references a hash with no blob in the container.
    #[error("No blob stored for hash {hash}")]
    MissingBlob {
        /// The content hash that could not be resolved.
        hash: String,
    },

    /// A metadata record names an algorithm tag the decoder does not know.
    #[error("Unknown compression algorithm: {tag}")]
    UnknownAlgorithm {
        /// The unrecognised tag.
        tag: String,
    },

    /// Invalid magic number in container header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Container written by an unsupported format version.
    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u16),

    /// Malformed container or codec header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Checksum mismatch over the metadata section.
    #[error("Checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum stored in the container.
        expected: u32,
        /// Checksum computed from the data read.
        computed: u32,
    },

    /// Stream ended inside a fixed-size header.
    #[error("Unexpected end of data while reading {context}")]
    UnexpectedEof {
        /// What was being read when the data ran out.
        context: &'static str,
    },

    /// A length does not fit the fixed-width field that records it.
    #[error("Input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge {
        /// Actual size.
        size: u64,
        /// Largest representable size.
        limit: u64,
    },

    /// Path traversal attempt (e.g. "../" in an archived path).
    #[error("Path traversal detected in entry: {path}")]
    PathTraversal {
        /// The suspicious path.
        path: String,
    },
}

/// Result type alias for Stash operations.
pub type Result<T> = std::result::Result<T, StashError>;

impl StashError {
    /// Create an invalid bit count error.
    pub fn invalid_bit_count(count: u8) -> Self {
        Self::InvalidBitCount { count }
    }

    /// Create an invalid LZW code error.
    pub fn invalid_lzw_code(code: u16, next_code: usize) -> Self {
        Self::InvalidLzwCode { code, next_code }
    }

    /// Create an incomplete RLE run error.
    pub fn incomplete_rle_run(offset: usize) -> Self {
        Self::IncompleteRleRun { offset }
    }

    /// Create an invalid LZ77 offset error.
    pub fn invalid_offset(offset: usize, available: usize) -> Self {
        Self::InvalidOffset { offset, available }
    }

    /// Create a missing blob error.
    pub fn missing_blob(hash: impl Into<String>) -> Self {
        Self::MissingBlob { hash: hash.into() }
    }

    /// Create an unknown algorithm error.
    pub fn unknown_algorithm(tag: impl Into<String>) -> Self {
        Self::UnknownAlgorithm { tag: tag.into() }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(context: &'static str) -> Self {
        Self::UnexpectedEof { context }
    }

    /// Create an input too large error.
    pub fn input_too_large(size: u64, limit: u64) -> Self {
        Self::InputTooLarge { size, limit }
    }

    /// Create a path traversal error.
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }
}
