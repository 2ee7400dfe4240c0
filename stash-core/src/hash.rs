//! Content hashing.
//!
//! SHA-256 is the canonical content hash: it keys deduplication and is
//! re-checked on every restored file. MD5 is offered for non-integrity uses
//! (quick fingerprints in listings).

use md5::Md5;
use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest rendered as lowercase hex.
pub const SHA256_HEX_LEN: usize = 64;

/// SHA-256 of `data` as a 64-character lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// MD5 of `data` as a 32-character lowercase hex string.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Check `data` against an expected SHA-256 hex digest.
///
/// The comparison ignores ASCII case in `expected`.
pub fn verify_sha256(data: &[u8], expected: &str) -> bool {
    sha256_hex(data).eq_ignore_ascii_case(expected)
}

/// Check `data` against an expected MD5 hex digest.
pub fn verify_md5(data: &[u8], expected: &str) -> bool {
    md5_hex(data).eq_ignore_ascii_case(expected)
}

/// Compare two buffers, visiting every byte when the lengths agree.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
