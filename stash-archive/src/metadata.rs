//! Per-file records and the values passed in and out of the archive manager.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use stash_core::error::StashError;

use crate::classify::FileType;

/// Compression algorithm tag recorded for each archived file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// LZW dictionary coding.
    Lzw,
    /// Run-length coding.
    Rle,
    /// Stored without compression.
    Store,
    /// Content lives under another record with the same hash.
    Duplicate,
}

impl Algorithm {
    /// The tag written into metadata records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lzw => "LZW",
            Self::Rle => "RLE",
            Self::Store => "STORE",
            Self::Duplicate => "DUPLICATE",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = StashError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "LZW" => Ok(Self::Lzw),
            "RLE" => Ok(Self::Rle),
            "STORE" => Ok(Self::Store),
            "DUPLICATE" => Ok(Self::Duplicate),
            other => Err(StashError::unknown_algorithm(other)),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Percentage of bytes saved, `(1 - compressed / original) * 100`.
fn ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

/// A file handed to the archive manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Archive-relative path, unique within one archive.
    pub relative_path: String,
    /// Base file name (drives classification).
    pub file_name: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl FileEntry {
    /// Create an entry.
    pub fn new(
        relative_path: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Create an entry whose file name is the last `/` component of `path`.
    pub fn from_path(relative_path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let relative_path = relative_path.into();
        let file_name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or(relative_path.as_str())
            .to_string();
        Self {
            relative_path,
            file_name,
            data: data.into(),
        }
    }
}

/// One metadata record: one per archived entry, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Archive-relative path.
    pub relative_path: String,
    /// Original file name.
    pub original_name: String,
    /// Uncompressed size in bytes.
    pub original_size: u64,
    /// Stored blob size in bytes (0 for duplicates).
    pub compressed_size: u64,
    /// Codec used for the blob.
    pub algorithm: Algorithm,
    /// Classification of the file.
    pub file_type: FileType,
    /// Lowercase hex SHA-256 of the original bytes.
    pub hash: String,
    /// Whether the content is owned by an earlier record.
    pub is_duplicate: bool,
    /// Path of the owning record, or empty.
    pub duplicate_of: String,
    /// Creation time of the record, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Metadata {
    /// Start a record for a file, stamped with the current time.
    pub fn new(
        relative_path: impl Into<String>,
        original_name: impl Into<String>,
        original_size: u64,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            original_name: original_name.into(),
            original_size,
            compressed_size: 0,
            algorithm: Algorithm::Store,
            file_type: FileType::Unknown,
            hash: String::new(),
            is_duplicate: false,
            duplicate_of: String::new(),
            timestamp: now_millis(),
        }
    }

    /// Percentage of bytes saved for this record.
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.original_size, self.compressed_size)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes -> {} bytes, {}, {:.1}% saved)",
            self.relative_path,
            self.original_size,
            self.compressed_size,
            self.algorithm,
            self.compression_ratio()
        )
    }
}

/// A file reconstructed from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredFile {
    /// Archive-relative path.
    pub path: String,
    /// Decompressed contents.
    pub data: Vec<u8>,
    /// Length of `data`.
    pub size: u64,
    /// Hash recorded in the archive.
    pub hash: String,
    /// Whether the SHA-256 of `data` equals `hash`.
    pub verified: bool,
}

/// Statistics returned from archive creation.
#[derive(Debug, Clone, Default)]
pub struct CompressionResult {
    /// Records in input order.
    pub metadata: Vec<Metadata>,
    /// Sum of all input sizes.
    pub original_size: u64,
    /// Sum of stored blob sizes.
    pub compressed_size: u64,
    /// Number of duplicate records.
    pub duplicate_count: usize,
}

impl CompressionResult {
    /// Percentage of bytes saved across the whole archive.
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.original_size, self.compressed_size)
    }
}

/// Files returned from archive extraction.
#[derive(Debug, Clone, Default)]
pub struct DecompressionResult {
    /// Restored files in metadata order.
    pub restored_files: Vec<RestoredFile>,
    /// The records the files were restored from, in the same order.
    pub metadata: Vec<Metadata>,
}

impl DecompressionResult {
    /// Number of files whose hash matched.
    pub fn verified_count(&self) -> usize {
        self.restored_files.iter().filter(|file| file.verified).count()
    }

    /// Check whether every restored file verified.
    pub fn all_verified(&self) -> bool {
        self.restored_files.iter().all(|file| file.verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_tags() {
        for algorithm in [
            Algorithm::Lzw,
            Algorithm::Rle,
            Algorithm::Store,
            Algorithm::Duplicate,
        ] {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!(matches!(
            "lzw".parse::<Algorithm>(),
            Err(StashError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_compression_ratio() {
        let mut record = Metadata::new("a.txt", "a.txt", 200);
        record.compressed_size = 50;
        assert!((record.compression_ratio() - 75.0).abs() < 1e-9);

        let empty = Metadata::new("e", "e", 0);
        assert_eq!(empty.compression_ratio(), 0.0);
    }

    #[test]
    fn test_entry_from_path() {
        let entry = FileEntry::from_path("docs/guide/intro.md", b"# hi".to_vec());
        assert_eq!(entry.file_name, "intro.md");
        let flat = FileEntry::from_path("top.txt", Vec::new());
        assert_eq!(flat.file_name, "top.txt");
    }

    #[test]
    fn test_timestamp_is_recent() {
        let record = Metadata::new("a", "a", 1);
        // After 2020-01-01.
        assert!(record.timestamp > 1_577_836_800_000);
    }
}
