//! # Stash Archive
//!
//! Content-addressed archives built on the Stash codecs.
//!
//! An archive is an ordered metadata table plus one blob per unique SHA-256.
//! Files with identical content are stored once; every later copy becomes a
//! `DUPLICATE` record pointing at the first path that supplied the bytes.
//!
//! - **Classification**: file names map to a [`FileType`] which picks the
//!   codec (text → LZW, raw images → RLE, everything else stored)
//! - **Deduplication**: [`DedupTable`] tracks first owners per hash
//! - **Container**: [`Container`] is the versioned on-disk format, with a
//!   CRC-32 over the metadata section
//! - **Verification**: every restored file is re-hashed and flagged in
//!   [`RestoredFile::verified`]
//!
//! ## Example
//!
//! ```rust
//! use stash_archive::{ArchiveManager, FileEntry};
//!
//! let entries = vec![
//!     FileEntry::from_path("notes.txt", b"to be or not to be".to_vec()),
//!     FileEntry::from_path("copy.txt", b"to be or not to be".to_vec()),
//! ];
//!
//! let mut manager = ArchiveManager::new();
//! let mut archive = Vec::new();
//! let created = manager.create_archive_to_writer(&entries, &mut archive).unwrap();
//! assert_eq!(created.duplicate_count, 1);
//!
//! let restored = manager.extract_from_reader(&mut archive.as_slice()).unwrap();
//! assert!(restored.all_verified());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod container;
pub mod dedup;
pub mod manager;
pub mod metadata;

// Re-exports
pub use classify::{Classifier, FileType};
pub use config::{ArchiveOptions, MethodOverride};
pub use container::{Container, ContainerHeader};
pub use dedup::{DedupStats, DedupTable};
pub use manager::{ArchiveManager, codec_for, read_metadata};
pub use metadata::{
    Algorithm, CompressionResult, DecompressionResult, FileEntry, Metadata, RestoredFile,
};
