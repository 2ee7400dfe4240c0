//! Archive creation and extraction.
//!
//! The manager owns one [`DedupTable`] per session. Creating an archive runs
//! every entry through hash -> dedup -> classify -> compress and collects the
//! records and blobs into a [`Container`]. Extraction resolves each record's
//! blob, decompresses each unique hash once, and checks the result against
//! the recorded SHA-256.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use stash_core::error::{Result, StashError};
use stash_core::hash::verify_sha256;
use stash_core::traits::{Codec, Store};
use stash_lzw::Lzw;
use stash_rle::Rle;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::config::ArchiveOptions;
use crate::container::Container;
use crate::dedup::DedupTable;
use crate::metadata::{
    Algorithm, CompressionResult, DecompressionResult, FileEntry, Metadata, RestoredFile,
};

/// Codec that reads and writes blobs tagged with `algorithm`.
pub fn codec_for(algorithm: Algorithm) -> &'static dyn Codec {
    match algorithm {
        Algorithm::Lzw => &Lzw,
        Algorithm::Rle => &Rle,
        Algorithm::Store | Algorithm::Duplicate => &Store,
    }
}

/// Builds and unpacks archives.
#[derive(Debug, Default)]
pub struct ArchiveManager {
    dedup: DedupTable,
    classifier: Classifier,
    options: ArchiveOptions,
}

impl ArchiveManager {
    /// Create a manager with default options and the built-in classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the given options.
    pub fn with_options(options: ArchiveOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace the classifier.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Dedup table of the most recent create call.
    pub fn dedup(&self) -> &DedupTable {
        &self.dedup
    }

    /// Compress `entries` into an in-memory container.
    pub fn build_container(
        &mut self,
        entries: &[FileEntry],
    ) -> Result<(Container, CompressionResult)> {
        self.dedup.clear();

        let mut container = Container::new();
        let mut result = CompressionResult::default();

        for entry in entries {
            let hash = self.dedup.process_file(&entry.data, &entry.relative_path);
            let mut record = Metadata::new(
                entry.relative_path.as_str(),
                entry.file_name.as_str(),
                entry.data.len() as u64,
            );
            record.file_type = self.classifier.classify(&entry.file_name);
            result.original_size += record.original_size;

            let owner = self.dedup.original_path(&hash).unwrap_or_default();
            if owner != entry.relative_path {
                record.algorithm = Algorithm::Duplicate;
                record.is_duplicate = true;
                record.duplicate_of = owner.to_string();
                result.duplicate_count += 1;
            } else if !container.blobs.contains_key(&hash) {
                let algorithm = self.options.method.algorithm_for(record.file_type);
                let blob = codec_for(algorithm).compress(&entry.data)?;
                record.algorithm = algorithm;
                record.compressed_size = blob.len() as u64;
                result.compressed_size += record.compressed_size;
                container.blobs.insert(hash.clone(), blob);
            } else if let Some(first) = container.metadata.iter().find(|m| m.hash == hash) {
                // Same path listed twice with the same bytes: reuse the blob.
                record.algorithm = first.algorithm;
                record.compressed_size = first.compressed_size;
            }

            debug!(
                path = %record.relative_path,
                algorithm = %record.algorithm,
                original = record.original_size,
                compressed = record.compressed_size,
                "archived entry"
            );
            record.hash = hash;
            container.metadata.push(record);
        }

        result.metadata = container.metadata.clone();
        info!(
            entries = entries.len(),
            blobs = container.blobs.len(),
            duplicates = result.duplicate_count,
            original = result.original_size,
            compressed = result.compressed_size,
            "built archive"
        );
        Ok((container, result))
    }

    /// Compress `entries` and write the container to `writer`.
    pub fn create_archive_to_writer<W: Write>(
        &mut self,
        entries: &[FileEntry],
        writer: &mut W,
    ) -> Result<CompressionResult> {
        let (container, result) = self.build_container(entries)?;
        container.write_to(writer)?;
        writer.flush()?;
        Ok(result)
    }

    /// Compress `entries` into a container file at `path`.
    ///
    /// The container is written to a temporary file next to `path` and only
    /// renamed into place once complete, so a failure leaves nothing at `path`.
    pub fn create_archive(
        &mut self,
        entries: &[FileEntry],
        path: impl AsRef<Path>,
    ) -> Result<CompressionResult> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        let result = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.create_archive_to_writer(entries, &mut writer)?
        };
        temp.persist(path).map_err(|err| StashError::Io(err.error))?;

        info!(path = %path.display(), "wrote archive");
        Ok(result)
    }

    /// Restore every record of `container`.
    pub fn extract_container(&self, container: &Container) -> Result<DecompressionResult> {
        container.validate()?;

        let mut owner_algorithms: HashMap<&str, Algorithm> = HashMap::new();
        for record in container.metadata.iter().filter(|m| !m.is_duplicate) {
            owner_algorithms
                .entry(record.hash.as_str())
                .or_insert(record.algorithm);
        }

        let mut cache: HashMap<&str, Vec<u8>> = HashMap::new();
        let mut restored_files = Vec::with_capacity(container.metadata.len());

        for record in &container.metadata {
            let hash = record.hash.as_str();
            if !cache.contains_key(hash) {
                let blob = container
                    .blobs
                    .get(hash)
                    .ok_or_else(|| StashError::missing_blob(hash))?;
                let algorithm = if record.is_duplicate {
                    owner_algorithms.get(hash).copied().unwrap_or_else(|| {
                        warn!(
                            path = %record.relative_path,
                            "no owner record for duplicate, reading as STORE"
                        );
                        Algorithm::Store
                    })
                } else {
                    record.algorithm
                };
                let data = codec_for(algorithm).decompress(blob)?;
                cache.insert(hash, data);
            }

            let data = cache.get(hash).cloned().unwrap_or_default();
            let verified = verify_sha256(&data, hash);
            if !verified {
                warn!(path = %record.relative_path, "content hash mismatch");
            }
            debug!(path = %record.relative_path, size = data.len(), verified, "restored entry");

            restored_files.push(RestoredFile {
                path: record.relative_path.clone(),
                size: data.len() as u64,
                data,
                hash: record.hash.clone(),
                verified,
            });
        }

        let result = DecompressionResult {
            restored_files,
            metadata: container.metadata.clone(),
        };
        info!(
            files = result.restored_files.len(),
            verified = result.verified_count(),
            "extracted archive"
        );
        Ok(result)
    }

    /// Read a container from `reader` and restore it.
    pub fn extract_from_reader<R: Read>(&self, reader: &mut R) -> Result<DecompressionResult> {
        let container = Container::read_from(reader)?;
        self.extract_container(&container)
    }

    /// Read the container file at `path` and restore it.
    pub fn extract_archive(&self, path: impl AsRef<Path>) -> Result<DecompressionResult> {
        let mut reader = BufReader::new(File::open(path)?);
        self.extract_from_reader(&mut reader)
    }
}

/// Read the metadata table of the container at `path` without touching blobs.
pub fn read_metadata(path: impl AsRef<Path>) -> Result<Vec<Metadata>> {
    let mut reader = BufReader::new(File::open(path)?);
    let (_, metadata) = Container::read_metadata(&mut reader)?;
    Ok(metadata)
}
