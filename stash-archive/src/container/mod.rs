//! The Stash container format.
//!
//! A container holds the ordered metadata table and one blob per unique
//! content hash. Everything is little-endian and length-prefixed:
//!
//! ```text
//! header   : magic, version u16, flags u16, record_count u32,
//!            blob_count u32, metadata_len u64, metadata_crc32 u32
//! metadata : record_count records (see `encode_record`)
//! blobs    : blob_count × { str hash, u64 length, bytes }
//! ```
//!
//! `str` is a `u32` byte length followed by UTF-8. The metadata section is
//! covered by a CRC-32; blob payloads are not, because every restored file
//! is checked against its SHA-256 instead.

pub mod header;

use std::collections::BTreeMap;
use std::io::{Read, Write};

use stash_core::crc::Crc32;
use stash_core::error::{Result, StashError};

use crate::classify::FileType;
use crate::metadata::{Algorithm, Metadata};

pub use header::{ContainerHeader, FORMAT_VERSION, HEADER_SIZE, MAGIC};
use header::{FieldReader, put_str, read_exact_or_eof, read_vec};

/// In-memory form of an archive file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    /// Metadata records in input order.
    pub metadata: Vec<Metadata>,
    /// Blob store keyed by content hash.
    pub blobs: BTreeMap<String, Vec<u8>>,
}

fn encode_record(out: &mut Vec<u8>, record: &Metadata) -> Result<()> {
    put_str(out, &record.relative_path)?;
    put_str(out, &record.original_name)?;
    out.extend_from_slice(&record.original_size.to_le_bytes());
    out.extend_from_slice(&record.compressed_size.to_le_bytes());
    put_str(out, record.algorithm.as_str())?;
    put_str(out, record.file_type.label())?;
    put_str(out, &record.hash)?;
    out.push(u8::from(record.is_duplicate));
    put_str(out, &record.duplicate_of)?;
    out.extend_from_slice(&record.timestamp.to_le_bytes());
    Ok(())
}

fn decode_record(fields: &mut FieldReader<'_>) -> Result<Metadata> {
    let relative_path = fields.str()?;
    let original_name = fields.str()?;
    let original_size = fields.u64()?;
    let compressed_size = fields.u64()?;
    let algorithm: Algorithm = fields.str()?.parse()?;
    let label = fields.str()?;
    let file_type = FileType::from_label(&label)
        .ok_or_else(|| StashError::invalid_header(format!("unknown file type label {label:?}")))?;
    let hash = fields.str()?;
    let is_duplicate = match fields.u8()? {
        0 => false,
        1 => true,
        other => {
            return Err(StashError::invalid_header(format!(
                "duplicate flag {other} for {relative_path}"
            )));
        }
    };
    let duplicate_of = fields.str()?;
    let timestamp = fields.i64()?;

    if is_duplicate && (algorithm != Algorithm::Duplicate || compressed_size != 0) {
        return Err(StashError::invalid_header(format!(
            "duplicate record {relative_path} carries {algorithm} data"
        )));
    }
    if !is_duplicate && algorithm == Algorithm::Duplicate {
        return Err(StashError::invalid_header(format!(
            "record {relative_path} is tagged DUPLICATE but owns its data"
        )));
    }

    Ok(Metadata {
        relative_path,
        original_name,
        original_size,
        compressed_size,
        algorithm,
        file_type,
        hash,
        is_duplicate,
        duplicate_of,
        timestamp,
    })
}

fn count_field(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        StashError::invalid_header(format!("{len} {what} exceed the container limit"))
    })
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the metadata table into its section bytes.
    fn encode_metadata(&self) -> Result<Vec<u8>> {
        let mut section = Vec::new();
        for record in &self.metadata {
            encode_record(&mut section, record)?;
        }
        Ok(section)
    }

    /// Write the container. Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let section = self.encode_metadata()?;
        let header = ContainerHeader {
            version: FORMAT_VERSION,
            flags: 0,
            record_count: count_field(self.metadata.len(), "records")?,
            blob_count: count_field(self.blobs.len(), "blobs")?,
            metadata_len: section.len() as u64,
            metadata_crc32: Crc32::compute(&section),
        };

        header.write(writer)?;
        writer.write_all(&section)?;
        let mut written = (HEADER_SIZE + section.len()) as u64;

        let mut prefix = Vec::new();
        for (hash, blob) in &self.blobs {
            prefix.clear();
            put_str(&mut prefix, hash)?;
            prefix.extend_from_slice(&(blob.len() as u64).to_le_bytes());
            writer.write_all(&prefix)?;
            writer.write_all(blob)?;
            written += (prefix.len() + blob.len()) as u64;
        }

        Ok(written)
    }

    /// Serialize into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Read only the header and metadata table.
    pub fn read_metadata<R: Read>(reader: &mut R) -> Result<(ContainerHeader, Vec<Metadata>)> {
        let header = ContainerHeader::read(reader)?;
        let section = read_vec(reader, header.metadata_len, "metadata section")?;

        let computed = Crc32::compute(&section);
        if computed != header.metadata_crc32 {
            return Err(StashError::checksum_mismatch(header.metadata_crc32, computed));
        }

        let mut fields = FieldReader::new(&section, "metadata record");
        let mut metadata = Vec::new();
        for _ in 0..header.record_count {
            metadata.push(decode_record(&mut fields)?);
        }
        if fields.remaining() != 0 {
            return Err(StashError::invalid_header(format!(
                "{} unread bytes after {} metadata records",
                fields.remaining(),
                header.record_count
            )));
        }

        Ok((header, metadata))
    }

    /// Read a whole container.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let (header, metadata) = Self::read_metadata(reader)?;

        let mut blobs = BTreeMap::new();
        for _ in 0..header.blob_count {
            let mut len_buf = [0u8; 4];
            read_exact_or_eof(reader, &mut len_buf, "blob id")?;
            let id = read_vec(reader, u64::from(u32::from_le_bytes(len_buf)), "blob id")?;
            let hash = String::from_utf8(id)
                .map_err(|_| StashError::invalid_header("blob id contains invalid UTF-8"))?;

            let mut size_buf = [0u8; 8];
            read_exact_or_eof(reader, &mut size_buf, "blob length")?;
            let data = read_vec(reader, u64::from_le_bytes(size_buf), "blob data")?;

            if blobs.insert(hash.clone(), data).is_some() {
                return Err(StashError::invalid_header(format!("blob {hash} stored twice")));
            }
        }

        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(StashError::invalid_header("trailing data after last blob"));
        }

        Ok(Self { metadata, blobs })
    }

    /// Parse a container from a byte slice.
    pub fn from_bytes(mut data: &[u8]) -> Result<Self> {
        Self::read_from(&mut data)
    }

    /// Check that every record's data can be resolved.
    ///
    /// Non-duplicate records need their own blob; duplicate records need a
    /// blob under their hash (written by the owning record).
    pub fn validate(&self) -> Result<()> {
        for record in &self.metadata {
            if !self.blobs.contains_key(&record.hash) {
                return Err(StashError::missing_blob(record.hash.clone()));
            }
        }
        Ok(())
    }

    /// Total bytes held in blobs.
    pub fn blob_bytes(&self) -> u64 {
        self.blobs.values().map(|blob| blob.len() as u64).sum()
    }
}
