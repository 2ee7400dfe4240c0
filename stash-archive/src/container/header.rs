//! Fixed-size container header and the field codecs used by the container.

use std::io::{self, Read, Write};

use stash_core::error::{Result, StashError};

/// Container signature: `\x89STS\r\n\x1a\n`.
pub const MAGIC: [u8; 8] = [0x89, b'S', b'T', b'S', 0x0D, 0x0A, 0x1A, 0x0A];

/// Current container format version.
pub const FORMAT_VERSION: u16 = 1;

/// Encoded header size in bytes.
pub const HEADER_SIZE: usize = 32;

/// Container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Format version.
    pub version: u16,
    /// Reserved flags (always 0).
    pub flags: u16,
    /// Number of metadata records.
    pub record_count: u32,
    /// Number of blobs.
    pub blob_count: u32,
    /// Byte length of the metadata section.
    pub metadata_len: u64,
    /// CRC-32 of the metadata section.
    pub metadata_crc32: u32,
}

impl ContainerHeader {
    /// Read and validate a header.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        read_exact_or_eof(reader, &mut buf, "container header")?;

        if buf[0..8] != MAGIC {
            return Err(StashError::invalid_magic(MAGIC.to_vec(), buf[0..8].to_vec()));
        }

        let version = u16::from_le_bytes([buf[8], buf[9]]);
        if version != FORMAT_VERSION {
            return Err(StashError::UnsupportedVersion(version));
        }

        let flags = u16::from_le_bytes([buf[10], buf[11]]);
        let record_count = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let blob_count = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);
        let metadata_len = u64::from_le_bytes([
            buf[20], buf[21], buf[22], buf[23], buf[24], buf[25], buf[26], buf[27],
        ]);
        let metadata_crc32 = u32::from_le_bytes([buf[28], buf[29], buf[30], buf[31]]);

        Ok(Self {
            version,
            flags,
            record_count,
            blob_count,
            metadata_len,
            metadata_crc32,
        })
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        // Signature
        writer.write_all(&MAGIC)?;
        // Version and flags
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        // Section counts
        writer.write_all(&self.record_count.to_le_bytes())?;
        writer.write_all(&self.blob_count.to_le_bytes())?;
        // Metadata section length and checksum
        writer.write_all(&self.metadata_len.to_le_bytes())?;
        writer.write_all(&self.metadata_crc32.to_le_bytes())?;
        Ok(())
    }
}

/// `read_exact`, reporting a short read as `UnexpectedEof { context }`.
pub(crate) fn read_exact_or_eof<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => StashError::unexpected_eof(context),
        _ => StashError::Io(err),
    })
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
pub(crate) fn read_vec<R: Read>(
    reader: &mut R,
    len: u64,
    context: &'static str,
) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut data)?;
    if (data.len() as u64) < len {
        return Err(StashError::unexpected_eof(context));
    }
    Ok(data)
}

/// Append a length-prefixed UTF-8 string.
pub(crate) fn put_str(out: &mut Vec<u8>, value: &str) -> Result<()> {
    let len = u32::try_from(value.len())
        .map_err(|_| StashError::input_too_large(value.len() as u64, u64::from(u32::MAX)))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Cursor over an in-memory section.
#[derive(Debug)]
pub(crate) struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    context: &'static str,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(data: &'a [u8], context: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            context,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(StashError::unexpected_eof(self.context));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub(crate) fn str(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| StashError::invalid_header(format!("{} contains invalid UTF-8", self.context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> ContainerHeader {
        ContainerHeader {
            version: FORMAT_VERSION,
            flags: 0,
            record_count: 3,
            blob_count: 2,
            metadata_len: 512,
            metadata_crc32: 0xDEAD_BEEF,
        }
    }

    #[test]
    fn test_header_layout() {
        let mut buf = Vec::new();
        sample().write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[..8], &MAGIC);
        assert_eq!(&buf[8..10], &[1, 0]);
        assert_eq!(ContainerHeader::read(&mut Cursor::new(buf)).unwrap(), sample());
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = Vec::new();
        sample().write(&mut buf).unwrap();
        buf[1] = b'Z';
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(buf)),
            Err(StashError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_future_version() {
        let mut buf = Vec::new();
        ContainerHeader {
            version: 7,
            ..sample()
        }
        .write(&mut buf)
        .unwrap();
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(buf)),
            Err(StashError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(MAGIC.to_vec())),
            Err(StashError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_field_reader() {
        let mut out = Vec::new();
        put_str(&mut out, "héllo").unwrap();
        out.extend_from_slice(&42u64.to_le_bytes());
        out.push(1);

        let mut fields = FieldReader::new(&out, "test record");
        assert_eq!(fields.str().unwrap(), "héllo");
        assert_eq!(fields.u64().unwrap(), 42);
        assert_eq!(fields.u8().unwrap(), 1);
        assert_eq!(fields.remaining(), 0);
        assert!(fields.u8().is_err());
    }
}
