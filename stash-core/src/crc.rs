//! CRC-32 checksum for the container metadata section.
//!
//! The container stores a CRC-32 (ISO 3309, the ZIP/PNG polynomial) over the
//! serialized metadata records so that a damaged header is rejected before
//! any record is trusted. File contents are protected separately by SHA-256.

/// CRC-32 lookup table (polynomial 0xEDB88320, reflected).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Incremental CRC-32 calculator.
///
/// # Example
///
/// ```
/// use stash_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), Crc32::compute(b"Hello, World!"));
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Create a new CRC-32 calculator.
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Feed more bytes into the checksum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.state ^ u32::from(byte)) & 0xFF) as usize;
            self.state = CRC32_TABLE[index] ^ (self.state >> 8);
        }
    }

    /// Finalize and return the CRC value.
    pub fn finalize(self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }

    /// Compute CRC-32 for a slice in one call.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_values() {
        assert_eq!(Crc32::compute(b""), 0);
        assert_eq!(Crc32::compute(b"123456789"), 0xCBF4_3926);
        assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4A_C3D0);
    }

    #[test]
    fn test_crc32_incremental_matches_oneshot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut crc = Crc32::new();
        for chunk in data.chunks(5) {
            crc.update(chunk);
        }
        assert_eq!(crc.finalize(), Crc32::compute(data));
    }
}
