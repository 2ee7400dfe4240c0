//! LZW dictionary (code table) management.

use std::collections::HashMap;

/// Hard cap on dictionary entries, including the 256 seed codes.
pub const MAX_DICT_SIZE: usize = 4096;

/// Number of single-byte seed codes.
pub const SEED_CODES: usize = 256;

/// LZW dictionary shared by the encoder and decoder.
///
/// The code table maps each code to its byte string. For encoding, a reverse
/// map keyed by `(prefix_code, next_byte)` finds the code of a one-byte
/// extension without hashing whole strings.
#[derive(Debug)]
pub struct LzwDictionary {
    /// Code table: code -> byte sequence.
    table: Vec<Vec<u8>>,
    /// Reverse lookup: (prefix code, appended byte) -> code.
    extensions: HashMap<(u16, u8), u16>,
}

impl LzwDictionary {
    /// Create a dictionary seeded with the 256 single-byte strings.
    pub fn new() -> Self {
        let mut dict = Self {
            table: Vec::with_capacity(MAX_DICT_SIZE),
            extensions: HashMap::new(),
        };
        dict.reset();
        dict
    }

    /// Reset the dictionary to its seeded state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.extensions.clear();
        self.table.extend((0..SEED_CODES).map(|byte| vec![byte as u8]));
    }

    /// Number of entries, seed codes included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false: the seed codes are present from construction.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check if the dictionary has reached [`MAX_DICT_SIZE`].
    pub fn is_full(&self) -> bool {
        self.table.len() >= MAX_DICT_SIZE
    }

    /// The code that the next added entry will receive.
    pub fn next_code(&self) -> usize {
        self.table.len()
    }

    /// Get the byte sequence for a code.
    pub fn get(&self, code: u16) -> Option<&[u8]> {
        self.table.get(code as usize).map(Vec::as_slice)
    }

    /// Find the code for `prefix` followed by `byte` (for encoding).
    pub fn find_extension(&self, prefix: u16, byte: u8) -> Option<u16> {
        self.extensions.get(&(prefix, byte)).copied()
    }

    /// Register `prefix` followed by `byte` (for encoding).
    ///
    /// Returns the assigned code, or `None` once the table is full.
    pub fn add_extension(&mut self, prefix: u16, byte: u8) -> Option<u16> {
        if self.is_full() {
            return None;
        }
        let mut string = self.get(prefix)?.to_vec();
        string.push(byte);

        let code = self.table.len() as u16;
        self.table.push(string);
        self.extensions.insert((prefix, byte), code);
        Some(code)
    }

    /// Register a decoded string (for decoding).
    ///
    /// Returns the assigned code, or `None` once the table is full.
    pub fn add_string(&mut self, string: Vec<u8>) -> Option<u16> {
        if self.is_full() {
            return None;
        }
        let code = self.table.len() as u16;
        self.table.push(string);
        Some(code)
    }
}

impl Default for LzwDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded() {
        let dict = LzwDictionary::new();
        assert_eq!(dict.len(), 256);
        assert_eq!(dict.next_code(), 256);
        assert_eq!(dict.get(65), Some(&b"A"[..]));
        assert_eq!(dict.get(256), None);
    }

    #[test]
    fn test_extension_lookup() {
        let mut dict = LzwDictionary::new();
        assert_eq!(dict.find_extension(65, b'B'), None);
        assert_eq!(dict.add_extension(65, b'B'), Some(256));
        assert_eq!(dict.find_extension(65, b'B'), Some(256));
        assert_eq!(dict.get(256), Some(&b"AB"[..]));

        assert_eq!(dict.add_extension(256, b'A'), Some(257));
        assert_eq!(dict.get(257), Some(&b"ABA"[..]));
    }

    #[test]
    fn test_cap() {
        let mut dict = LzwDictionary::new();
        let mut added = 0;
        while dict.add_string(vec![0, 0]).is_some() {
            added += 1;
        }
        assert_eq!(added, MAX_DICT_SIZE - SEED_CODES);
        assert!(dict.is_full());
        assert_eq!(dict.add_extension(0, 1), None);

        dict.reset();
        assert_eq!(dict.len(), SEED_CODES);
    }
}
