//! LZW encoder (compression).

use stash_core::error::{Result, StashError};

use crate::dictionary::LzwDictionary;

/// LZW encoder for compression.
#[derive(Debug, Default)]
pub struct LzwEncoder {
    /// Dictionary for string lookup.
    dict: LzwDictionary,
}

impl LzwEncoder {
    /// Create a new LZW encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dictionary entries after the last `encode` call.
    pub fn dictionary_len(&self) -> usize {
        self.dict.len()
    }

    /// Produce the code sequence for `input`.
    ///
    /// The running match is extended while `match + byte` is known. When it
    /// is not, the match's code is emitted and `match + byte` is registered
    /// (until the table is full, after which it stays frozen).
    pub fn encode_codes(&mut self, input: &[u8]) -> Vec<u16> {
        self.dict.reset();
        let mut codes = Vec::new();

        let Some((&first, rest)) = input.split_first() else {
            return codes;
        };
        let mut current = u16::from(first);

        for &byte in rest {
            match self.dict.find_extension(current, byte) {
                Some(code) => current = code,
                None => {
                    codes.push(current);
                    self.dict.add_extension(current, byte);
                    current = u16::from(byte);
                }
            }
        }
        codes.push(current);

        codes
    }

    /// Encode data with LZW compression.
    ///
    /// The output is a big-endian `u32` code count followed by that many
    /// big-endian `u16` codes. Empty input produces empty output.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            self.dict.reset();
            return Ok(Vec::new());
        }

        let codes = self.encode_codes(input);
        let count = u32::try_from(codes.len())
            .map_err(|_| StashError::input_too_large(codes.len() as u64, u64::from(u32::MAX)))?;

        let mut output = Vec::with_capacity(4 + codes.len() * 2);
        output.extend_from_slice(&count.to_be_bytes());
        for code in codes {
            output.extend_from_slice(&code.to_be_bytes());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_codes_ababab() {
        let mut encoder = LzwEncoder::new();
        // A B AB ABA -> 65, 66, 256, 258
        assert_eq!(encoder.encode_codes(b"ABABABA"), vec![65, 66, 256, 258]);
        assert_eq!(encoder.dictionary_len(), 259);
    }

    #[test]
    fn test_encode_layout() {
        let mut encoder = LzwEncoder::new();
        let output = encoder.encode(b"AB").unwrap();
        assert_eq!(output, vec![0, 0, 0, 2, 0, 65, 0, 66]);
    }

    #[test]
    fn test_encoder_resets_between_calls() {
        let mut encoder = LzwEncoder::new();
        let first = encoder.encode(b"TOBEORNOTTOBEORTOBEORNOT").unwrap();
        let second = encoder.encode(b"TOBEORNOTTOBEORTOBEORNOT").unwrap();
        assert_eq!(first, second);
    }
}
