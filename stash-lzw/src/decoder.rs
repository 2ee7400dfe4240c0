//! LZW decoder (decompression).
//!
//! The decoder rebuilds the encoder's dictionary in lockstep: after every
//! code but the first it registers `previous + entry[0]`, so entry ids match
//! the encoder's one call later.

use stash_core::error::{Result, StashError};

use crate::dictionary::{LzwDictionary, SEED_CODES};

/// LZW decoder for decompression.
#[derive(Debug, Default)]
pub struct LzwDecoder {
    /// Dictionary for code lookup.
    dict: LzwDictionary,
}

impl LzwDecoder {
    /// Create a new LZW decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a code sequence back into bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLzwCode` for a code that is neither in the dictionary
    /// nor the next code to be assigned, or a first code above 255.
    pub fn decode_codes(&mut self, codes: &[u16]) -> Result<Vec<u8>> {
        self.dict.reset();
        let mut output = Vec::with_capacity(codes.len() * 2);

        let Some((&first, rest)) = codes.split_first() else {
            return Ok(output);
        };
        if first as usize >= SEED_CODES {
            return Err(StashError::invalid_lzw_code(first, self.dict.next_code()));
        }
        let mut previous = vec![first as u8];
        output.extend_from_slice(&previous);

        for &code in rest {
            let entry = match self.dict.get(code) {
                Some(known) => known.to_vec(),
                None if code as usize == self.dict.next_code() => {
                    // Code being defined by this very step: prev + prev[0].
                    let mut synthesized = previous.clone();
                    synthesized.push(previous[0]);
                    synthesized
                }
                None => {
                    return Err(StashError::invalid_lzw_code(code, self.dict.next_code()));
                }
            };

            output.extend_from_slice(&entry);

            let mut added = previous;
            added.push(entry[0]);
            self.dict.add_string(added);

            previous = entry;
        }

        Ok(output)
    }

    /// Decode LZW-compressed data.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` if the count word or any declared code is
    /// missing, and `InvalidLzwCode` for an undecodable code.
    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let (count_bytes, body) = input
            .split_first_chunk::<4>()
            .ok_or_else(|| StashError::unexpected_eof("LZW code count"))?;
        let count = u32::from_be_bytes(*count_bytes) as usize;

        let needed = count
            .checked_mul(2)
            .ok_or_else(|| StashError::invalid_header("LZW code count overflows"))?;
        if body.len() < needed {
            return Err(StashError::unexpected_eof("LZW codes"));
        }

        let codes: Vec<u16> = body[..needed]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        self.decode_codes(&codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ababab() {
        let mut decoder = LzwDecoder::new();
        assert_eq!(
            decoder.decode_codes(&[65, 66, 256, 258]).unwrap(),
            b"ABABABA"
        );
    }

    #[test]
    fn test_kwkwk_case() {
        // "AAAA": A then code 256 before it is defined.
        let mut decoder = LzwDecoder::new();
        assert_eq!(decoder.decode_codes(&[65, 256, 65]).unwrap(), b"AAAA");
    }

    #[test]
    fn test_invalid_code() {
        let mut decoder = LzwDecoder::new();
        assert!(matches!(
            decoder.decode_codes(&[65, 300]),
            Err(StashError::InvalidLzwCode {
                code: 300,
                next_code: 256
            })
        ));
    }

    #[test]
    fn test_first_code_must_be_literal() {
        let mut decoder = LzwDecoder::new();
        assert!(decoder.decode_codes(&[256]).is_err());
    }

    #[test]
    fn test_truncated_streams() {
        let mut decoder = LzwDecoder::new();
        assert!(matches!(
            decoder.decode(&[0, 0, 1]),
            Err(StashError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            decoder.decode(&[0, 0, 0, 2, 0, 65]),
            Err(StashError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut decoder = LzwDecoder::new();
        assert!(decoder.decode(&[0, 0, 0, 0]).unwrap().is_empty());
    }
}
