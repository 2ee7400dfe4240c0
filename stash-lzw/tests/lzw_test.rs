//! LZW integration tests.

use stash_core::StashError;
use stash_lzw::{LzwDecoder, LzwEncoder, MAX_DICT_SIZE, compress, decompress};

fn pseudo_random(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

#[test]
fn test_lzw_empty_input() {
    assert!(compress(b"").unwrap().is_empty());
    assert!(decompress(b"").unwrap().is_empty());
}

#[test]
fn test_lzw_single_byte() {
    let compressed = compress(b"A").unwrap();
    assert_eq!(compressed, vec![0, 0, 0, 1, 0, 65]);
    assert_eq!(decompress(&compressed).unwrap(), b"A");
}

#[test]
fn test_lzw_abababa() {
    let compressed = compress(b"ABABABA").unwrap();
    assert_eq!(decompress(&compressed).unwrap(), b"ABABABA");
}

#[test]
fn test_lzw_300_identical_bytes() {
    let original = vec![b'z'; 300];
    let compressed = compress(&original).unwrap();
    assert!(compressed.len() < original.len() / 4);
    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lzw_dictionary_capped() {
    let original = pseudo_random(64 * 1024);
    let mut encoder = LzwEncoder::new();
    let compressed = encoder.encode(&original).unwrap();
    assert_eq!(encoder.dictionary_len(), MAX_DICT_SIZE);

    let codes = encoder.encode_codes(&original);
    assert!(codes.iter().all(|&code| (code as usize) < MAX_DICT_SIZE));

    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lzw_frozen_dictionary_still_matches() {
    // Fill the table with noise, then feed a long repeat.
    let mut original = pseudo_random(40 * 1024);
    original.extend(b"abcabcabcabc".repeat(200));
    let compressed = compress(&original).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lzw_text_like() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    let compressed = compress(&original).unwrap();
    assert!(compressed.len() < original.len());
    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lzw_corrupt_code_rejected() {
    // count = 2, codes 65 then 4000 (not yet assignable)
    let stream = [0, 0, 0, 2, 0, 65, 0x0F, 0xA0];
    let mut decoder = LzwDecoder::new();
    assert!(matches!(
        decoder.decode(&stream),
        Err(StashError::InvalidLzwCode { code: 4000, .. })
    ));
}
