//! RLE integration tests.

use stash_core::{Codec, StashError};
use stash_rle::{MAX_RUN_LENGTH, Rle, compress, decompress};

/// A tiny binary PPM with flat colour bands, the kind of input RLE targets.
fn banded_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = format!("P6\n{width} {height}\n255\n").into_bytes();
    for row in 0..height {
        let colour: [u8; 3] = if row < height / 2 { [0, 0, 0] } else { [255, 255, 255] };
        for _ in 0..width {
            data.extend_from_slice(&colour);
        }
    }
    data
}

/// Deterministic noise with short accidental runs.
fn pseudo_random(len: usize) -> Vec<u8> {
    let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

#[test]
fn test_single_byte() {
    assert_eq!(compress(b"x").unwrap(), vec![1, b'x']);
    assert_eq!(decompress(&[1, b'x']).unwrap(), b"x");
}

#[test]
fn test_300_identical_bytes() {
    let data = vec![7u8; 300];
    let encoded = compress(&data).unwrap();
    assert_eq!(encoded, vec![255, 7, 45, 7]);
    assert_eq!(decompress(&encoded).unwrap(), data);
}

#[test]
fn test_no_zero_length_runs() {
    let data: Vec<u8> = (0..2000u32).map(|i| (i / 37) as u8).collect();
    let encoded = compress(&data).unwrap();
    for pair in encoded.chunks_exact(2) {
        assert!(pair[0] >= 1 && pair[0] as usize <= MAX_RUN_LENGTH);
    }
    assert_eq!(decompress(&encoded).unwrap(), data);
}

#[test]
fn test_banded_image_shrinks() {
    let image = banded_image(64, 64);
    let codec = Rle;
    let encoded = codec.compress(&image).unwrap();
    assert!(encoded.len() < image.len() / 10);
    assert_eq!(codec.decompress(&encoded).unwrap(), image);
}

#[test]
fn test_alternating_bytes_double() {
    let data: Vec<u8> = (0..100).map(|i| if i % 2 == 0 { 0xAA } else { 0x55 }).collect();
    let encoded = compress(&data).unwrap();
    assert_eq!(encoded.len(), 200);
    assert_eq!(decompress(&encoded).unwrap(), data);
}

#[test]
fn test_dangling_length_byte() {
    let mut encoded = compress(b"aaabbb").unwrap();
    encoded.push(9);
    assert!(matches!(
        decompress(&encoded),
        Err(StashError::IncompleteRleRun { offset: 4 })
    ));
}

#[test]
fn test_pseudo_random_roundtrip() {
    let data = pseudo_random(10_000);
    let encoded = compress(&data).unwrap();
    assert!(encoded.len() >= data.len());
    assert!(encoded.len() <= data.len() * 2);
    assert_eq!(decompress(&encoded).unwrap(), data);
    assert_eq!(Rle.decompress(&Rle.compress(&data).unwrap()).unwrap(), data);
}
