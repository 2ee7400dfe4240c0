//! Huffman coding over byte frequencies.
//!
//! The encoder tallies byte frequencies, builds a prefix tree bottom-up with a
//! min-heap, and writes the frequency table ahead of the coded body. The tree
//! itself is never serialized: the decoder rebuilds it from the same table.
//!
//! # Stream Format
//!
//! All fields go through the MSB-first [`BitWriter`]:
//!
//! ```text
//! u16              number of distinct symbols (N)
//! N × (u8, u32)    symbol byte and its frequency, ascending byte order
//! u32              original length
//! ...              code bits for each input byte, zero-padded
//! ```
//!
//! Empty input encodes to an empty stream (no header).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use stash_core::bitstream::{BitReader, BitWriter};
use stash_core::error::{Result, StashError};
use stash_core::traits::Codec;

/// Node in the arena-backed Huffman tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Leaf {
        byte: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: usize,
        right: usize,
    },
}

impl Node {
    fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }
}

/// A Huffman prefix tree built from a symbol frequency list.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree from `(byte, frequency)` pairs.
    ///
    /// Ties in weight are broken by arrival order: leaves in the order given,
    /// then merged parents in the order they were created. Returns `None` for
    /// an empty symbol list.
    pub fn build(symbols: &[(u8, u64)]) -> Option<Self> {
        let mut nodes = Vec::with_capacity(symbols.len() * 2);
        let mut heap = BinaryHeap::with_capacity(symbols.len());
        let mut sequence = 0u64;

        for &(byte, weight) in symbols {
            let idx = nodes.len();
            nodes.push(Node::Leaf { byte, weight });
            heap.push(Reverse((weight, sequence, idx)));
            sequence += 1;
        }

        while heap.len() > 1 {
            let Reverse((left_weight, _, left)) = heap.pop()?;
            let Reverse((right_weight, _, right)) = heap.pop()?;
            let weight = left_weight.saturating_add(right_weight);

            let idx = nodes.len();
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });
            heap.push(Reverse((weight, sequence, idx)));
            sequence += 1;
        }

        let Reverse((_, _, root)) = heap.pop()?;
        Some(Self { nodes, root })
    }

    /// Build a tree from the byte frequencies of `data`.
    pub fn from_data(data: &[u8]) -> Option<Self> {
        Self::build(&symbol_frequencies(data))
    }

    /// Check whether the root is a leaf (one distinct symbol).
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root], Node::Leaf { .. })
    }

    /// Total weight at the root.
    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Number of distinct symbols (leaves).
    pub fn symbol_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Derive the code table by walking the tree (left = 0, right = 1).
    ///
    /// A lone root leaf gets the one-bit code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut codes: Vec<Option<Vec<bool>>> = vec![None; 256];
        let mut stack = vec![(self.root, Vec::new())];

        while let Some((idx, prefix)) = stack.pop() {
            match self.nodes[idx] {
                Node::Leaf { byte, .. } => {
                    let code = if prefix.is_empty() { vec![false] } else { prefix };
                    codes[byte as usize] = Some(code);
                }
                Node::Internal { left, right, .. } => {
                    let mut right_code = prefix.clone();
                    right_code.push(true);
                    stack.push((right, right_code));

                    let mut left_code = prefix;
                    left_code.push(false);
                    stack.push((left, left_code));
                }
            }
        }

        CodeTable { codes }
    }

    /// Step from an internal node along one bit. Returns `None` at a leaf.
    fn child(&self, idx: usize, bit: bool) -> Option<usize> {
        match self.nodes[idx] {
            Node::Internal { left, right, .. } => Some(if bit { right } else { left }),
            Node::Leaf { .. } => None,
        }
    }

    fn leaf_byte(&self, idx: usize) -> Option<u8> {
        match self.nodes[idx] {
            Node::Leaf { byte, .. } => Some(byte),
            Node::Internal { .. } => None,
        }
    }
}

/// Per-byte prefix codes derived from a [`HuffmanTree`].
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTable {
    /// Code bits for `byte`, or `None` if the byte never occurred.
    pub fn code(&self, byte: u8) -> Option<&[bool]> {
        self.codes[byte as usize].as_deref()
    }

    /// Code length in bits for `byte` (0 if absent).
    pub fn code_length(&self, byte: u8) -> usize {
        self.code(byte).map_or(0, <[bool]>::len)
    }
}

/// Count how often each byte value occurs.
pub fn count_frequencies(data: &[u8]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }
    counts
}

/// Non-zero `(byte, frequency)` pairs in ascending byte order.
fn symbol_frequencies(data: &[u8]) -> Vec<(u8, u64)> {
    count_frequencies(data)
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(byte, &count)| (byte as u8, count))
        .collect()
}

/// Huffman-compress `input`.
///
/// # Errors
///
/// Returns `InputTooLarge` if `input` is longer than `u32::MAX` bytes.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let length = u32::try_from(input.len())
        .map_err(|_| StashError::input_too_large(input.len() as u64, u64::from(u32::MAX)))?;

    let symbols = symbol_frequencies(input);
    let tree = HuffmanTree::build(&symbols)
        .ok_or_else(|| StashError::invalid_header("empty Huffman symbol table"))?;
    let table = tree.code_table();

    let mut writer = BitWriter::with_capacity(input.len() / 2 + symbols.len() * 5 + 6);
    writer.write_bits(symbols.len() as u32, 16)?;
    for &(byte, count) in &symbols {
        writer.write_byte(byte);
        // count <= input.len() <= u32::MAX
        writer.write_bits(count as u32, 32)?;
    }
    writer.write_bits(length, 32)?;

    for &byte in input {
        if let Some(code) = table.code(byte) {
            for &bit in code {
                writer.write_bit(bit);
            }
        }
    }

    Ok(writer.into_vec())
}

/// Huffman-decompress `input`.
///
/// A body that ends before the declared length is reached yields the bytes
/// decoded so far.
///
/// # Errors
///
/// Returns `UnexpectedEof` if the stream ends inside the header and
/// `InvalidHeader` for a symbol count outside 1-256.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = BitReader::new(input);
    let count = reader
        .read_bits(16)?
        .ok_or_else(|| StashError::unexpected_eof("Huffman symbol count"))?;
    if count == 0 || count > 256 {
        return Err(StashError::invalid_header(format!(
            "Huffman symbol count {count} out of range"
        )));
    }

    let mut symbols = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let byte = reader
            .read_byte()
            .ok_or_else(|| StashError::unexpected_eof("Huffman symbol table"))?;
        let weight = reader
            .read_bits(32)?
            .ok_or_else(|| StashError::unexpected_eof("Huffman symbol table"))?;
        symbols.push((byte, u64::from(weight)));
    }

    let length = reader
        .read_bits(32)?
        .ok_or_else(|| StashError::unexpected_eof("Huffman original length"))?
        as usize;

    let tree = HuffmanTree::build(&symbols)
        .ok_or_else(|| StashError::invalid_header("empty Huffman symbol table"))?;

    if tree.is_single_leaf() {
        let byte = tree.leaf_byte(tree.root).unwrap_or_default();
        return Ok(vec![byte; length]);
    }

    // Every decoded byte costs at least one body bit.
    let capacity = length.min(usize::try_from(reader.remaining_bits()).unwrap_or(usize::MAX));
    let mut output = Vec::with_capacity(capacity);
    let mut node = tree.root;
    while output.len() < length {
        let Some(bit) = reader.read_bit() else {
            break;
        };
        let Some(next) = tree.child(node, bit) else {
            break;
        };
        match tree.leaf_byte(next) {
            Some(byte) => {
                output.push(byte);
                node = tree.root;
            }
            None => node = next,
        }
    }

    Ok(output)
}

/// The Huffman codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Huffman;

impl Codec for Huffman {
    fn name(&self) -> &'static str {
        "Huffman"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        compress(input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        decompress(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roundtrip() {
        assert!(compress(b"").unwrap().is_empty());
        assert!(decompress(b"").unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_tree() {
        let tree = HuffmanTree::from_data(b"zzzz").unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.code_table().code(b'z'), Some(&[false][..]));
    }

    #[test]
    fn test_single_symbol_roundtrip() {
        let data = vec![b'Q'; 1000];
        let compressed = compress(&data).unwrap();
        // 2 (count) + 5 (symbol) + 4 (length) + 125 bytes of '0' codes
        assert_eq!(compressed.len(), 11 + 125);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_single_symbol_ignores_body() {
        let data = vec![7u8; 40];
        let compressed = compress(&data).unwrap();
        // Header alone is enough to reproduce a single-symbol input.
        assert_eq!(decompress(&compressed[..11]).unwrap(), data);
    }

    #[test]
    fn test_code_lengths_follow_frequency() {
        let mut data = vec![b'a'; 100];
        data.extend(vec![b'b'; 50]);
        data.extend(vec![b'c'; 25]);
        data.extend(vec![b'd'; 25]);
        let table = HuffmanTree::from_data(&data).unwrap().code_table();

        assert_eq!(table.code_length(b'a'), 1);
        assert_eq!(table.code_length(b'b'), 2);
        assert_eq!(table.code_length(b'c'), 3);
        assert_eq!(table.code_length(b'd'), 3);
        assert_eq!(table.code_length(b'e'), 0);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let table = HuffmanTree::from_data(data).unwrap().code_table();
        let codes: Vec<&[bool]> = (0..=255u8).filter_map(|b| table.code(b)).collect();

        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "code {i} is a prefix of code {j}");
                }
            }
        }
    }

    #[test]
    fn test_tree_weights() {
        let tree = HuffmanTree::from_data(b"aabbbc").unwrap();
        assert_eq!(tree.total_weight(), 6);
        assert_eq!(tree.symbol_count(), 3);
    }

    #[test]
    fn test_roundtrip_text() {
        let data = b"Hello, World! Hello, Huffman! abracadabra";
        let compressed = compress(data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_truncated_body_stops_short() {
        let data = b"abcdefghabcdefghabcdefgh".repeat(8);
        let compressed = compress(&data).unwrap();
        let cut = &compressed[..compressed.len() - 10];
        let partial = decompress(cut).unwrap();
        assert!(partial.len() < data.len());
        assert_eq!(&data[..partial.len()], &partial[..]);
    }

    #[test]
    fn test_truncated_header() {
        let compressed = compress(b"abc").unwrap();
        assert!(matches!(
            decompress(&compressed[..4]),
            Err(StashError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_zero_symbol_count_rejected() {
        assert!(matches!(
            decompress(&[0, 0, 0, 0]),
            Err(StashError::InvalidHeader { .. })
        ));
    }
}
