//! Content-addressed deduplication table.
//!
//! One table serves one archiving session. The first path seen for a given
//! SHA-256 owns that content; later paths with the same hash are recorded
//! as duplicates and their bytes are dropped.

use std::collections::{HashMap, HashSet};

use stash_core::hash::sha256_hex;

/// Summary counts for a [`DedupTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupStats {
    /// Distinct content hashes seen.
    pub total_hashes: usize,
    /// Paths whose content matched an earlier path.
    pub duplicate_count: usize,
    /// Files with unique content (equal to `total_hashes`).
    pub unique_files: usize,
}

/// Hash -> first path / first bytes, plus the set of duplicate paths.
#[derive(Debug, Default)]
pub struct DedupTable {
    hash_to_path: HashMap<String, String>,
    hash_to_data: HashMap<String, Vec<u8>>,
    duplicate_paths: HashSet<String>,
}

impl DedupTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `data` and register it under `path`.
    ///
    /// Returns the hex SHA-256. If the hash is new, `path` becomes its owner;
    /// otherwise `path` is marked duplicate (unless it is the owner itself).
    pub fn process_file(&mut self, data: &[u8], path: &str) -> String {
        let hash = sha256_hex(data);
        match self.hash_to_path.get(&hash) {
            Some(owner) => {
                if owner != path {
                    self.duplicate_paths.insert(path.to_string());
                }
            }
            None => {
                self.hash_to_path.insert(hash.clone(), path.to_string());
                self.hash_to_data.insert(hash.clone(), data.to_vec());
            }
        }
        hash
    }

    /// Check whether `hash` has been seen.
    pub fn contains_hash(&self, hash: &str) -> bool {
        self.hash_to_path.contains_key(hash)
    }

    /// Check whether `path` was recorded as a duplicate.
    pub fn is_duplicate(&self, path: &str) -> bool {
        self.duplicate_paths.contains(path)
    }

    /// Path that first supplied `hash`.
    pub fn original_path(&self, hash: &str) -> Option<&str> {
        self.hash_to_path.get(hash).map(String::as_str)
    }

    /// Bytes first registered for `hash`.
    pub fn data_by_hash(&self, hash: &str) -> Option<&[u8]> {
        self.hash_to_data.get(hash).map(Vec::as_slice)
    }

    /// Number of duplicate paths.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_paths.len()
    }

    /// Number of distinct content hashes.
    pub fn unique_count(&self) -> usize {
        self.hash_to_path.len()
    }

    /// Duplicate paths in sorted order.
    pub fn duplicate_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.duplicate_paths.iter().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Known hashes in sorted order.
    pub fn hashes(&self) -> Vec<&str> {
        let mut hashes: Vec<&str> = self.hash_to_path.keys().map(String::as_str).collect();
        hashes.sort_unstable();
        hashes
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.hash_to_path.clear();
        self.hash_to_data.clear();
        self.duplicate_paths.clear();
    }

    /// Snapshot of the table's counts.
    pub fn statistics(&self) -> DedupStats {
        DedupStats {
            total_hashes: self.hash_to_path.len(),
            duplicate_count: self.duplicate_paths.len(),
            unique_files: self.hash_to_path.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_path_owns_content() {
        let mut table = DedupTable::new();
        let h1 = table.process_file(b"same bytes", "a.txt");
        let h2 = table.process_file(b"same bytes", "b.txt");
        let h3 = table.process_file(b"other", "c.txt");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(table.original_path(&h1), Some("a.txt"));
        assert!(table.is_duplicate("b.txt"));
        assert!(!table.is_duplicate("a.txt"));
        assert_eq!(table.data_by_hash(&h1), Some(&b"same bytes"[..]));
        assert_eq!(table.duplicate_paths(), vec!["b.txt"]);
    }

    #[test]
    fn test_same_path_twice_is_not_duplicate() {
        let mut table = DedupTable::new();
        table.process_file(b"x", "a");
        table.process_file(b"x", "a");
        assert_eq!(table.duplicate_count(), 0);
        assert_eq!(table.unique_count(), 1);
    }

    #[test]
    fn test_statistics_and_clear() {
        let mut table = DedupTable::new();
        for (data, path) in [(&b"1"[..], "p1"), (b"2", "p2"), (b"1", "p3"), (b"1", "p4")] {
            table.process_file(data, path);
        }
        assert_eq!(
            table.statistics(),
            DedupStats {
                total_hashes: 2,
                duplicate_count: 2,
                unique_files: 2
            }
        );
        assert_eq!(table.hashes().len(), 2);

        table.clear();
        assert_eq!(table.statistics(), DedupStats::default());
        assert!(!table.contains_hash(&sha256_hex(b"1")));
    }
}
