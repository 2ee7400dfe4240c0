//! Info command implementation.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use stash_archive::Container;

use crate::utils::{CliResult, format_size};

pub fn cmd_info(archive: &Path) -> CliResult {
    let file_size = std::fs::metadata(archive)?.len();
    let mut reader = BufReader::new(File::open(archive)?);
    let (header, records) = Container::read_metadata(&mut reader)?;

    let total_size: u64 = records.iter().map(|r| r.original_size).sum();
    let total_compressed: u64 = records.iter().map(|r| r.compressed_size).sum();
    let duplicates = records.iter().filter(|r| r.is_duplicate).count();

    let mut by_algorithm: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *by_algorithm.entry(record.algorithm.as_str()).or_default() += 1;
    }

    println!("Archive Information");
    println!("===================");
    println!("File: {}", archive.display());
    println!("Format version: {}", header.version);
    println!("Size: {} ({} bytes)", format_size(file_size), file_size);
    println!();
    println!("Contents:");
    println!("  Files: {}", records.len());
    println!("  Unique blobs: {}", header.blob_count);
    println!("  Duplicates: {duplicates}");
    println!("  Total size: {} bytes", total_size);
    println!("  Stored size: {} bytes", total_compressed);
    if total_size > 0 {
        println!(
            "  Compression ratio: {:.1}%",
            (1.0 - total_compressed as f64 / total_size as f64) * 100.0
        );
    }
    println!();
    println!("Methods:");
    for (algorithm, count) in by_algorithm {
        println!("  {algorithm}: {count}");
    }
    Ok(())
}
