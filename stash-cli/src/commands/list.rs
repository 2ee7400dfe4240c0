//! List command implementation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stash_archive::{Metadata, read_metadata};

use crate::utils::{CliResult, matches_filters};

/// JSON serializable record for archive listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    path: String,
    name: String,
    size: u64,
    compressed_size: u64,
    ratio: f64,
    algorithm: String,
    file_type: String,
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_of: Option<String>,
    timestamp: i64,
}

impl EntryJson {
    fn from_record(record: &Metadata) -> Self {
        Self {
            path: record.relative_path.clone(),
            name: record.original_name.clone(),
            size: record.original_size,
            compressed_size: record.compressed_size,
            ratio: record.compression_ratio(),
            algorithm: record.algorithm.to_string(),
            file_type: record.file_type.label().to_string(),
            hash: record.hash.clone(),
            duplicate_of: record
                .is_duplicate
                .then(|| record.duplicate_of.clone()),
            timestamp: record.timestamp,
        }
    }
}

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    entries: Vec<EntryJson>,
}

/// Options for listing archive contents.
pub struct ListOptions<'a> {
    pub verbose: bool,
    pub json: bool,
    pub include: &'a [String],
    pub exclude: &'a [String],
}

pub fn cmd_list(archive: &Path, options: &ListOptions) -> CliResult {
    let records: Vec<Metadata> = read_metadata(archive)?
        .into_iter()
        .filter(|r| matches_filters(&r.relative_path, options.include, options.exclude))
        .collect();

    if options.json {
        let output = ArchiveListJson {
            archive: archive.display().to_string(),
            entries: records.iter().map(EntryJson::from_record).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Archive: {}", archive.display());
    println!();

    if !options.verbose {
        for record in &records {
            println!("{}", record.relative_path);
        }
        return Ok(());
    }

    println!(
        "{:>10} {:>10} {:>6} {:>9}  {:<14}  Name",
        "Size", "Compressed", "Ratio", "Method", "Type"
    );
    println!("{}", "-".repeat(72));

    let mut total_size = 0u64;
    let mut total_compressed = 0u64;
    for record in &records {
        let ratio = if record.original_size > 0 && !record.is_duplicate {
            format!("{:.1}%", record.compression_ratio())
        } else {
            "-".to_string()
        };
        let name = if record.is_duplicate {
            format!("{} (= {})", record.relative_path, record.duplicate_of)
        } else {
            record.relative_path.clone()
        };
        println!(
            "{:>10} {:>10} {:>6} {:>9}  {:<14}  {}",
            record.original_size,
            record.compressed_size,
            ratio,
            record.algorithm.as_str(),
            record.file_type.label(),
            name
        );
        total_size += record.original_size;
        total_compressed += record.compressed_size;
    }

    println!("{}", "-".repeat(72));
    let total_ratio = if total_size > 0 {
        (1.0 - total_compressed as f64 / total_size as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "{:>10} {:>10} {:>5.1}%  {} files",
        total_size,
        total_compressed,
        total_ratio,
        records.len()
    );
    Ok(())
}
