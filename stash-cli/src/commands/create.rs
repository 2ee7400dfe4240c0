//! Create command implementation.

use std::path::{Path, PathBuf};

use stash_archive::{ArchiveManager, ArchiveOptions, MethodOverride};

use crate::utils::{CliResult, collect_entries, format_size};

pub fn cmd_create(
    archive: &Path,
    files: &[PathBuf],
    method: MethodOverride,
    verbose: bool,
) -> CliResult {
    if files.is_empty() {
        return Err("no input files given".into());
    }

    let entries = collect_entries(files)?;

    let mut manager = ArchiveManager::with_options(ArchiveOptions::new().with_method(method));
    let result = manager.create_archive(&entries, archive)?;

    if verbose {
        for record in &result.metadata {
            if record.is_duplicate {
                println!(
                    "  {} -> duplicate of {}",
                    record.relative_path, record.duplicate_of
                );
            } else {
                println!("  {record}");
            }
        }
    }

    println!(
        "Created {}: {} files, {} -> {} ({:.1}% saved, {} duplicates)",
        archive.display(),
        result.metadata.len(),
        format_size(result.original_size),
        format_size(result.compressed_size),
        result.compression_ratio(),
        result.duplicate_count
    );
    Ok(())
}
