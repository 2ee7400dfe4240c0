//! Test command implementation.

use std::path::Path;

use stash_archive::ArchiveManager;

use crate::utils::CliResult;

pub fn cmd_test(archive: &Path, verbose: bool) -> CliResult {
    println!("Testing {}", archive.display());

    let result = ArchiveManager::new().extract_archive(archive)?;
    let mut failed = 0usize;

    for file in &result.restored_files {
        if file.verified {
            if verbose {
                println!("  OK: {}", file.path);
            }
        } else {
            failed += 1;
            println!("  FAILED: {} - content hash mismatch", file.path);
        }
    }

    println!();
    println!(
        "Tested {} files: {} OK, {} failed",
        result.restored_files.len(),
        result.verified_count(),
        failed
    );

    if failed > 0 {
        return Err(format!("{failed} file(s) failed verification").into());
    }
    println!("All files OK");
    Ok(())
}
