//! Extract command implementation.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use stash_archive::ArchiveManager;
use tracing::{debug, warn};

use crate::utils::{CliResult, create_progress_bar, matches_filters, safe_output_path};

/// Options for extracting an archive.
pub struct ExtractOptions<'a> {
    pub output: &'a Path,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub verbose: bool,
    pub progress: bool,
}

/// Modification time for a restored file: the moment its record was
/// archived, not the source file's own mtime.
fn archived_mtime(millis: i64) -> FileTime {
    FileTime::from_unix_time(
        millis.div_euclid(1000),
        (millis.rem_euclid(1000) * 1_000_000) as u32,
    )
}

pub fn cmd_extract(archive: &Path, options: &ExtractOptions) -> CliResult {
    let manager = ArchiveManager::new();
    let result = manager.extract_archive(archive)?;

    println!(
        "Extracting {} to {}",
        archive.display(),
        options.output.display()
    );

    let selected: Vec<_> = result
        .restored_files
        .iter()
        .zip(&result.metadata)
        .filter(|(file, _)| matches_filters(&file.path, options.include, options.exclude))
        .collect();

    // Resolve every target before writing anything.
    let targets = selected
        .iter()
        .map(|(file, _)| safe_output_path(options.output, &file.path))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = create_progress_bar(selected.len() as u64, options.progress);
    pb.set_message("files");

    let mut unverified = Vec::new();
    for ((file, record), target) in selected.iter().zip(&targets) {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, &file.data)?;

        filetime::set_file_mtime(target, archived_mtime(record.timestamp))?;
        debug!(path = %file.path, size = file.size, dest = %target.display(), "restored file");

        if !file.verified {
            warn!(path = %file.path, expected = %record.hash, "hash mismatch after restore");
            unverified.push(file.path.as_str());
            pb.println(format!("  FAILED verification: {}", file.path));
        } else if options.verbose {
            pb.println(format!("  Extracted: {} ({} bytes)", file.path, file.size));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    println!("{} files extracted", selected.len());
    if !unverified.is_empty() {
        return Err(format!(
            "{} file(s) failed hash verification: {}",
            unverified.len(),
            unverified.join(", ")
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archived_mtime() {
        let mtime = archived_mtime(1_700_000_000_123);
        assert_eq!(mtime.unix_seconds(), 1_700_000_000);
        assert_eq!(mtime.nanoseconds(), 123_000_000);

        let before_epoch = archived_mtime(-1);
        assert_eq!(before_epoch.unix_seconds(), -1);
        assert_eq!(before_epoch.nanoseconds(), 999_000_000);
    }

    #[test]
    fn test_extracted_file_carries_archive_time() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("notes.stash");
        let entries = vec![stash_archive::FileEntry::from_path("notes.txt", b"hello".to_vec())];
        let created = ArchiveManager::new()
            .create_archive(&entries, &archive)
            .unwrap();

        let output = dir.path().join("out");
        cmd_extract(
            &archive,
            &ExtractOptions {
                output: &output,
                include: &[],
                exclude: &[],
                verbose: false,
                progress: false,
            },
        )
        .unwrap();

        let restored = output.join("notes.txt");
        assert_eq!(fs::read(&restored).unwrap(), b"hello");
        let meta = fs::metadata(&restored).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&meta).unix_seconds(),
            created.metadata[0].timestamp.div_euclid(1000)
        );
    }
}
