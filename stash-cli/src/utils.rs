//! Utility functions for the CLI.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use stash_archive::FileEntry;
use stash_core::StashError;
use walkdir::WalkDir;

/// Boxed error used by every command.
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let template = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Check if an archive path passes the filters.
/// - If include patterns are given, the path must match at least one
/// - It must not match any exclude pattern
pub fn matches_filters(name: &str, include: &[String], exclude: &[String]) -> bool {
    let matches = |patterns: &[String]| {
        patterns
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches(name))
    };

    if matches(exclude) {
        return false;
    }
    include.is_empty() || matches(include)
}

/// Join path components with `/`.
fn archive_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read the inputs into archive entries.
///
/// A file becomes an entry named after its file name. A directory is walked
/// in sorted order and each file is named relative to the directory's parent,
/// so `create out.stash docs` stores `docs/...` paths.
pub fn collect_entries(inputs: &[PathBuf]) -> CliResult<Vec<FileEntry>> {
    let mut entries = Vec::new();

    for input in inputs {
        let meta = fs::metadata(input)?;
        if meta.is_file() {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| format!("cannot archive {}", input.display()))?;
            entries.push(FileEntry::from_path(name, fs::read(input)?));
            continue;
        }

        let base = input.parent().unwrap_or(Path::new(""));
        for item in WalkDir::new(input).follow_links(false).sort_by_file_name() {
            let item = item?;
            if !item.file_type().is_file() {
                continue;
            }
            let relative = item.path().strip_prefix(base).unwrap_or(item.path());
            entries.push(FileEntry::from_path(
                archive_name(relative),
                fs::read(item.path())?,
            ));
        }
    }

    Ok(entries)
}

/// Resolve an archive path under `output`, refusing anything that would
/// escape it.
pub fn safe_output_path(output: &Path, name: &str) -> Result<PathBuf, StashError> {
    let mut resolved = output.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StashError::path_traversal(name));
            }
        }
    }

    if depth == 0 {
        return Err(StashError::path_traversal(name));
    }
    Ok(resolved)
}

/// Format a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let include = vec!["*.txt".to_string()];
        let exclude = vec!["secret*".to_string()];
        assert!(matches_filters("notes.txt", &include, &[]));
        assert!(!matches_filters("image.bmp", &include, &[]));
        assert!(!matches_filters("secret.txt", &include, &exclude));
        assert!(matches_filters("anything", &[], &[]));
    }

    #[test]
    fn test_safe_output_path() {
        let out = Path::new("/tmp/out");
        assert_eq!(
            safe_output_path(out, "docs/./a.txt").unwrap(),
            PathBuf::from("/tmp/out/docs/a.txt")
        );
        for bad in ["../escape.txt", "docs/../../x", "/etc/passwd", "", "."] {
            assert!(matches!(
                safe_output_path(out, bad),
                Err(StashError::PathTraversal { .. })
            ));
        }
    }

    #[test]
    fn test_collect_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.txt"), b"bee").unwrap();
        fs::write(root.join("sub").join("a.txt"), b"ay").unwrap();
        let single = dir.path().join("single.bmp");
        fs::write(&single, [0u8; 4]).unwrap();

        let entries = collect_entries(&[root, single]).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(names, vec!["docs/b.txt", "docs/sub/a.txt", "single.bmp"]);
        assert_eq!(entries[1].file_name, "a.txt");
        assert_eq!(entries[0].data, b"bee");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
