//! File classification by extension.
//!
//! The classifier maps a file name to a [`FileType`], which in turn picks the
//! codec: text compresses with LZW, raw images with RLE, and content that is
//! already compressed is stored as-is. Extensions the table does not know
//! are treated as text.

use std::collections::HashMap;
use std::fmt;

use crate::metadata::Algorithm;

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "csv", "log", "md", "markdown", "json", "xml", "html", "css", "js", "java", "py", "c",
    "cpp", "h", "hpp", "go", "rs", "rb", "php", "sh", "bash",
];

const RAW_IMAGE_EXTENSIONS: &[&str] = &["bmp", "ppm", "pgm", "pbm"];

const COMPRESSED_EXTENSIONS: &[&str] = &[
    // Images
    "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "tiff", "tif", "heic", "heif",
    // Archives
    "zip", "rar", "7z", "gz", "tar", "bz2", "xz", "tgz", "tbz", "jar", "war", "ear",
    // Audio
    "mp3", "aac", "ogg", "flac", "wav", "m4a", "wma", "opus", "alac",
    // Video
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "ts",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
    // Executables
    "exe", "dll", "so", "dylib", "app", "dmg", "pkg", "deb", "rpm", "apk", "class",
    // Databases
    "db", "sqlite", "sqlite3", "mdb",
];

/// Content category of an archived file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Plain text and source code.
    Text,
    /// Uncompressed bitmaps (BMP, PPM, PGM, PBM).
    RawImage,
    /// Media, archives and other already-compressed formats.
    Compressed,
    /// Anything explicitly mapped as unknown.
    Unknown,
}

impl FileType {
    /// Human-readable label, as stored in metadata records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::RawImage => "Raw Image",
            Self::Compressed => "Pre-compressed",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a label produced by [`FileType::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Text" => Some(Self::Text),
            "Raw Image" => Some(Self::RawImage),
            "Pre-compressed" => Some(Self::Compressed),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Codec used for this category when no override is configured.
    pub fn default_algorithm(&self) -> Algorithm {
        match self {
            Self::Text => Algorithm::Lzw,
            Self::RawImage => Algorithm::Rle,
            Self::Compressed | Self::Unknown => Algorithm::Store,
        }
    }

    /// Check whether this category is worth compressing.
    pub fn should_compress(&self) -> bool {
        matches!(self, Self::Text | Self::RawImage)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-cased extension of `file_name` (text after the last `.`), or `""`.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) => file_name[dot + 1..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Extension lookup table.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: HashMap<String, FileType>,
}

impl Classifier {
    /// Create a classifier with the built-in extension sets.
    pub fn new() -> Self {
        let mut table = HashMap::new();
        let groups = [
            (TEXT_EXTENSIONS, FileType::Text),
            (RAW_IMAGE_EXTENSIONS, FileType::RawImage),
            (COMPRESSED_EXTENSIONS, FileType::Compressed),
        ];
        for (extensions, file_type) in groups {
            for ext in extensions {
                table.insert((*ext).to_string(), file_type);
            }
        }
        Self { table }
    }

    /// Map `extension` (case-insensitive, without the dot) to `file_type`,
    /// replacing any built-in mapping.
    pub fn with_extension(mut self, extension: &str, file_type: FileType) -> Self {
        self.table.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            file_type,
        );
        self
    }

    /// Classify a file by name. Unrecognised extensions are [`FileType::Text`].
    pub fn classify(&self, file_name: &str) -> FileType {
        self.table
            .get(&extension_of(file_name))
            .copied()
            .unwrap_or(FileType::Text)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sets() {
        let classifier = Classifier::new();
        assert_eq!(classifier.classify("notes.txt"), FileType::Text);
        assert_eq!(classifier.classify("main.rs"), FileType::Text);
        assert_eq!(classifier.classify("scan.BMP"), FileType::RawImage);
        assert_eq!(classifier.classify("photo.jpeg"), FileType::Compressed);
        assert_eq!(classifier.classify("backup.tar.gz"), FileType::Compressed);
    }

    #[test]
    fn test_unknown_is_text() {
        let classifier = Classifier::new();
        assert_eq!(classifier.classify("data.xyz"), FileType::Text);
        assert_eq!(classifier.classify("Makefile"), FileType::Text);
        assert_eq!(classifier.classify("trailing."), FileType::Text);
    }

    #[test]
    fn test_with_extension_overrides() {
        let classifier = Classifier::new()
            .with_extension(".TGA", FileType::RawImage)
            .with_extension("txt", FileType::Unknown);
        assert_eq!(classifier.classify("sprite.tga"), FileType::RawImage);
        assert_eq!(classifier.classify("readme.txt"), FileType::Unknown);
    }

    #[test]
    fn test_default_algorithms() {
        assert_eq!(FileType::Text.default_algorithm(), Algorithm::Lzw);
        assert_eq!(FileType::RawImage.default_algorithm(), Algorithm::Rle);
        assert_eq!(FileType::Compressed.default_algorithm(), Algorithm::Store);
        assert_eq!(FileType::Unknown.default_algorithm(), Algorithm::Store);
        assert!(!FileType::Compressed.should_compress());
    }

    #[test]
    fn test_labels_roundtrip() {
        for file_type in [
            FileType::Text,
            FileType::RawImage,
            FileType::Compressed,
            FileType::Unknown,
        ] {
            assert_eq!(FileType::from_label(file_type.label()), Some(file_type));
        }
        assert_eq!(FileType::RawImage.to_string(), "Raw Image");
    }
}
