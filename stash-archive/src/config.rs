//! Archive creation options.

use std::fmt;
use std::str::FromStr;

use stash_core::error::StashError;

use crate::classify::FileType;
use crate::metadata::Algorithm;

/// How the codec for a non-duplicate entry is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodOverride {
    /// Pick by file classification.
    #[default]
    Auto,
    /// Force LZW for every entry.
    Lzw,
    /// Force RLE for every entry.
    Rle,
    /// Store every entry uncompressed.
    Store,
}

impl MethodOverride {
    /// Algorithm for an entry of the given type.
    pub fn algorithm_for(&self, file_type: FileType) -> Algorithm {
        match self {
            Self::Auto => file_type.default_algorithm(),
            Self::Lzw => Algorithm::Lzw,
            Self::Rle => Algorithm::Rle,
            Self::Store => Algorithm::Store,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Lzw => "lzw",
            Self::Rle => "rle",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for MethodOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodOverride {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lzw" => Ok(Self::Lzw),
            "rle" => Ok(Self::Rle),
            "store" => Ok(Self::Store),
            _ => Err(StashError::unknown_algorithm(s)),
        }
    }
}

/// Options for [`ArchiveManager`](crate::ArchiveManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveOptions {
    /// Codec selection policy.
    pub method: MethodOverride,
}

impl ArchiveOptions {
    /// Default options (classify by extension).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the codec selection policy.
    pub fn with_method(mut self, method: MethodOverride) -> Self {
        self.method = method;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_follows_classification() {
        let method = MethodOverride::Auto;
        assert_eq!(method.algorithm_for(FileType::Text), Algorithm::Lzw);
        assert_eq!(method.algorithm_for(FileType::RawImage), Algorithm::Rle);
        assert_eq!(method.algorithm_for(FileType::Compressed), Algorithm::Store);
    }

    #[test]
    fn test_forced_method() {
        let options = ArchiveOptions::new().with_method(MethodOverride::Store);
        assert_eq!(options.method.algorithm_for(FileType::Text), Algorithm::Store);
        assert_eq!(
            MethodOverride::Rle.algorithm_for(FileType::Compressed),
            Algorithm::Rle
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("LZW".parse::<MethodOverride>().unwrap(), MethodOverride::Lzw);
        assert_eq!("auto".parse::<MethodOverride>().unwrap(), MethodOverride::Auto);
        assert!("brotli".parse::<MethodOverride>().is_err());
        assert_eq!(MethodOverride::Store.to_string(), "store");
    }
}
