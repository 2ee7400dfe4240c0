//! Stash CLI - personal content-addressed archiver
//!
//! Creates, inspects and restores `.stash` archives, and runs the raw codecs
//! over single files.

mod commands;
mod utils;

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use stash_archive::MethodOverride;
use tracing_subscriber::EnvFilter;

use commands::{CodecKind, ExtractOptions, ListOptions};

#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version, about = "Personal archiver with deduplication and integrity checks")]
#[command(long_about = "
Stash packs files into a single archive. Identical files are stored once,
text is compressed with LZW, raw bitmaps with RLE, and already-compressed
media is stored as-is. Every file is checked against its SHA-256 on restore.

Log verbosity is read from STASH_LOG (default: warn).

Examples:
  stash create backup.stash notes/ photo.jpg
  stash list -v backup.stash
  stash extract backup.stash -o restored
  stash test backup.stash
  stash compress big.log big.log.lz --codec deflate
")]
struct Cli {
    /// Show verbose output and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new archive
    #[command(alias = "c")]
    Create {
        /// Output archive file
        archive: PathBuf,

        /// Files and directories to add
        files: Vec<PathBuf>,

        /// Codec selection
        #[arg(short, long, value_enum, default_value = "auto")]
        method: MethodArg,
    },

    /// Extract files from an archive
    ///
    /// Restored files get the time their entry was archived as their
    /// modification time, not the mtime the source file had.
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Include only files matching pattern (glob syntax: *.txt, src/**/*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude files matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// List contents of an archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Include only files matching pattern
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude files matching pattern
        #[arg(short = 'X', long)]
        exclude: Vec<String>,
    },

    /// Test archive integrity
    #[command(alias = "t")]
    Test {
        /// Archive file to test
        archive: PathBuf,
    },

    /// Show information about an archive
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,
    },

    /// Compress a single file with one codec
    Compress {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Codec to use
        #[arg(short, long, value_enum)]
        codec: CodecKind,
    },

    /// Decompress a single file produced by `compress`
    Decompress {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Codec the file was compressed with
        #[arg(short, long, value_enum)]
        codec: CodecKind,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Codec selection for `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Choose by file extension
    Auto,
    /// LZW for every file
    Lzw,
    /// RLE for every file
    Rle,
    /// Store every file uncompressed
    Store,
}

impl From<MethodArg> for MethodOverride {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => Self::Auto,
            MethodArg::Lzw => Self::Lzw,
            MethodArg::Rle => Self::Rle,
            MethodArg::Store => Self::Store,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);

    let result = match cli.command {
        Commands::Create {
            archive,
            files,
            method,
        } => commands::cmd_create(&archive, &files, method.into(), verbose),
        Commands::Extract {
            archive,
            output,
            include,
            exclude,
            no_progress,
        } => commands::cmd_extract(
            &archive,
            &ExtractOptions {
                output: &output,
                include: &include,
                exclude: &exclude,
                verbose,
                progress: !no_progress,
            },
        ),
        Commands::List {
            archive,
            json,
            include,
            exclude,
        } => commands::cmd_list(
            &archive,
            &ListOptions {
                verbose,
                json,
                include: &include,
                exclude: &exclude,
            },
        ),
        Commands::Test { archive } => commands::cmd_test(&archive, verbose),
        Commands::Info { archive } => commands::cmd_info(&archive),
        Commands::Compress {
            input,
            output,
            codec,
        } => commands::cmd_compress(&input, &output, codec, verbose),
        Commands::Decompress {
            input,
            output,
            codec,
        } => commands::cmd_decompress(&input, &output, codec, verbose),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "stash", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from(["stash", "create", "out.stash", "a.txt", "b/", "-m", "store"]);
        match cli.command {
            Commands::Create { files, method, .. } => {
                assert_eq!(files.len(), 2);
                assert_eq!(MethodOverride::from(method), MethodOverride::Store);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_extract_help_mentions_archive_time() {
        let command = Cli::command();
        let extract = command.find_subcommand("extract").unwrap();
        let help = extract.get_long_about().unwrap().to_string();
        assert!(help.contains("time their entry was archived"));
    }

    #[test]
    fn test_global_verbose() {
        let cli = Cli::parse_from(["stash", "list", "a.stash", "-v"]);
        assert!(cli.verbose);
    }
}
