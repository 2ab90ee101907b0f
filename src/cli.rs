//! Command-line interface definitions and parsing
//!
//! This module defines the CLI for bulk using the `clap` crate. The only
//! required argument is the fixed batch size; everything else tunes where
//! batches are reported.
//!
//! # Examples
//!
//! ```bash
//! # Batches of three commands, printed and logged to the current directory
//! printf 'cmd1\ncmd2\ncmd3\ncmd4\n' | bulk 3
//!
//! # Console only
//! bulk 3 --no-files < commands.txt
//!
//! # Log files into a dedicated directory, with debug diagnostics on stderr
//! bulk 5 --log-dir /tmp/bulk -vv < commands.txt
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "bulk")]
#[command(about = "Group commands read from stdin into bulk batches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Number of commands per batch (positive integer)
    #[arg(value_name = "N")]
    pub size: NonZeroUsize,

    /// Directory for per-batch log files (overrides config)
    #[arg(short = 'd', long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write per-batch log files
    #[arg(long = "no-files")]
    pub no_files: bool,

    /// Do not print batches to stdout
    #[arg(long = "no-console")]
    pub no_console: bool,

    /// Read configuration from this file instead of the user config
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output on stderr (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// Exits with a usage error if the batch size is missing or invalid.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
