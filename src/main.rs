//! Bulk CLI application entry point
//!
//! Reads commands from stdin, one per line, and groups them into batches of
//! `N`. Every closed batch is printed as `bulk: cmd1, cmd2, ...` and written
//! to its own `bulk<micros>.log` file.
//!
//! # Usage
//!
//! ```bash
//! # Fixed batches of three
//! printf 'cmd1\ncmd2\ncmd3\ncmd4\ncmd5\n' | bulk 3
//! # bulk: cmd1, cmd2, cmd3
//! # bulk: cmd4, cmd5
//!
//! # A { ... } block forms one batch regardless of N
//! printf 'cmd1\n{\ncmd2\ncmd3\ncmd4\ncmd5\n}\n' | bulk 3
//! # bulk: cmd1
//! # bulk: cmd2, cmd3, cmd4, cmd5
//! ```

use std::io;
use std::process::ExitCode;

use bulk::{
    BatchProcessor, BulkError, ConsoleSink, FileSink, cli::Cli, config::BulkConfig, driver,
    logging,
};
use colored::Colorize;
use tracing::info;

type Result<T> = std::result::Result<T, BulkError>;

fn run(cli: Cli) -> Result<()> {
    let config = BulkConfig::load(cli.config.as_deref())?.with_overrides(
        cli.log_dir,
        cli.no_console,
        cli.no_files,
    );
    info!(size = cli.size.get(), ?config, "starting");

    if config.files && !config.log_dir.is_dir() {
        return Err(BulkError::InvalidInput(format!(
            "Log directory '{}' does not exist",
            config.log_dir.display()
        )));
    }

    let mut console = ConsoleSink::new();
    let mut files = FileSink::new(&config.log_dir);

    let mut processor = BatchProcessor::new(cli.size);
    if config.console {
        processor.subscribe(&mut console);
    }
    if config.files {
        processor.subscribe(&mut files);
    }

    let summary = driver::run(io::stdin().lock(), processor)?;
    info!(
        batches = summary.batches,
        commands = summary.commands,
        dropped = summary.dropped,
        sink_failures = summary.sink_failures,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
