//! reelbatch CLI: runs one checkpointed batch, or publishes a produced archive.
//!
//! Usage:
//!   reelbatch run <SOURCE>        Process the next window of records
//!   reelbatch publish <ARCHIVE>   Publish every artifact in an archive
//!
//! Results are printed to stdout as a single JSON object. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "reelbatch",
    about = "Turn spreadsheet rows into packaged, published short videos",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the next window of records from a CSV source
    Run {
        /// URL or path of the CSV source
        source: String,

        /// Cursor state file
        #[arg(long)]
        state_file: Option<PathBuf>,

        /// Maximum records processed per run
        #[arg(long)]
        max_per_run: Option<usize>,

        /// Directory receiving the archive
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Publish every artifact listed in a produced archive
    Publish {
        /// Path to the archive
        archive: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    logging::init_logging(log_level, cli.json_logs);

    match cli.command {
        Commands::Run {
            source,
            state_file,
            max_per_run,
            output_dir,
        } => {
            commands::run::run(
                cli.config.as_deref(),
                commands::run::RunArgs {
                    source,
                    state_file,
                    max_per_run,
                    output_dir,
                },
            )
            .await
        }
        Commands::Publish { archive } => {
            commands::publish::run(cli.config.as_deref(), &archive).await
        }
    }
}
