//! Pixseal CLI - pixel-embedded provenance signing for AI-generated images.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

#[derive(Parser)]
#[command(name = "pixseal")]
#[command(author, version, about = "Pixel-embedded provenance signatures", long_about = None)]
#[command(after_help = "Exit codes:\n  0   success\n  64  usage error\n  65  verification failed (unsigned or tampered)\n  66  cannot read input\n  74  cannot write output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress human-readable output
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a provenance signature into an image's pixels
    Sign {
        /// Path to the image (lossless format, e.g. PNG)
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Metadata payload as an inline string
        #[arg(short, long, conflicts_with = "metadata_file")]
        metadata: Option<String>,

        /// Metadata payload read from a file
        #[arg(long, value_name = "FILE")]
        metadata_file: Option<PathBuf>,

        /// Output path (defaults to <IMAGE>.sealed.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sign with a fixed Unix timestamp instead of the current time
        #[arg(long)]
        timestamp: Option<u32>,

        /// Skip writing the <OUTPUT>.pixseal.json sidecar
        #[arg(long)]
        no_sidecar: bool,
    },

    /// Verify an image's embedded provenance signature
    Verify {
        /// Path to the image to check
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Original metadata payload as an inline string, for confirmation
        #[arg(short, long, conflicts_with = "metadata_file")]
        metadata: Option<String>,

        /// Original metadata payload read from a file
        #[arg(long, value_name = "FILE")]
        metadata_file: Option<PathBuf>,

        /// Print the full verification report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // clap exits 2 on its own; remap argument errors to EX_USAGE so the
    // documented exit codes hold. Help and version output still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            std::process::exit(code);
        }
    };

    let result: Result<()> = match cli.command {
        Commands::Sign {
            image,
            metadata,
            metadata_file,
            output,
            timestamp,
            no_sidecar,
        } => commands::sign::execute(
            image,
            metadata,
            metadata_file,
            output,
            timestamp,
            no_sidecar,
            cli.quiet,
        ),
        Commands::Verify {
            image,
            metadata,
            metadata_file,
            json,
        } => commands::verify::execute(image, metadata, metadata_file, json, cli.quiet),
    };

    if let Err(err) = result {
        let exit = exit_codes::ExitCode::from_anyhow(&err);
        if let Some(message) = &exit.message {
            eprintln!("{} {message}", "error:".red().bold());
        }
        std::process::exit(exit.code);
    }
}
