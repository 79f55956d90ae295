//! IMS DBD decoder CLI.
//!
//! `decode` renders a DBD source file as JSON or a text report;
//! `check` validates the fixed-column record format without decoding.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use output::OutputFormat;

/// IMS DBD decoder CLI.
#[derive(Parser)]
#[command(name = "ims-dbd", about = "Decode IMS DBD source into structured segment records")]
struct Cli {
    /// Enable verbose logging to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a DBD source file into segment records.
    Decode(DecodeArgs),
    /// Validate the fixed-column record format of a DBD source file.
    Check(CheckArgs),
}

#[derive(Parser)]
struct DecodeArgs {
    /// Input DBD source file.
    file: PathBuf,

    /// Output format (text, json).
    #[arg(long = "format", default_value = "text")]
    format: String,

    /// Write the rendered JSON to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Input DBD source file.
    file: PathBuf,

    /// Output format (text, json).
    #[arg(long = "format", default_value = "text")]
    format: String,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr, enabled by --verbose or RUST_LOG.
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else {
            tracing_subscriber::EnvFilter::new("debug")
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Decode(args) => commands::decode::run(
            args.file,
            OutputFormat::from_str(&args.format),
            args.output,
        ),
        Commands::Check(args) => {
            commands::check::run(args.file, OutputFormat::from_str(&args.format))
        }
    }
}
