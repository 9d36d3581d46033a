mod check;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "blackbox development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check all build configurations (host, feature matrix, thumbv7em)
    Check,
    /// Run the test matrix (default features, std, os, frame-pointers)
    Test {
        /// Run only the default-feature tests
        #[arg(long)]
        quick: bool,
    },
    /// Decode an exported crash-record blob and print the report
    Report {
        /// Path to the raw record blob pulled off the device
        file: PathBuf,
        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { quick } => test::run(quick),
        Commands::Report { file, json } => report::run(&file, json),
    }
}
