//! sigmatch CLI
//!
//! Content fingerprinting and signature-database matching from the shell.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{hash_files, scan_file, Algorithm};
use std::path::PathBuf;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "sigmatch")]
#[command(about = "Fingerprint files and match them against signature databases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Files to fingerprint (if no subcommand)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Hash engine to use
    #[arg(short, long, value_enum, default_value_t = Algorithm::Tree)]
    algo: Algorithm,

    /// Digest length in bytes (sequential: 1-64, tree: unbounded)
    #[arg(short, long, default_value_t = 32)]
    length: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a file's fingerprint against a signature database
    Scan {
        /// File to fingerprint
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Signature database: one lowercase hex digest per line
        #[arg(short, long, value_name = "DB")]
        database: PathBuf,

        /// Also rank near-matches at or above this similarity (0.0-1.0)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Scan {
            file,
            database,
            threshold,
        }) => scan_file(file, database, *threshold)?,
        None => {
            if cli.files.is_empty() {
                eprintln!("Error: No files specified");
                eprintln!("Usage: sigmatch [FILE]... or sigmatch --help");
                std::process::exit(1);
            }

            hash_files(&cli.files, cli.algo, cli.length)?;
        }
    }

    Ok(())
}
