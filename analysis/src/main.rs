//! Perfevo CLI - refactoring x change/effect contingency matrix
//!
//! ```bash
//! perfevo observations.csv                  # writes ../../refactorings_change_effect_combo.csv
//! perfevo observations.csv combo.csv        # explicit output path
//! perfevo observations.csv combo.csv --format json --stats
//! ```

use clap::{Parser, ValueEnum};
use perfevo::logs::{self, Verbosity};
use perfevo::{render_json, render_text, run_pipeline, PipelineOptions, DEFAULT_OUTPUT_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perfevo")]
#[command(about = "Count refactoring types against change type and effect size", long_about = None)]
struct Cli {
    /// Input observations (delimited text)
    input: PathBuf,

    /// Output CSV file
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Input delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Effect sizes to keep (exact match)
    #[arg(long = "keep", value_name = "SIZE", value_delimiter = ',', default_values_t = ["large".to_string(), "small".to_string()])]
    effect_sizes: Vec<String>,

    /// Console rendering of the matrix
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print stage statistics as JSON to stderr
    #[arg(long)]
    stats: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };
    logs::init(verbosity);

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions {
        output_path: cli.output,
        delimiter: cli.delimiter,
        effect_sizes: cli.effect_sizes,
        ..Default::default()
    };

    let outcome = run_pipeline(&cli.input, &options)?;

    match cli.format {
        Format::Text => println!("{}", render_text(&outcome.matrix)),
        Format::Json => println!("{}", render_json(&outcome.matrix)?),
    }

    if cli.stats {
        eprintln!("{}", serde_json::to_string_pretty(&outcome.stats)?);
    }

    Ok(())
}
