// src/main.rs
mod utils;
mod extractors;
mod storage;

use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use extractors::{encoding, ExtractConfig, MatchOrder, Outcome};
use utils::AppError;

/// Extracts Item Name / Alias pairs from a UTF-16 export file into CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output (-v debug, -vv trace); ignored when RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find every Item Name / Alias pair and write them as `alias,"item name"` rows
    Extract {
        /// Export file to read (UTF-16, optional byte-order mark)
        #[arg(short, long, default_value = "prucsv.csv")]
        input: PathBuf,

        /// CSV file to write
        #[arg(short, long, default_value = "item_alias_pairs.csv")]
        output: PathBuf,

        /// Continue in <output>_part2.csv from the first row with this alias
        #[arg(long)]
        split_alias: Option<String>,

        /// Ask on stdin whether to split, and at which alias
        #[arg(long, conflicts_with = "split_alias")]
        interactive: bool,

        /// Row order when several markup forms match
        #[arg(long, value_enum, default_value_t = MatchOrder::Position)]
        order: MatchOrder,

        /// Write an `Alias,"Item Name"` header row
        #[arg(long)]
        header: bool,

        /// Number of pairs echoed to the log for spot-checking
        #[arg(long, default_value = "5")]
        preview: usize,

        /// Also save a JSON summary of the run here
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Print the start of a file decoded with the first single-byte encoding that fits
    Sample {
        /// File to inspect
        #[arg(short, long, default_value = "prucsv.csv")]
        input: PathBuf,

        /// Number of bytes to read
        #[arg(long, default_value = "1000")]
        size: usize,
    },
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG, else the -v count)
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    match args.command {
        Command::Extract {
            input,
            output,
            split_alias,
            interactive,
            order,
            header,
            preview,
            summary,
        } => {
            // Don't ask the operator anything about a file that isn't there
            ensure_input(&input)?;

            let split_alias = if interactive {
                prompt_split_alias(&mut io::stdin().lock(), &mut io::stdout())?
            } else {
                split_alias
            };

            let config = ExtractConfig {
                split_alias,
                order,
                write_header: header,
                preview,
                ..ExtractConfig::new(input, output)
            };

            let report = extractors::extract_pairs(&config).map_err(|e| {
                tracing::error!("Extraction failed: {}", e);
                e
            })?;

            match report.outcome {
                Outcome::Exported => tracing::info!("Exported {} pairs", report.pair_count),
                Outcome::NoPairs => tracing::info!("Nothing exported"),
                Outcome::DecodeFailed => tracing::warn!("Input could not be decoded, nothing exported"),
            }

            if let Some(path) = summary {
                storage::save_summary(&report, path)?;
            }
        }
        Command::Sample { input, size } => show_sample(&input, size)?,
    }

    Ok(())
}

/// Asks whether output should be split and, if so, at which alias.
fn prompt_split_alias<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<String>, AppError> {
    write!(out, "Split the CSV output? (y/n): ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;

    // "s" is accepted for "si"
    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si") {
        return Ok(None);
    }

    write!(out, "Alias that starts the second file: ")?;
    out.flush()?;
    let mut alias = String::new();
    input.read_line(&mut alias)?;

    let alias = alias.trim_end_matches(['\r', '\n']).to_string();
    if alias.is_empty() {
        tracing::warn!("No split alias given, writing a single file");
        return Ok(None);
    }
    Ok(Some(alias))
}

fn ensure_input(input: &Path) -> Result<(), AppError> {
    if input.is_file() {
        Ok(())
    } else {
        Err(AppError::InputNotFound(input.display().to_string()))
    }
}

fn show_sample(input: &Path, size: usize) -> Result<(), AppError> {
    ensure_input(input)?;

    let mut sample = Vec::with_capacity(size);
    std::fs::File::open(input)?
        .take(size as u64)
        .read_to_end(&mut sample)?;

    match encoding::decode_sample(&sample) {
        Some((label, text)) => {
            tracing::info!("Sample of {} decoded with {}", input.display(), label);
            println!("{}", text);
        }
        None => tracing::warn!("Could not decode the sample with any encoding"),
    }
    Ok(())
}
