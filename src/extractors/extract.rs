// src/extractors/extract.rs
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::extractors::encoding::{self, Utf16Variant};
use crate::extractors::pairs::{MatchOrder, PairMatcher};
use crate::storage::{CsvExporter, ExportedFile};
use crate::utils::AppError;

/// Everything one run needs; nothing is read from globals or prompts here.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub split_alias: Option<String>,
    pub order: MatchOrder,
    pub write_header: bool,
    /// How many pairs are echoed to the log for spot-checking.
    pub preview: usize,
}

impl ExtractConfig {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_path: I, output_path: O) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            split_alias: None,
            order: MatchOrder::default(),
            write_header: false,
            preview: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Exported,
    NoPairs,
    DecodeFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub input_path: PathBuf,
    pub input_size: u64,
    pub encoding: Utf16Variant,
    pub pair_count: usize,
    pub outcome: Outcome,
    pub files: Vec<ExportedFile>,
}

/// Reads the input, finds every Item Name / Alias pair and writes them as CSV.
///
/// A document that cannot be decoded is reported and yields zero pairs; it is
/// not an error. No output file is created when there is nothing to write.
pub fn extract_pairs(config: &ExtractConfig) -> Result<ExtractionReport, AppError> {
    let input = &config.input_path;
    if !input.is_file() {
        return Err(AppError::InputNotFound(input.display().to_string()));
    }

    tracing::info!("Processing input file: {}", input.display());
    let raw = fs::read(input)?;
    let input_size = raw.len() as u64;
    tracing::info!("File size: {} bytes", input_size);

    let (variant, body) = encoding::detect(&raw);
    tracing::info!("Using encoding: {}", variant);

    let mut report = ExtractionReport {
        input_path: input.clone(),
        input_size,
        encoding: variant,
        pair_count: 0,
        outcome: Outcome::NoPairs,
        files: Vec::new(),
    };

    let text = match encoding::decode(variant, body) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to decode {}: {}", input.display(), e);
            report.outcome = Outcome::DecodeFailed;
            return Ok(report);
        }
    };

    tracing::info!("Searching for pairs ({} characters, {:?} order)", text.chars().count(), config.order);
    let pairs = PairMatcher::new().find_pairs(&text, config.order);
    report.pair_count = pairs.len();

    if pairs.is_empty() {
        tracing::warn!("No pairs found in {}", input.display());
        return Ok(report);
    }
    tracing::info!("Total pairs found: {}", pairs.len());

    for (i, pair) in pairs.iter().take(config.preview).enumerate() {
        tracing::info!("Pair #{}: Item Name: {} | Alias: {}", i + 1, pair.item_name, pair.alias);
    }

    let mut exporter = CsvExporter::create(
        &config.output_path,
        config.split_alias.clone(),
        config.write_header,
    )?;
    for pair in &pairs {
        exporter.write_pair(pair)?;
    }
    report.files = exporter.finish()?;
    report.outcome = Outcome::Exported;

    for file in &report.files {
        tracing::info!("Wrote {} rows to {}", file.rows, file.path.display());
    }

    Ok(report)
}
