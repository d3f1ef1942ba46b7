// src/extractors/mod.rs
pub mod encoding;
pub mod extract;
pub mod pairs;

// Re-export key extraction types for convenience
pub use extract::{extract_pairs, ExtractConfig, ExtractionReport, Outcome};
pub use pairs::MatchOrder;
