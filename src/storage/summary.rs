// src/storage/summary.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::ExtractionReport;
use crate::utils::error::StorageError;

/// Saves a JSON description of a finished run next to its CSV output.
pub fn save_summary<P: AsRef<Path>>(report: &ExtractionReport, path: P) -> Result<PathBuf, StorageError> {
    let file_path = path.as_ref().to_path_buf();

    // Create the parent directory if it doesn't exist
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut metadata = serde_json::to_value(report)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    if let Some(fields) = metadata.as_object_mut() {
        fields.insert(
            "extraction_timestamp".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }

    let metadata_str = serde_json::to_string_pretty(&metadata)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    fs::write(&file_path, metadata_str)?;

    tracing::info!("Saved run summary to {}", file_path.display());

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::encoding::Utf16Variant;
    use crate::extractors::Outcome;
    use crate::storage::ExportedFile;
    use tempfile::TempDir;

    #[test]
    fn test_save_summary_writes_json() {
        let dir = TempDir::new().unwrap();
        let report = ExtractionReport {
            input_path: PathBuf::from("prucsv.csv"),
            input_size: 128,
            encoding: Utf16Variant::LittleEndian,
            pair_count: 3,
            outcome: Outcome::Exported,
            files: vec![ExportedFile { path: PathBuf::from("pairs.csv"), rows: 3 }],
        };

        let path = save_summary(&report, dir.path().join("nested/summary.json")).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["pair_count"], 3);
        assert_eq!(value["encoding"], "little-endian");
        assert_eq!(value["outcome"], "exported");
        assert_eq!(value["files"][0]["rows"], 3);
        assert!(value["extraction_timestamp"].is_string());
    }
}
