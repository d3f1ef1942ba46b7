// src/storage/csv_writer.rs
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::pairs::Pair;
use crate::utils::error::ExportError;

const HEADER_ROW: &str = "Alias,\"Item Name\"\n";
const SPLIT_SUFFIX: &str = "_part2";

/// A CSV file written during one run and how many data rows it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes `alias,"item name"` rows, moving to a second file the first time
/// the split alias shows up.
pub struct CsvExporter {
    primary_path: PathBuf,
    split_alias: Option<String>,
    write_header: bool,
    writer: BufWriter<File>,
    current: ExportedFile,
    finished: Vec<ExportedFile>,
}

impl CsvExporter {
    /// Creates (truncating) the primary output file.
    pub fn create<P: AsRef<Path>>(
        path: P,
        split_alias: Option<String>,
        write_header: bool,
    ) -> Result<Self, ExportError> {
        let primary_path = path.as_ref().to_path_buf();
        let writer = open_writer(&primary_path, write_header)?;

        Ok(Self {
            current: ExportedFile { path: primary_path.clone(), rows: 0 },
            primary_path,
            split_alias: split_alias.filter(|alias| !alias.is_empty()),
            write_header,
            writer,
            finished: Vec::new(),
        })
    }

    /// Path of the file rows are redirected to in split mode.
    pub fn split_path(path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}{}.csv", stem, SPLIT_SUFFIX))
    }

    fn has_split(&self) -> bool {
        !self.finished.is_empty()
    }

    pub fn write_pair(&mut self, pair: &Pair) -> Result<(), ExportError> {
        if !self.has_split() && self.split_alias.as_deref() == Some(pair.alias.as_str()) {
            self.start_second_file()?;
        }

        let row = format_row(&pair.alias, &pair.item_name);
        self.writer
            .write_all(row.as_bytes())
            .map_err(|e| io_error(&self.current.path, e))?;
        self.current.rows += 1;
        Ok(())
    }

    fn start_second_file(&mut self) -> Result<(), ExportError> {
        let next_path = Self::split_path(&self.primary_path);
        let next_writer = open_writer(&next_path, self.write_header)?;

        let mut previous = std::mem::replace(&mut self.writer, next_writer);
        previous
            .flush()
            .map_err(|e| io_error(&self.current.path, e))?;

        let done = std::mem::replace(
            &mut self.current,
            ExportedFile { path: next_path, rows: 0 },
        );
        tracing::info!(
            "Split alias reached after {} rows, continuing in {}",
            done.rows,
            self.current.path.display()
        );
        self.finished.push(done);
        Ok(())
    }

    /// Flushes the active file and returns every file written, in order.
    pub fn finish(mut self) -> Result<Vec<ExportedFile>, ExportError> {
        self.writer
            .flush()
            .map_err(|e| io_error(&self.current.path, e))?;
        self.finished.push(self.current);
        Ok(self.finished)
    }
}

fn open_writer(path: &Path, write_header: bool) -> Result<BufWriter<File>, ExportError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    if write_header {
        writer
            .write_all(HEADER_ROW.as_bytes())
            .map_err(|e| io_error(path, e))?;
    }
    tracing::debug!("Opened CSV output {}", path.display());
    Ok(writer)
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Formats one row. The item name is always quoted; the alias only when it
/// holds a delimiter, quote or line break. Embedded quotes are doubled.
pub fn format_row(alias: &str, item_name: &str) -> String {
    let alias = if alias.contains([',', '"', '\r', '\n']) {
        Cow::Owned(quote(alias))
    } else {
        Cow::Borrowed(alias)
    };
    format!("{},{}\n", alias, quote(item_name))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
