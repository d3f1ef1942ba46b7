// src/storage/mod.rs
pub mod csv_writer;
pub mod summary;

pub use csv_writer::{CsvExporter, ExportedFile};
pub use summary::save_summary;
