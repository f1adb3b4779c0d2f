// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::attributes::{ExtractedRecord, SUMMARY_COLUMNS};
use crate::utils::error::StorageError;
use rust_xlsxwriter::{Format, Workbook};

pub const SUMMARY_FILE_NAME: &str = "summary_output.xlsx";
pub const SUMMARY_METADATA_FILE_NAME: &str = "summary_output_meta.json";
pub const SUMMARY_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const SUMMARY_SHEET_NAME: &str = "Summary";
// Excel rejects longer cell strings
const MAX_CELL_CHARS: usize = 32_767;

/// Describes the run that produced a summary, saved next to the spreadsheet.
pub struct SummaryMetadata<'a> {
    pub source_file: &'a str,
    pub format: &'a str,
    pub lines_scanned: usize,
    pub tagger: &'a str,
}

/// Cuts `cell` to Excel's per-cell limit on a character boundary.
fn fit_cell<'a>(cell: &'a str, row: u32, column: &str) -> &'a str {
    match cell.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_idx, _)) => {
            tracing::warn!(
                "Row {} column '{}' has {} characters, truncating to {} for the spreadsheet",
                row,
                column,
                cell.chars().count(),
                MAX_CELL_CHARS
            );
            &cell[..byte_idx]
        }
        None => cell,
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?; // Use map_err for cleaner conversion
        }

        Ok(Self { base_dir: base_path })
    }

    /// Builds the summary workbook in memory: a bold header row, then one row per record.
    /// No index column.
    pub fn summary_bytes(records: &[ExtractedRecord]) -> Result<Vec<u8>, StorageError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SUMMARY_SHEET_NAME)?;

        for (col, name) in SUMMARY_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, cell) in record.cells().iter().enumerate() {
                worksheet.write_string(row, col as u16, fit_cell(cell, row, SUMMARY_COLUMNS[col]))?;
            }
        }

        let bytes = workbook.save_to_buffer()?;
        Ok(bytes)
    }

    /// Saves the summary spreadsheet to `<base_dir>/summary_output.xlsx`
    pub fn save_summary(&self, records: &[ExtractedRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(SUMMARY_FILE_NAME);
        let bytes = Self::summary_bytes(records)?;

        fs::write(&file_path, bytes)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} rows ({}) to {}", records.len(), SUMMARY_MIME_TYPE, file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about the run in JSON format
    pub fn save_summary_metadata(
        &self,
        records: &[ExtractedRecord],
        meta: &SummaryMetadata,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(SUMMARY_METADATA_FILE_NAME);

        // Create metadata structure
        let metadata = serde_json::json!({
            "source_file": meta.source_file,
            "format": meta.format,
            "lines_scanned": meta.lines_scanned,
            "record_count": records.len(),
            "columns": SUMMARY_COLUMNS,
            "tagger": meta.tagger,
            "summary_file": SUMMARY_FILE_NAME,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
            "records": records,
        });

        // Write the metadata to the file
        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
