//! Core data model types for the merge pipeline.
//!
//! Source sheets carry no declared column types, so cells are represented as
//! a closed [`Value`] variant rather than a stringly-typed scalar. Cleaned
//! sheets and the merged output are both [`Frame`]s; per-file bookkeeping is a
//! [`FileMetadata`]; the terminal artifact handed back to the caller is a
//! [`RunResult`].

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Provenance column recording the originating file name.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";
/// Provenance column recording the originating sheet name.
pub const SOURCE_SHEET_COLUMN: &str = "_source_sheet";
/// Provenance column recording when the sheet was processed.
pub const PROCESSED_TIMESTAMP_COLUMN: &str = "_processed_timestamp";

/// The three synthetic columns appended to every cleaned frame, in order.
pub const PROVENANCE_COLUMNS: [&str; 3] = [
    SOURCE_FILE_COLUMN,
    SOURCE_SHEET_COLUMN,
    PROCESSED_TIMESTAMP_COLUMN,
];

/// Returns true for synthetic provenance columns.
///
/// Standardized data-column names never keep a leading underscore, so the
/// prefix alone is a reliable discriminator.
pub fn is_provenance_column(name: &str) -> bool {
    name.starts_with('_')
}

/// A single dynamically typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// Numeric cell. Integer and float cells both land here.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Text cell.
    Text(String),
    /// Date/time cell.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Whether this cell is the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Rendered display form, as it would appear in a spreadsheet cell.
    ///
    /// Nulls render empty. Used for column-width sizing and ordering
    /// fallbacks, not for equality.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// In-memory rectangular table: ordered column names plus row-major cells.
///
/// Every row has exactly `columns.len()` cells. Cleaned per-sheet frames and
/// the merged output share this representation; cleaned frames additionally
/// carry the [`PROVENANCE_COLUMNS`] appended after their data columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Ordered, unique column names.
    pub columns: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Create a frame from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, provenance included.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the non-provenance column names in order.
    pub fn data_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_provenance_column(c))
    }
}

/// Metadata for one processed input file.
///
/// Created at extraction time and immutable afterwards; aggregated into the
/// processing report and surfaced on [`RunResult::metadata`].
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    /// Input file name (no directory).
    pub filename: String,
    /// Input size in bytes.
    pub file_size: u64,
    /// Number of sheets in the workbook, including skipped ones.
    pub sheet_count: usize,
    /// Data rows this file contributed after cleaning.
    pub total_rows: usize,
    /// Extraction duration in seconds.
    pub processing_time: f64,
    /// Hex content checksum; empty when hashing failed.
    pub checksum: String,
    /// Soft errors hit while processing this file.
    pub errors: Vec<String>,
    /// Warnings hit while processing this file.
    pub warnings: Vec<String>,
}

impl FileMetadata {
    /// File size in megabytes, rounded to 2 decimals.
    pub fn file_size_mb(&self) -> f64 {
        round2(self.file_size as f64 / 1024.0 / 1024.0)
    }
}

/// Result of one merge run.
///
/// Always returned, never raised past the orchestrator: fully populated on
/// success, or zero counts with a non-empty error list on failure.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Whether the run produced an output workbook.
    pub success: bool,
    /// Output workbook location; absent on failure.
    pub output_path: Option<PathBuf>,
    /// Per-file metadata, in processing order.
    pub metadata: Vec<FileMetadata>,
    /// Merged row count (0 on failure).
    pub total_rows: usize,
    /// Merged column count including provenance columns (0 on failure).
    pub total_columns: usize,
    /// Whole-run duration in seconds.
    pub processing_time: f64,
    /// Accumulated error strings, hard and soft.
    pub errors: Vec<String>,
    /// Accumulated warning strings.
    pub warnings: Vec<String>,
}

/// Round to 2 decimal places for display units.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
