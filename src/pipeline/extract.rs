//! Per-file sheet extraction and cleaning.
//!
//! Behavior:
//!
//! - Opens one validated workbook; an open failure is fatal for that file only
//!   and surfaces as [`MergeError::FileOpen`].
//! - Iterates sheets in file order, reading each as a rectangular grid with
//!   the first row as header.
//! - Sheets that are empty, or become empty after dropping fully-empty rows
//!   and columns, are skipped with a warning.
//! - A per-sheet read failure is recorded as an error string and that sheet is
//!   skipped; extraction continues with the remaining sheets.
//! - Surviving sheets get standardized column names plus the three provenance
//!   columns appended.

use std::path::Path;
use std::time::Instant;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Local, NaiveDateTime};

use crate::error::{MergeError, MergeResult};
use crate::pipeline::observability::{MergeEvent, MergeObserver, emit};
use crate::pipeline::standardize::{resolve_collisions, standardize_column_name};
use crate::pipeline::validate::file_checksum;
use crate::types::{FileMetadata, Frame, PROVENANCE_COLUMNS, Value};

/// Extract all usable sheets from one validated file.
///
/// Returns the cleaned frames in sheet order (possibly empty) plus the file's
/// metadata record. Soft per-sheet problems land in the metadata's error and
/// warning lists; only a failure to open the workbook at all is an `Err`.
pub fn extract_file(
    path: &Path,
    observer: Option<&dyn MergeObserver>,
) -> MergeResult<(Vec<Frame>, FileMetadata)> {
    let started = Instant::now();
    let filename = display_name(path);

    let file_size = std::fs::metadata(path)?.len();
    let checksum = match file_checksum(path) {
        Ok(hash) => hash,
        Err(e) => {
            emit(
                observer,
                MergeEvent::ChecksumFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                },
            );
            String::new()
        }
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| MergeError::FileOpen {
        filename: filename.clone(),
        message: e.to_string(),
    })?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut total_rows = 0usize;

    for sheet in &sheet_names {
        let range = match workbook.worksheet_range(sheet) {
            Ok(range) => range,
            Err(e) => {
                let message = format!("Error processing sheet '{sheet}': {e}");
                emit(
                    observer,
                    MergeEvent::SheetFailed {
                        filename: filename.clone(),
                        sheet: sheet.clone(),
                        error: message.clone(),
                    },
                );
                errors.push(message);
                continue;
            }
        };

        match clean_sheet(&range) {
            SheetOutcome::Empty => {
                let message = format!("Sheet '{sheet}' is empty and will be skipped");
                emit(
                    observer,
                    MergeEvent::SheetSkipped {
                        filename: filename.clone(),
                        sheet: sheet.clone(),
                        reason: message.clone(),
                    },
                );
                warnings.push(message);
            }
            SheetOutcome::EmptyAfterCleaning => {
                let message = format!("Sheet '{sheet}' contains no data after cleaning");
                emit(
                    observer,
                    MergeEvent::SheetSkipped {
                        filename: filename.clone(),
                        sheet: sheet.clone(),
                        reason: message.clone(),
                    },
                );
                warnings.push(message);
            }
            SheetOutcome::Data { mut columns, mut rows } => {
                resolve_collisions(&mut columns);
                append_provenance(&mut columns, &mut rows, &filename, sheet);

                total_rows += rows.len();
                emit(
                    observer,
                    MergeEvent::SheetProcessed {
                        filename: filename.clone(),
                        sheet: sheet.clone(),
                        rows: rows.len(),
                    },
                );
                frames.push(Frame::new(columns, rows));
            }
        }
    }

    let metadata = FileMetadata {
        filename: filename.clone(),
        file_size,
        sheet_count: sheet_names.len(),
        total_rows,
        processing_time: started.elapsed().as_secs_f64(),
        checksum,
        errors,
        warnings,
    };

    emit(
        observer,
        MergeEvent::FileProcessed {
            filename,
            sheets: metadata.sheet_count,
            rows: total_rows,
        },
    );

    Ok((frames, metadata))
}

enum SheetOutcome {
    /// No data rows below the header at all.
    Empty,
    /// Every data row was fully null.
    EmptyAfterCleaning,
    /// Standardized columns plus surviving rows, provenance not yet appended.
    Data {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
}

/// Read a sheet range into a cleaned column/row shape.
///
/// Row 0 is the header; fully-null data rows and fully-null columns are
/// dropped before the header names are standardized.
fn clean_sheet(range: &Range<Data>) -> SheetOutcome {
    if range.height() <= 1 || range.width() == 0 {
        return SheetOutcome::Empty;
    }

    let grid: Vec<&[Data]> = range.rows().collect();
    let headers: Vec<Option<String>> = grid[0].iter().map(header_cell_to_string).collect();
    let mut data_rows: Vec<Vec<Value>> = grid[1..]
        .iter()
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    data_rows.retain(|row| row.iter().any(|v| !v.is_null()));
    if data_rows.is_empty() {
        return SheetOutcome::EmptyAfterCleaning;
    }

    // Keep only columns with at least one non-null data cell; the header name
    // alone does not keep a column alive.
    let keep: Vec<usize> = (0..headers.len())
        .filter(|&col| data_rows.iter().any(|row| !row[col].is_null()))
        .collect();

    let columns: Vec<String> = keep
        .iter()
        .map(|&col| standardize_column_name(headers[col].as_deref()))
        .collect();
    let rows: Vec<Vec<Value>> = data_rows
        .into_iter()
        .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
        .collect();

    SheetOutcome::Data { columns, rows }
}

fn append_provenance(
    columns: &mut Vec<String>,
    rows: &mut [Vec<Value>],
    filename: &str,
    sheet: &str,
) {
    let stamp = Local::now().naive_local();
    columns.extend(PROVENANCE_COLUMNS.iter().map(|s| s.to_string()));
    for row in rows.iter_mut() {
        row.push(Value::Text(filename.to_string()));
        row.push(Value::Text(sheet.to_string()));
        row.push(Value::Timestamp(stamp));
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn header_cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(format!("{e:?}")),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Value::Timestamp)
            .unwrap_or(Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(e) => Value::Text(format!("{e:?}")),
    }
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
