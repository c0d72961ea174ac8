//! Run orchestration.
//!
//! [`ExcelMerger`] sequences the pipeline stages over one file list and always
//! hands back a [`RunResult`] — hard failures are converted at this boundary,
//! never propagated to the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;

use crate::error::{MergeError, MergeResult};
use crate::pipeline::observability::{MergeEvent, MergeObserver, emit};
use crate::pipeline::{extract, merge, report, validate, writer};
use crate::types::{FileMetadata, RunResult};

/// Largest accepted input file, in bytes (50 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;
/// Largest accepted input file list.
pub const MAX_FILES: usize = 20;
/// Accepted input extensions, lowercase, without the dot.
pub const VALID_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Merges multiple Excel files into one consolidated workbook.
///
/// Each call to [`ExcelMerger::merge_files`] is an independent run with its
/// own accumulators; the struct itself is just configuration and can be
/// reused or shared freely.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use excel_merger::ExcelMerger;
///
/// let merger = ExcelMerger::new().with_output_dir("./out");
/// let result = merger.merge_files(&[
///     PathBuf::from("q1.xlsx"),
///     PathBuf::from("q2.xlsx"),
/// ]);
/// if result.success {
///     println!("merged {} rows -> {:?}", result.total_rows, result.output_path);
/// } else {
///     eprintln!("merge failed: {:?}", result.errors);
/// }
/// ```
pub struct ExcelMerger {
    output_dir: PathBuf,
    observer: Option<Arc<dyn MergeObserver>>,
}

impl ExcelMerger {
    /// Create a merger writing into the system temp directory.
    pub fn new() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
            observer: None,
        }
    }

    /// Set the directory the output workbook is written into.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Attach an observer receiving this merger's pipeline events.
    pub fn with_observer(mut self, observer: Arc<dyn MergeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Merge `file_paths` into one output workbook.
    ///
    /// Always returns a [`RunResult`]; this function neither panics on bad
    /// input nor returns an `Err`. Invalid or missing files are excluded with
    /// error strings while the run continues; an empty list, too many files,
    /// zero valid files, zero extracted frames, or a write failure fail the
    /// whole run.
    pub fn merge_files(&self, file_paths: &[PathBuf]) -> RunResult {
        let started = Instant::now();
        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut metadata: Vec<FileMetadata> = Vec::new();

        emit(
            self.observer(),
            MergeEvent::RunStarted {
                file_count: file_paths.len(),
            },
        );

        let outcome = self.run(file_paths, &mut errors, &mut warnings, &mut metadata);
        let processing_time = started.elapsed().as_secs_f64();

        let result = match outcome {
            Ok((output_path, total_rows, total_columns)) => RunResult {
                success: true,
                output_path: Some(output_path),
                metadata,
                total_rows,
                total_columns,
                processing_time,
                errors,
                warnings,
            },
            Err(e) => {
                errors.push(e.to_string());
                RunResult {
                    success: false,
                    output_path: None,
                    metadata,
                    total_rows: 0,
                    total_columns: 0,
                    processing_time,
                    errors,
                    warnings,
                }
            }
        };

        emit(
            self.observer(),
            MergeEvent::RunFinished {
                success: result.success,
                elapsed_secs: processing_time,
            },
        );
        result
    }

    fn run(
        &self,
        file_paths: &[PathBuf],
        errors: &mut Vec<String>,
        warnings: &mut Vec<String>,
        metadata: &mut Vec<FileMetadata>,
    ) -> MergeResult<(PathBuf, usize, usize)> {
        if file_paths.is_empty() {
            return Err(MergeError::NoInputFiles);
        }
        if file_paths.len() > MAX_FILES {
            return Err(MergeError::TooManyFiles { max: MAX_FILES });
        }

        let mut valid_files: Vec<&PathBuf> = Vec::new();
        for path in file_paths {
            if !path.exists() {
                let reason = format!("File not found: {}", path.display());
                emit(
                    self.observer(),
                    MergeEvent::FileRejected {
                        path: path.clone(),
                        reason: reason.clone(),
                    },
                );
                errors.push(reason);
                continue;
            }

            let (is_valid, file_errors) = validate::validate_file(path);
            if !is_valid {
                let filename = display_name(path);
                for error in file_errors {
                    let reason = format!("{filename}: {error}");
                    emit(
                        self.observer(),
                        MergeEvent::FileRejected {
                            path: path.clone(),
                            reason: reason.clone(),
                        },
                    );
                    errors.push(reason);
                }
                continue;
            }

            valid_files.push(path);
        }
        if valid_files.is_empty() {
            return Err(MergeError::NoValidFiles);
        }

        let mut frames = Vec::new();
        for path in valid_files {
            match extract::extract_file(path, self.observer()) {
                Ok((file_frames, file_metadata)) => {
                    errors.extend(file_metadata.errors.iter().cloned());
                    warnings.extend(file_metadata.warnings.iter().cloned());
                    frames.extend(file_frames);
                    metadata.push(file_metadata);
                }
                Err(e) => {
                    // Fatal for this file only; the run continues.
                    let message = e.to_string();
                    emit(
                        self.observer(),
                        MergeEvent::FileFailed {
                            filename: display_name(path),
                            error: message.clone(),
                        },
                    );
                    errors.push(message);
                }
            }
        }
        if frames.is_empty() {
            return Err(MergeError::NoDataExtracted);
        }

        let merged = merge::merge_frames(&frames)?;
        emit(
            self.observer(),
            MergeEvent::MergeCompleted {
                frames: frames.len(),
                rows: merged.row_count(),
            },
        );

        let report = report::build_report(metadata, merged.row_count());

        let output_path = self.output_path();
        writer::write_workbook(&merged, &report, &output_path)?;
        emit(
            self.observer(),
            MergeEvent::OutputWritten {
                path: output_path.clone(),
            },
        );

        Ok((output_path, merged.row_count(), merged.column_count()))
    }

    fn output_path(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        self.output_dir
            .join(format!("merged_excel_files_{timestamp}.xlsx"))
    }

    fn observer(&self) -> Option<&dyn MergeObserver> {
        self.observer.as_deref()
    }
}

impl Default for ExcelMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
