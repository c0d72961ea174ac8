use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Error type returned by the merge pipeline.
///
/// Every hard-failure kind a run can hit is enumerated here; the orchestrator
/// converts any of these into a failed [`crate::types::RunResult`] rather than
/// letting them escape to the caller. Soft per-file and per-sheet problems are
/// accumulated as plain strings instead (see [`crate::types::FileMetadata`]).
#[derive(Debug, Error)]
pub enum MergeError {
    /// Underlying I/O error (e.g. permission denied while writing output).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet container could not be read.
    #[error("spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Output workbook could not be built or saved.
    #[error("workbook write error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// A validated file failed to open during extraction. Fatal for that file
    /// only; the run continues with the remaining files.
    #[error("Error reading file '{filename}': {message}")]
    FileOpen { filename: String, message: String },

    /// The input file list was empty.
    #[error("No files provided for merging")]
    NoInputFiles,

    /// The input file list exceeded the fixed maximum.
    #[error("Too many files provided. Maximum allowed: {max}")]
    TooManyFiles { max: usize },

    /// Every input file was rejected by validation.
    #[error("No valid Excel files found")]
    NoValidFiles,

    /// Extraction produced no usable frames across all valid files.
    #[error("No valid data found in any of the provided files")]
    NoDataExtracted,

    /// The merge engine was handed an empty frame list.
    #[error("No valid data found to merge")]
    EmptyMerge,
}
