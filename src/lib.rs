//! `excel-merger` consolidates multiple Excel workbooks (each with possibly
//! multiple sheets) into a single unified dataset plus a processing report,
//! written out as one styled `.xlsx` workbook.
//!
//! The primary entrypoint is [`merger::ExcelMerger`], which runs the whole
//! pipeline over a list of file paths and always returns a
//! [`types::RunResult`] — it never raises to the caller.
//!
//! ## What a run does
//!
//! 1. validates each input (extension, 50 MB size cap, readable container)
//! 2. extracts and cleans every sheet of every valid file, dropping
//!    fully-empty rows/columns and recording per-file metadata
//! 3. standardizes column names (`"First Name"` → `first_name`) and resolves
//!    collisions with `_1`, `_2`, ... suffixes
//! 4. concatenates all sheets over the column union, removes duplicate data
//!    rows, and orders the result deterministically by source file and sheet
//! 5. writes a `Merged_Data` sheet and a `Processing_Metadata` report sheet
//!    with styled, frozen headers and auto-sized columns
//!
//! Every merged row carries three provenance columns (`_source_file`,
//! `_source_sheet`, `_processed_timestamp`); duplicate detection ignores
//! them.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use excel_merger::ExcelMerger;
//!
//! let result = ExcelMerger::new()
//!     .with_output_dir("./reports")
//!     .merge_files(&[PathBuf::from("north.xlsx"), PathBuf::from("south.xls")]);
//!
//! assert!(result.success);
//! println!(
//!     "{} rows x {} columns -> {}",
//!     result.total_rows,
//!     result.total_columns,
//!     result.output_path.unwrap().display()
//! );
//! ```
//!
//! ## Observability
//!
//! There is no global logger: each run reports structured
//! [`pipeline::MergeEvent`]s to an optional, injected
//! [`pipeline::MergeObserver`], so concurrent runs in one process never share
//! handler state.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use excel_merger::ExcelMerger;
//! use excel_merger::pipeline::StdErrObserver;
//!
//! let merger = ExcelMerger::new().with_observer(Arc::new(StdErrObserver));
//! let _ = merger.merge_files(&[PathBuf::from("data.xlsx")]);
//! ```
//!
//! ## Modules
//!
//! - [`merger`]: the orchestrator and its fixed limits
//! - [`pipeline`]: the individual pipeline stages and observer sinks
//! - [`types`]: cell/frame/metadata/result types
//! - [`error`]: error types used across the pipeline

pub mod error;
pub mod merger;
pub mod pipeline;
pub mod types;

pub use error::{MergeError, MergeResult};
pub use merger::ExcelMerger;
pub use types::{FileMetadata, Frame, RunResult, Value};
