//! The merge pipeline, stage by stage.
//!
//! Stages run strictly in sequence for each run:
//!
//! - [`validate`]: per-file format/size/readability checks plus checksumming
//! - [`extract`]: per-file sheet extraction and cleaning
//! - [`standardize`]: canonical column naming and collision resolution
//! - [`merge`]: concatenation, deduplication, deterministic ordering
//! - [`report`]: per-file metadata aggregation into the report table
//! - [`writer`]: styled workbook output
//! - [`observability`]: injectable event sinks used across all stages
//!
//! Most callers drive the whole pipeline through
//! [`crate::merger::ExcelMerger`] rather than the stages directly.

pub mod extract;
pub mod merge;
pub mod observability;
pub mod report;
pub mod standardize;
pub mod validate;
pub mod writer;

pub use observability::{
    CompositeObserver, FileObserver, MergeEvent, MergeObserver, MergeSeverity, StdErrObserver,
};
