//! Input validation and content checksumming.
//!
//! Validation is a read-only probe: extension, size cap, then a trial open of
//! the spreadsheet container. Checks short-circuit on the first failure so the
//! caller gets exactly one rejection reason per file.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use sha2::{Digest, Sha256};

use crate::merger::{MAX_FILE_SIZE_BYTES, VALID_EXTENSIONS};

/// Read size for the streaming checksum.
const CHECKSUM_CHUNK_SIZE: usize = 4096;

/// Validate one input file.
///
/// Checks, in order, short-circuiting on first failure:
///
/// 1. extension is one of [`VALID_EXTENSIONS`]
/// 2. size is at most [`MAX_FILE_SIZE_BYTES`]
/// 3. the file opens as a spreadsheet container and exposes at least one sheet
///
/// Returns a validity flag plus zero or more human-readable error strings.
pub fn validate_file(path: &Path) -> (bool, Vec<String>) {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !VALID_EXTENSIONS.contains(&ext.as_str()) {
        return (
            false,
            vec![format!(
                "Invalid file extension: '.{ext}'. Expected: .xlsx, .xls"
            )],
        );
    }

    let file_size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => return (false, vec![format!("Invalid Excel file or corrupted: {e}")]),
    };
    if file_size > MAX_FILE_SIZE_BYTES {
        return (
            false,
            vec![format!(
                "File size ({:.2}MB) exceeds maximum allowed size ({}MB)",
                file_size as f64 / 1024.0 / 1024.0,
                MAX_FILE_SIZE_BYTES / 1024 / 1024
            )],
        );
    }

    match open_workbook_auto(path) {
        Ok(workbook) => {
            if workbook.sheet_names().is_empty() {
                return (false, vec!["File contains no sheets".to_string()]);
            }
        }
        Err(e) => return (false, vec![format!("Invalid Excel file or corrupted: {e}")]),
    }

    (true, Vec::new())
}

/// Streaming Sha256 over the file's contents, read in fixed-size chunks.
///
/// The checksum exists purely for auditability in the processing report; a
/// failure here is non-fatal and the caller degrades it to an empty string.
pub fn file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHECKSUM_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
