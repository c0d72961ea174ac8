//! Processing-report construction.

use crate::types::{FileMetadata, Frame, Value, round2};

/// Column headers of the report sheet, in order.
pub const REPORT_COLUMNS: [&str; 8] = [
    "Source_File",
    "File_Size_MB",
    "Sheet_Count",
    "Rows_Processed",
    "Processing_Time_Seconds",
    "Checksum",
    "Errors",
    "Warnings",
];

/// Build the report frame: one row per processed file plus a SUMMARY row.
///
/// Per-file rows use display units (size in MB and duration rounded to 2
/// decimals, error/warning lists joined with "; " or the literal "None").
/// The SUMMARY row sums the numeric fields, except Rows_Processed which is
/// the merged row count — deduplication may have removed rows, so a sum
/// would overstate it.
pub fn build_report(metadata: &[FileMetadata], merged_rows: usize) -> Frame {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(metadata.len() + 1);

    for m in metadata {
        rows.push(vec![
            Value::Text(m.filename.clone()),
            Value::Number(m.file_size_mb()),
            Value::Number(m.sheet_count as f64),
            Value::Number(m.total_rows as f64),
            Value::Number(round2(m.processing_time)),
            Value::Text(m.checksum.clone()),
            Value::Text(join_or_none(&m.errors)),
            Value::Text(join_or_none(&m.warnings)),
        ]);
    }

    let total_bytes: u64 = metadata.iter().map(|m| m.file_size).sum();
    let total_errors: usize = metadata.iter().map(|m| m.errors.len()).sum();
    let total_warnings: usize = metadata.iter().map(|m| m.warnings.len()).sum();
    rows.push(vec![
        Value::Text("SUMMARY".to_string()),
        Value::Number(total_bytes as f64 / 1024.0 / 1024.0),
        Value::Number(metadata.iter().map(|m| m.sheet_count).sum::<usize>() as f64),
        Value::Number(merged_rows as f64),
        Value::Number(metadata.iter().map(|m| m.processing_time).sum::<f64>()),
        Value::Text("N/A".to_string()),
        Value::Text(total_errors.to_string()),
        Value::Text(total_warnings.to_string()),
    ]);

    Frame::new(REPORT_COLUMNS.iter().map(|s| s.to_string()).collect(), rows)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::{REPORT_COLUMNS, build_report};
    use crate::types::{FileMetadata, Value};

    fn meta(filename: &str, rows: usize, errors: Vec<String>) -> FileMetadata {
        FileMetadata {
            filename: filename.to_string(),
            file_size: 1024 * 1024,
            sheet_count: 2,
            total_rows: rows,
            processing_time: 0.125,
            checksum: "abc123".to_string(),
            errors,
            warnings: vec![],
        }
    }

    #[test]
    fn one_row_per_file_plus_summary() {
        let report = build_report(&[meta("a.xlsx", 3, vec![]), meta("b.xlsx", 2, vec![])], 5);
        assert_eq!(report.columns, REPORT_COLUMNS.to_vec());
        assert_eq!(report.row_count(), 3);
        assert_eq!(report.rows[2][0], Value::Text("SUMMARY".into()));
    }

    #[test]
    fn per_file_rows_use_display_units() {
        let report = build_report(&[meta("a.xlsx", 3, vec!["boom".into()])], 3);
        let row = &report.rows[0];
        assert_eq!(row[1], Value::Number(1.0)); // 1 MiB -> 1.00 MB
        assert_eq!(row[4], Value::Number(0.13)); // rounded to 2 decimals
        assert_eq!(row[6], Value::Text("boom".into()));
        assert_eq!(row[7], Value::Text("None".into()));
    }

    #[test]
    fn error_lists_join_with_semicolons() {
        let report = build_report(
            &[meta("a.xlsx", 1, vec!["first".into(), "second".into()])],
            1,
        );
        assert_eq!(report.rows[0][6], Value::Text("first; second".into()));
    }

    #[test]
    fn summary_sums_fields_but_takes_merged_row_count() {
        let report = build_report(
            &[meta("a.xlsx", 3, vec!["x".into()]), meta("b.xlsx", 3, vec![])],
            4, // two duplicate rows collapsed
        );
        let summary = &report.rows[2];
        assert_eq!(summary[2], Value::Number(4.0)); // sheet count sum
        assert_eq!(summary[3], Value::Number(4.0)); // merged rows, not 6
        assert_eq!(summary[5], Value::Text("N/A".into()));
        assert_eq!(summary[6], Value::Text("1".into()));
    }
}
