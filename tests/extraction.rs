use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use excel_merger::MergeError;
use excel_merger::pipeline::extract::extract_file;
use excel_merger::types::Value;
use rust_xlsxwriter::Workbook;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("excel-merger-{name}-{nanos}.xlsx"))
}

#[test]
fn extraction_appends_provenance_columns() {
    let path = tmp_file("provenance");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sales").unwrap();
    ws.write_string(0, 0, "Region").unwrap();
    ws.write_string(1, 0, "North").unwrap();
    wb.save(&path).unwrap();

    let (frames, metadata) = extract_file(&path, None).unwrap();
    assert_eq!(frames.len(), 1);

    let frame = &frames[0];
    assert_eq!(
        frame.columns,
        vec![
            "region",
            "_source_file",
            "_source_sheet",
            "_processed_timestamp"
        ]
    );
    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(frame.rows[0][1], Value::Text(filename));
    assert_eq!(frame.rows[0][2], Value::Text("Sales".to_string()));
    assert!(matches!(frame.rows[0][3], Value::Timestamp(_)));
    assert_eq!(metadata.total_rows, 1);
    assert_eq!(metadata.sheet_count, 1);

    let _ = fs::remove_file(&path);
}

#[test]
fn extraction_drops_empty_rows_and_columns() {
    let path = tmp_file("cleaning");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    ws.write_string(0, 0, "a").unwrap();
    ws.write_string(0, 1, "b").unwrap();
    ws.write_string(0, 2, "c").unwrap();
    // Row 1 and 3 carry data; row 2 is entirely empty. Column b is never
    // written below the header, so it is fully null.
    ws.write_number(1, 0, 1.0).unwrap();
    ws.write_number(1, 2, 10.0).unwrap();
    ws.write_number(3, 0, 2.0).unwrap();
    ws.write_number(3, 2, 20.0).unwrap();
    wb.save(&path).unwrap();

    let (frames, metadata) = extract_file(&path, None).unwrap();
    let frame = &frames[0];
    assert_eq!(
        frame.columns,
        vec!["a", "c", "_source_file", "_source_sheet", "_processed_timestamp"]
    );
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.rows[0][0], Value::Number(1.0));
    assert_eq!(frame.rows[1][1], Value::Number(20.0));
    assert_eq!(metadata.total_rows, 2);

    let _ = fs::remove_file(&path);
}

#[test]
fn extraction_standardizes_headers_and_resolves_collisions() {
    let path = tmp_file("headers");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    ws.write_string(0, 0, "First Name").unwrap();
    ws.write_string(0, 1, "first name").unwrap();
    ws.write_string(0, 2, "Revenue ($)").unwrap();
    ws.write_string(1, 0, "Ada").unwrap();
    ws.write_string(1, 1, "Lovelace").unwrap();
    ws.write_number(1, 2, 100.0).unwrap();
    wb.save(&path).unwrap();

    let (frames, _) = extract_file(&path, None).unwrap();
    assert_eq!(
        frames[0].columns[..3],
        ["first_name", "first_name_1", "revenue"]
    );

    let _ = fs::remove_file(&path);
}

#[test]
fn extraction_records_warnings_for_empty_sheets() {
    let path = tmp_file("empty-sheets");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("HeaderOnly").unwrap();
    ws.write_string(0, 0, "id").unwrap();
    let ws = wb.add_worksheet();
    ws.set_name("Data").unwrap();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_number(1, 0, 1.0).unwrap();
    wb.save(&path).unwrap();

    let (frames, metadata) = extract_file(&path, None).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(metadata.sheet_count, 2);
    assert_eq!(metadata.total_rows, 1);
    assert_eq!(metadata.warnings.len(), 1);
    assert!(
        metadata.warnings[0].contains("Sheet 'HeaderOnly' is empty and will be skipped"),
        "warnings: {:?}",
        metadata.warnings
    );

    let _ = fs::remove_file(&path);
}

#[test]
fn extraction_computes_a_hex_checksum() {
    let path = tmp_file("checksum");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "x").unwrap();
    ws.write_number(1, 0, 1.0).unwrap();
    wb.save(&path).unwrap();

    let (_, metadata) = extract_file(&path, None).unwrap();
    assert_eq!(metadata.checksum.len(), 64);
    assert!(metadata.checksum.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(metadata.file_size > 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn unreadable_workbook_is_fatal_for_that_file() {
    let path = tmp_file("corrupt");
    fs::write(&path, "this is not a zip container").unwrap();

    let err = extract_file(&path, None).unwrap_err();
    assert!(matches!(err, MergeError::FileOpen { .. }));
    assert!(err.to_string().starts_with("Error reading file"));

    let _ = fs::remove_file(&path);
}
