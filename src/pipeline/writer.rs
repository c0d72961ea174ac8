//! Styled workbook output.
//!
//! Both sheets share the same formatting contract: bold white-on-blue header
//! row with thin borders and centered text, column widths sized to the longest
//! rendered value (capped), and the header row frozen.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::error::MergeResult;
use crate::types::{Frame, Value};

/// Sheet name for the merged data table.
pub const DATA_SHEET_NAME: &str = "Merged_Data";
/// Sheet name for the processing report.
pub const REPORT_SHEET_NAME: &str = "Processing_Metadata";

/// Header fill color.
const HEADER_FILL: u32 = 0x366092;
/// Column width cap, in character widths.
const MAX_COLUMN_WIDTH: usize = 50;
/// Display format for timestamp cells.
const TIMESTAMP_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Write the merged table and the report table into one workbook at `path`.
///
/// Any build or save failure is a hard error for the whole run.
pub fn write_workbook(merged: &Frame, report: &Frame, path: &Path) -> MergeResult<()> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), DATA_SHEET_NAME, merged)?;
    write_sheet(workbook.add_worksheet(), REPORT_SHEET_NAME, report)?;
    workbook.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, name: &str, frame: &Frame) -> MergeResult<()> {
    worksheet.set_name(name)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let timestamp_format = Format::new().set_num_format(TIMESTAMP_NUM_FORMAT);

    let mut widths: Vec<usize> = frame.columns.iter().map(|c| c.chars().count()).collect();

    for (col, column_name) in frame.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column_name, &header_format)?;
    }

    for (row_idx, row) in frame.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let out_col = col_idx as u16;
            match value {
                // Nulls stay blank.
                Value::Null => {}
                Value::Text(s) => {
                    worksheet.write_string(out_row, out_col, s)?;
                }
                Value::Number(n) => {
                    worksheet.write_number(out_row, out_col, *n)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(out_row, out_col, *b)?;
                }
                Value::Timestamp(ts) => {
                    worksheet.write_datetime_with_format(out_row, out_col, ts, &timestamp_format)?;
                }
            }
            widths[col_idx] = widths[col_idx].max(value.render().chars().count());
        }
    }

    for (col_idx, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, (width + 2).min(MAX_COLUMN_WIDTH) as f64)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}
