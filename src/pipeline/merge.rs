//! Frame concatenation, deduplication, and deterministic ordering.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::error::{MergeError, MergeResult};
use crate::types::{Frame, PROVENANCE_COLUMNS, Value};

/// Merge all cleaned frames into one consolidated frame.
///
/// Algorithm:
///
/// 1. concatenate over the column union — data columns in first-encountered
///    order, provenance columns last; cells absent in a frame are null-filled
/// 2. drop duplicate rows comparing only data columns, keeping the first
///    occurrence in concatenation order
/// 3. stable-sort by (`_source_file`, `_source_sheet`) ascending, nulls last
///
/// Fails with [`MergeError::EmptyMerge`] when `frames` is empty. Given the
/// same frames in the same order the output is bit-identical.
pub fn merge_frames(frames: &[Frame]) -> MergeResult<Frame> {
    if frames.is_empty() {
        return Err(MergeError::EmptyMerge);
    }

    let columns = column_union(frames);
    let data_len = columns.len() - PROVENANCE_COLUMNS.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for frame in frames {
        let projection: Vec<Option<usize>> = columns
            .iter()
            .map(|name| frame.column_index(name))
            .collect();
        for row in &frame.rows {
            rows.push(
                projection
                    .iter()
                    .map(|idx| match idx {
                        Some(i) => row[*i].clone(),
                        None => Value::Null,
                    })
                    .collect(),
            );
        }
    }

    let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
    rows.retain(|row| seen.insert(row_key(&row[..data_len])));

    // Provenance columns sit at the tail of the union in PROVENANCE_COLUMNS
    // order, so file/sheet are the first two past the data columns.
    let file_idx = data_len;
    let sheet_idx = data_len + 1;
    rows.sort_by(|a, b| {
        cmp_nulls_last(&a[file_idx], &b[file_idx])
            .then_with(|| cmp_nulls_last(&a[sheet_idx], &b[sheet_idx]))
    });

    Ok(Frame::new(columns, rows))
}

/// Union of all frame columns: data columns in first-encountered order,
/// provenance columns appended last.
fn column_union(frames: &[Frame]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for frame in frames {
        for name in frame.data_columns() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns.extend(PROVENANCE_COLUMNS.iter().map(|s| s.to_string()));
    columns
}

/// Hashable identity of one cell for duplicate detection.
///
/// Type-tagged so `Text("1")` and `Number(1.0)` never compare equal; floats
/// compare by bit pattern.
#[derive(PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Number(u64),
    Bool(bool),
    Text(String),
    Timestamp(NaiveDateTime),
}

fn row_key(values: &[Value]) -> Vec<CellKey> {
    values
        .iter()
        .map(|v| match v {
            Value::Null => CellKey::Null,
            Value::Number(n) => CellKey::Number(n.to_bits()),
            Value::Bool(b) => CellKey::Bool(*b),
            Value::Text(s) => CellKey::Text(s.clone()),
            Value::Timestamp(ts) => CellKey::Timestamp(*ts),
        })
        .collect()
}

fn cmp_nulls_last(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (a, b) => a.render().cmp(&b.render()),
    }
}
