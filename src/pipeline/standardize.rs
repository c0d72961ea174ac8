//! Column-name standardization and collision resolution.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::is_provenance_column;

/// Fallback name for missing or fully-stripped column names.
pub const UNNAMED_COLUMN: &str = "unnamed_column";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]").expect("static pattern"));
static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("static pattern"));

/// Map a raw header cell to its canonical column name.
///
/// Rules, applied in order:
///
/// - missing or blank input maps to [`UNNAMED_COLUMN`]
/// - surrounding whitespace is stripped
/// - characters outside `[A-Za-z0-9\s]` become underscores
/// - runs of whitespace/underscores collapse to a single underscore
/// - lowercased, leading/trailing underscores stripped
/// - an empty result falls back to [`UNNAMED_COLUMN`]
///
/// The mapping is idempotent: a name that is already canonical comes back
/// unchanged.
pub fn standardize_column_name(raw: Option<&str>) -> String {
    let name = raw.map(str::trim).unwrap_or("");
    if name.is_empty() {
        return UNNAMED_COLUMN.to_string();
    }

    let name = NON_ALPHANUMERIC.replace_all(name, "_");
    let name = SEPARATOR_RUNS.replace_all(&name, "_");
    let name = name.to_lowercase();
    let name = name.trim_matches('_');

    if name.is_empty() {
        UNNAMED_COLUMN.to_string()
    } else {
        name.to_string()
    }
}

/// Rename duplicate column names in place so every name is unique.
///
/// Scans left to right: the first occurrence of a name is kept as-is, each
/// later occurrence gets the smallest unused `_1`, `_2`, ... suffix.
/// Provenance columns are never renamed.
pub fn resolve_collisions(columns: &mut [String]) {
    let mut seen: HashSet<String> = HashSet::new();
    for slot in columns.iter_mut() {
        if !is_provenance_column(slot) && seen.contains(slot.as_str()) {
            let mut counter = 1usize;
            let mut candidate = format!("{slot}_{counter}");
            while seen.contains(&candidate) {
                counter += 1;
                candidate = format!("{slot}_{counter}");
            }
            *slot = candidate;
        }
        seen.insert(slot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{UNNAMED_COLUMN, resolve_collisions, standardize_column_name};

    #[test]
    fn standardize_strips_and_lowercases() {
        assert_eq!(standardize_column_name(Some("  First Name  ")), "first_name");
        assert_eq!(standardize_column_name(Some("Revenue ($)")), "revenue");
        assert_eq!(standardize_column_name(Some("Q1/Q2 Totals")), "q1_q2_totals");
        assert_eq!(standardize_column_name(Some("UPPER")), "upper");
    }

    #[test]
    fn standardize_falls_back_for_missing_or_stripped_names() {
        assert_eq!(standardize_column_name(None), UNNAMED_COLUMN);
        assert_eq!(standardize_column_name(Some("")), UNNAMED_COLUMN);
        assert_eq!(standardize_column_name(Some("   ")), UNNAMED_COLUMN);
        assert_eq!(standardize_column_name(Some("###")), UNNAMED_COLUMN);
    }

    #[test]
    fn standardize_is_idempotent() {
        for raw in ["First Name", "Revenue ($)", "___x___", "Ünïcode!", ""] {
            let once = standardize_column_name(Some(raw));
            let twice = standardize_column_name(Some(&once));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn collisions_get_smallest_unused_suffix() {
        let mut cols = vec!["a".to_string(), "a".to_string(), "a".to_string()];
        resolve_collisions(&mut cols);
        assert_eq!(cols, vec!["a", "a_1", "a_2"]);
    }

    #[test]
    fn collision_suffix_skips_taken_names() {
        let mut cols = vec!["a".to_string(), "a_1".to_string(), "a".to_string()];
        resolve_collisions(&mut cols);
        assert_eq!(cols, vec!["a", "a_1", "a_2"]);

        let mut cols = vec!["a".to_string(), "a".to_string(), "a_1".to_string()];
        resolve_collisions(&mut cols);
        assert_eq!(cols, vec!["a", "a_1", "a_1_1"]);
    }

    #[test]
    fn collision_resolution_never_leaves_duplicates() {
        let mut cols: Vec<String> = ["x", "x", "x_1", "x", "y", "x_2", "y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        resolve_collisions(&mut cols);
        let mut unique: Vec<String> = cols.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), cols.len(), "duplicates survived: {cols:?}");
    }

    #[test]
    fn provenance_columns_are_left_alone() {
        let mut cols = vec![
            "name".to_string(),
            "_source_file".to_string(),
            "_source_file".to_string(),
        ];
        resolve_collisions(&mut cols);
        assert_eq!(cols, vec!["name", "_source_file", "_source_file"]);
    }
}
