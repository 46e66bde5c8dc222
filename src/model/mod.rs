//! Reshape model: pivot the long timing table into one column per tag.

pub mod stats;

pub use stats::BoxStats;

use crate::config::ConflictPolicy;
use crate::error::{ReportError, Result};
use crate::log::LongTable;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Wide table: row index -> tag -> time.
///
/// Every row carries an entry for every tag. `None` marks a pair that was
/// absent from the input, so gaps stay visible instead of dropping a row or
/// column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WideTable {
    tags: BTreeSet<String>,
    rows: BTreeMap<i64, BTreeMap<String, Option<f64>>>,
}

impl WideTable {
    /// Tags in column order (lexicographic).
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Row indices in ascending order.
    pub fn index(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.keys().copied()
    }

    pub fn rows(&self) -> &BTreeMap<i64, BTreeMap<String, Option<f64>>> {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.tags.len()
    }

    /// Value at (ix, tag); `None` for missing cells and unknown keys alike.
    pub fn value(&self, ix: i64, tag: &str) -> Option<f64> {
        self.rows.get(&ix).and_then(|row| row.get(tag)).copied().flatten()
    }

    /// True when both the row and the column exist but the cell is empty.
    pub fn is_missing(&self, ix: i64, tag: &str) -> bool {
        matches!(self.rows.get(&ix).and_then(|row| row.get(tag)), Some(None))
    }

    /// Present values of one column in index order.
    pub fn column(&self, tag: &str) -> Vec<f64> {
        self.rows
            .values()
            .filter_map(|row| row.get(tag).copied().flatten())
            .collect()
    }

    /// Keep only the columns whose tag matches `filter`. Rows are kept even
    /// when all their remaining cells are empty.
    pub fn select_tags(mut self, filter: &Regex) -> WideTable {
        self.tags.retain(|tag| filter.is_match(tag));
        for row in self.rows.values_mut() {
            row.retain(|tag, _| filter.is_match(tag));
        }
        self
    }
}

/// Pivot long records into a wide table.
///
/// Duplicate (ix, tag) pairs are resolved by `policy`; `Reject` fails on the
/// second occurrence.
pub fn pivot(records: &LongTable, policy: ConflictPolicy) -> Result<WideTable> {
    let tags: BTreeSet<String> = records.iter().map(|r| r.tag.clone()).collect();

    let mut cells: BTreeMap<i64, BTreeMap<String, f64>> = BTreeMap::new();
    for rec in records {
        let row = cells.entry(rec.ix).or_default();
        match row.get_mut(&rec.tag) {
            None => {
                row.insert(rec.tag.clone(), rec.time);
            }
            Some(prev) => match policy {
                ConflictPolicy::Reject => {
                    return Err(ReportError::Reshape {
                        ix: rec.ix,
                        tag: rec.tag.clone(),
                        first: *prev,
                        second: rec.time,
                    });
                }
                ConflictPolicy::First => {}
                ConflictPolicy::Last => *prev = rec.time,
            },
        }
    }

    // Fill every row out to the full column set.
    let rows = cells
        .into_iter()
        .map(|(ix, present)| {
            let full = tags
                .iter()
                .map(|tag| (tag.clone(), present.get(tag).copied()))
                .collect();
            (ix, full)
        })
        .collect();

    Ok(WideTable { tags, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TimingRecord;
    use pretty_assertions::assert_eq;

    fn rec(ix: i64, tag: &str, time: f64) -> TimingRecord {
        TimingRecord::new(ix, tag, time)
    }

    fn row(cells: &[(&str, Option<f64>)]) -> BTreeMap<String, Option<f64>> {
        cells.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    #[test]
    fn pivots_identity_data() {
        let long = vec![
            rec(0, "a", 100.0),
            rec(0, "b", 200.0),
            rec(1, "a", 150.0),
            rec(1, "b", 250.0),
        ];
        let wide = pivot(&long, ConflictPolicy::Reject).unwrap();
        let mut expected = BTreeMap::new();
        expected.insert(0, row(&[("a", Some(100.0)), ("b", Some(200.0))]));
        expected.insert(1, row(&[("a", Some(150.0)), ("b", Some(250.0))]));
        assert_eq!(wide.rows(), &expected);
    }

    #[test]
    fn columns_and_rows_cover_distinct_tags_and_indices() {
        let long = vec![
            rec(5, "query_table", 1.0),
            rec(2, "load_table", 2.0),
            rec(5, "load_table", 3.0),
            rec(9, "insert", 4.0),
        ];
        let wide = pivot(&long, ConflictPolicy::Reject).unwrap();
        assert_eq!(
            wide.tags().collect::<Vec<_>>(),
            vec!["insert", "load_table", "query_table"]
        );
        assert_eq!(wide.index().collect::<Vec<_>>(), vec![2, 5, 9]);
        for row in wide.rows().values() {
            assert_eq!(row.len(), 3);
        }
    }

    #[test]
    fn absent_pairs_are_explicitly_missing() {
        let long = vec![rec(0, "a", 1.0), rec(0, "b", 2.0), rec(1, "a", 3.0)];
        let wide = pivot(&long, ConflictPolicy::Reject).unwrap();
        assert!(wide.is_missing(1, "b"));
        assert_eq!(wide.value(1, "b"), None);
        assert!(!wide.is_missing(1, "a"));
        assert!(!wide.is_missing(7, "a"));
        assert_eq!(wide.column("b"), vec![2.0]);
    }

    #[test]
    fn duplicates_rejected_by_default() {
        let long = vec![rec(0, "a", 1.0), rec(0, "a", 2.0)];
        let err = pivot(&long, ConflictPolicy::Reject).unwrap_err();
        match err {
            ReportError::Reshape { ix, tag, first, second } => {
                assert_eq!((ix, tag.as_str(), first, second), (0, "a", 1.0, 2.0));
            }
            other => panic!("expected reshape error, got {other:?}"),
        }
    }

    #[test]
    fn duplicates_take_first_or_last() {
        let long = vec![rec(0, "a", 1.0), rec(0, "a", 2.0), rec(0, "a", 3.0)];
        let first = pivot(&long, ConflictPolicy::First).unwrap();
        let last = pivot(&long, ConflictPolicy::Last).unwrap();
        assert_eq!(first.value(0, "a"), Some(1.0));
        assert_eq!(last.value(0, "a"), Some(3.0));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let wide = pivot(&Vec::new(), ConflictPolicy::Reject).unwrap();
        assert_eq!(wide.row_count(), 0);
        assert_eq!(wide.column_count(), 0);
    }

    #[test]
    fn select_tags_drops_unmatched_columns() {
        let long = vec![
            rec(0, "load_table", 1.0),
            rec(0, "query_table", 2.0),
            rec(1, "query_table", 3.0),
        ];
        let wide = pivot(&long, ConflictPolicy::Reject)
            .unwrap()
            .select_tags(&Regex::new("^load").unwrap());
        assert_eq!(wide.tags().collect::<Vec<_>>(), vec!["load_table"]);
        assert_eq!(wide.row_count(), 2);
        assert!(wide.is_missing(1, "load_table"));
        assert_eq!(wide.value(0, "query_table"), None);
    }
}
