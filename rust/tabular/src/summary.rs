// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-column value counts and two-column diffs.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::table::{CellValue, Table};

/// Distinct-value counts for one column.
///
/// Returns a two-column table `[<column>, "Count"]`, ordered by descending
/// count and then first appearance. Empty cells are not counted.
pub fn value_counts(table: &Table, column: &str) -> Result<Table> {
    let col = table
        .column_index(column)
        .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;

    struct Bucket {
        display: CellValue,
        count: u64,
        first_seen: usize,
    }

    let mut buckets: FxHashMap<String, Bucket> = FxHashMap::default();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let cell = &row[col];
        let Some(key) = cell.group_key() else {
            continue;
        };
        buckets
            .entry(key)
            .or_insert_with(|| Bucket {
                display: cell.clone(),
                count: 0,
                first_seen: row_idx,
            })
            .count += 1;
    }

    let mut ordered: Vec<Bucket> = buckets.into_values().collect();
    ordered.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });

    Ok(Table {
        columns: vec![column.to_string(), "Count".to_string()],
        rows: ordered
            .into_iter()
            .map(|bucket| vec![bucket.display, CellValue::Integer(bucket.count as i64)])
            .collect(),
    })
}

/// Sum of the Count column of a counts table.
pub fn count_total(counts: &Table) -> u64 {
    counts
        .rows
        .iter()
        .filter_map(|row| row.get(1).and_then(|c| c.as_number()))
        .sum::<f64>() as u64
}

/// Rows where two columns disagree, as a two-column table.
///
/// An empty cell differs from everything, including another empty cell.
/// Numerically equal integer and real values are equal.
pub fn column_diff(table: &Table, column_a: &str, column_b: &str) -> Result<Table> {
    if column_a == column_b {
        return Err(Error::IdenticalColumns(column_a.to_string()));
    }

    let a = table
        .column_index(column_a)
        .ok_or_else(|| Error::UnknownColumn(column_a.to_string()))?;
    let b = table
        .column_index(column_b)
        .ok_or_else(|| Error::UnknownColumn(column_b.to_string()))?;

    Ok(Table {
        columns: vec![column_a.to_string(), column_b.to_string()],
        rows: table
            .rows
            .iter()
            .filter(|row| values_differ(&row[a], &row[b]))
            .map(|row| vec![row[a].clone(), row[b].clone()])
            .collect(),
    })
}

fn values_differ(x: &CellValue, y: &CellValue) -> bool {
    // Null semantics: an empty cell never equals anything
    if x.is_empty() || y.is_empty() {
        return true;
    }

    if let (Some(nx), Some(ny)) = (x.as_number(), y.as_number()) {
        return nx != ny;
    }

    x != y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table {
            columns: vec!["Class".into(), "Type".into(), "Count-ish".into()],
            rows: vec![
                vec![
                    CellValue::Text("IfcWall".into()),
                    CellValue::Text("W200".into()),
                    CellValue::Integer(1),
                ],
                vec![
                    CellValue::Text("IfcWall".into()),
                    CellValue::Text("W200".into()),
                    CellValue::Real(1.0),
                ],
                vec![
                    CellValue::Text("IfcSlab".into()),
                    CellValue::Empty,
                    CellValue::Empty,
                ],
            ],
        }
    }

    #[test]
    fn test_value_counts() {
        let counts = value_counts(&sample(), "Class").unwrap();
        assert_eq!(counts.columns, vec!["Class", "Count"]);
        assert_eq!(
            counts.rows,
            vec![
                vec![CellValue::Text("IfcWall".into()), CellValue::Integer(2)],
                vec![CellValue::Text("IfcSlab".into()), CellValue::Integer(1)],
            ]
        );
        assert_eq!(count_total(&counts), 3);
    }

    #[test]
    fn test_value_counts_skip_empty_and_merge_numeric() {
        let counts = value_counts(&sample(), "Count-ish").unwrap();
        // Integer(1) and Real(1.0) share a bucket, Empty is excluded
        assert_eq!(counts.row_count(), 1);
        assert_eq!(counts.rows[0][1], CellValue::Integer(2));
        assert_eq!(count_total(&counts), 2);
    }

    #[test]
    fn test_value_counts_unknown_column() {
        assert!(matches!(
            value_counts(&sample(), "Nope"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_column_diff() {
        let diff = column_diff(&sample(), "Class", "Type").unwrap();
        assert_eq!(diff.columns, vec!["Class", "Type"]);
        // Rows 0/1 differ textually; row 2 differs because Type is empty
        assert_eq!(diff.row_count(), 3);
    }

    #[test]
    fn test_column_diff_numeric_equality() {
        let mut table = sample();
        table.columns = vec!["X".into(), "Y".into(), "Z".into()];
        table.rows = vec![vec![
            CellValue::Integer(1),
            CellValue::Real(1.0),
            CellValue::Empty,
        ]];
        let diff = column_diff(&table, "X", "Y").unwrap();
        assert_eq!(diff.row_count(), 0);
    }

    #[test]
    fn test_column_diff_identical_selection() {
        assert!(matches!(
            column_diff(&sample(), "Class", "Class"),
            Err(Error::IdenticalColumns(_))
        ));
    }

    #[test]
    fn test_empty_vs_empty_differs() {
        assert!(values_differ(&CellValue::Empty, &CellValue::Empty));
    }
}
