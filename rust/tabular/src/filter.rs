// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ignore lists: operator-maintained files naming columns to hide and
//! row values to drop, applied to every freshly flattened table.

use std::path::Path;

use crate::table::{CellValue, Table};

/// Ignore lists loaded from configuration files.
#[derive(Debug, Clone, Default)]
pub struct IgnoreLists {
    /// Column names to drop.
    pub columns: Vec<String>,
    /// Cell values; any row containing one of these as a string cell is dropped.
    pub row_values: Vec<String>,
}

impl IgnoreLists {
    /// Load both lists. A missing file yields an empty list; only a file
    /// that exists but cannot be read is an error.
    pub fn load(columns_path: &Path, rows_path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            columns: read_lines(columns_path)?,
            row_values: read_lines(rows_path)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.row_values.is_empty()
    }

    /// Apply both lists: first drop rows carrying an ignored value, then
    /// drop ignored columns. Column entries not present in the table are
    /// discarded silently.
    pub fn apply(&self, table: &Table) -> Table {
        let filtered = if self.row_values.is_empty() {
            table.clone()
        } else {
            table.retain_rows(|row| {
                !row.iter().any(|cell| match cell {
                    CellValue::Text(s) => self.row_values.iter().any(|v| v == s),
                    _ => false,
                })
            })
        };

        if self.columns.is_empty() {
            filtered
        } else {
            filtered.drop_columns(&self.columns)
        }
    }
}

/// One entry per line, blank lines skipped, trailing CR tolerated.
fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
        .collect())
}
