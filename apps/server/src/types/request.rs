// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Column selection for the table view. Unchecked columns arrive here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRequest {
    /// Columns to drop from the view.
    #[serde(default)]
    pub drop_columns: Vec<String>,
}

/// Request for per-column value counts.
#[derive(Debug, Clone, Deserialize)]
pub struct CountRequest {
    /// Column to count distinct values of.
    pub column: String,
    /// Columns to drop before counting.
    #[serde(default)]
    pub drop_columns: Vec<String>,
}

/// Request for a two-column comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffRequest {
    /// First column.
    pub column_a: String,
    /// Second column.
    pub column_b: String,
    /// Columns to drop before comparing.
    #[serde(default)]
    pub drop_columns: Vec<String>,
}
