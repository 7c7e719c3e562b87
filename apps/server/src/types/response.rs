// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use ifc_sheet_tabular::{CellValue, Table};
use serde::{Deserialize, Serialize};

/// Response to a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Cache key for this table (SHA256 of file content).
    pub cache_key: String,
    /// IFC schema version (e.g., "IFC2X3", "IFC4", "IFC4X3").
    pub schema_version: String,
    /// Number of elements matched by the class filter.
    pub element_count: usize,
    /// Rows remaining after ignore-list filtering.
    pub row_count: usize,
    /// Columns of the flattened table.
    pub columns: Vec<String>,
    /// Uploaded file size in bytes.
    pub file_size: usize,
    /// Processing statistics.
    pub stats: ProcessingStats,
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Time spent flattening (ms).
    pub flatten_time_ms: u64,
    /// Total request handling time (ms).
    pub total_time_ms: u64,
    /// Whether the result came from cache.
    pub from_cache: bool,
}

/// A table rendered into a response.
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub rows: Vec<Vec<CellValue>>,
}

impl From<Table> for TableResponse {
    fn from(table: Table) -> Self {
        Self {
            columns: table.columns,
            row_count: table.rows.len(),
            rows: table.rows,
        }
    }
}

/// Value counts for one column.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// Column that was counted.
    pub column: String,
    /// Count table: `[<column>, "Count"]`.
    #[serde(flatten)]
    pub counts: TableResponse,
    /// Sum of all counts.
    pub total: u64,
}

/// Two-column comparison result.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResponse {
    /// Whether the two columns agree on every row.
    pub identical: bool,
    /// Rows where the columns disagree.
    #[serde(flatten)]
    pub diff: TableResponse,
}
