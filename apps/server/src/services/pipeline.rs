// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flattening pipeline: extract elements, build the table, apply the
//! ignore lists. Runs on the blocking pool; the result is what gets
//! cached and served.

use ifc_sheet_core::detect_schema_version;
use ifc_sheet_tabular::{build_table, extract_elements, ClassFilter, IgnoreLists, Table};
use serde::{Deserialize, Serialize};

/// Cached result of flattening one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableArtifact {
    /// IFC schema version declared in the file header.
    pub schema_version: String,
    /// Number of elements matched before any row filtering.
    pub element_count: usize,
    /// Flattened table with ignore lists already applied.
    pub table: Table,
}

/// Flattening outcome with timing.
pub struct FlattenResult {
    pub artifact: TableArtifact,
    pub flatten_time_ms: u64,
}

/// Run the full flatten pipeline over IFC file content.
pub fn flatten_content(
    content: &str,
    filter: &ClassFilter,
    ignore: &IgnoreLists,
) -> FlattenResult {
    let start = std::time::Instant::now();

    let records = extract_elements(content, filter);
    let element_count = records.len();

    let table = build_table(&records);
    let table = if ignore.is_empty() {
        table
    } else {
        ignore.apply(&table)
    };

    let schema_version = detect_schema_version(content).to_string();
    let flatten_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        schema_version = %schema_version,
        elements = element_count,
        rows = table.row_count(),
        columns = table.column_count(),
        flatten_time_ms = flatten_time_ms,
        "Flatten pipeline complete"
    );

    FlattenResult {
        artifact: TableArtifact {
            schema_version,
            element_count,
            table,
        },
        flatten_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
FILE_SCHEMA(('IFC4'));\nDATA;\n\
#10=IFCWALL('gw1',$,'Wall-A',$,$,$,$,'T1');\n\
#30=IFCPROPERTYSET('gp1',$,'Pset_WallCommon',$,(#31));\n\
#31=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('F60'),$);\n\
#40=IFCRELDEFINESBYPROPERTIES('gr2',$,$,$,(#10),#30);\n";

    #[test]
    fn test_flatten_content() {
        let result = flatten_content(
            MODEL,
            &ClassFilter::BuildingElements,
            &IgnoreLists::default(),
        );

        assert_eq!(result.artifact.schema_version, "IFC4");
        assert_eq!(result.artifact.element_count, 1);
        assert_eq!(
            result.artifact.table.columns,
            vec!["GlobalId", "Class", "Name", "Type", "Pset_WallCommon.FireRating"]
        );
    }

    #[test]
    fn test_artifact_round_trips_through_json() {
        let result = flatten_content(
            MODEL,
            &ClassFilter::BuildingElements,
            &IgnoreLists::default(),
        );

        let json = serde_json::to_vec(&result.artifact).unwrap();
        let back: TableArtifact = serde_json::from_slice(&json).unwrap();
        assert_eq!(back.table.columns, result.artifact.table.columns);
        assert_eq!(back.table.rows, result.artifact.table.rows);
    }
}
