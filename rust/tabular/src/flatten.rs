// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flattening element records into a single table.
//!
//! Columns are the fixed identity attributes followed by one column per
//! distinct `"<set name>.<property name>"` key observed across all
//! elements, sorted for deterministic output.

use std::collections::BTreeSet;

use crate::elements::ElementRecord;
use crate::table::{CellValue, Table};

/// Identity columns, always first and always present.
pub const IDENTITY_COLUMNS: [&str; 4] = ["GlobalId", "Class", "Name", "Type"];

/// Build the flat table from extracted element records.
pub fn build_table(records: &[ElementRecord]) -> Table {
    let mut set_keys: BTreeSet<String> = BTreeSet::new();
    for record in records {
        for (set_name, values) in record
            .property_sets
            .iter()
            .chain(record.quantity_sets.iter())
        {
            for prop_name in values.keys() {
                set_keys.insert(format!("{}.{}", set_name, prop_name));
            }
        }
    }

    let columns: Vec<String> = IDENTITY_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .chain(set_keys.iter().cloned())
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(text_or_empty(record.global_id.as_deref()));
            row.push(CellValue::Text(record.class_name.clone()));
            row.push(text_or_empty(record.name.as_deref()));
            row.push(text_or_empty(record.type_name.as_deref()));
            row.extend(set_keys.iter().map(|key| attribute_value(record, key)));
            row
        })
        .collect();

    Table { columns, rows }
}

fn text_or_empty(value: Option<&str>) -> CellValue {
    match value {
        Some(s) => CellValue::Text(s.to_string()),
        None => CellValue::Empty,
    }
}

/// Look up a dotted key on one element. The key splits at the first dot;
/// property sets are consulted before quantity sets.
fn attribute_value(record: &ElementRecord, key: &str) -> CellValue {
    let Some((set_name, prop_name)) = key.split_once('.') else {
        return CellValue::Empty;
    };

    record
        .property_sets
        .get(set_name)
        .and_then(|values| values.get(prop_name))
        .or_else(|| {
            record
                .quantity_sets
                .get(set_name)
                .and_then(|values| values.get(prop_name))
        })
        .cloned()
        .unwrap_or(CellValue::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::SetValues;
    use rustc_hash::FxHashMap;

    fn record(
        id: u32,
        name: &str,
        psets: &[(&str, &[(&str, CellValue)])],
        qsets: &[(&str, &[(&str, CellValue)])],
    ) -> ElementRecord {
        let build = |sets: &[(&str, &[(&str, CellValue)])]| {
            let mut out: FxHashMap<String, SetValues> = FxHashMap::default();
            for (set_name, values) in sets {
                let mut m = SetValues::default();
                for (k, v) in values.iter() {
                    m.insert(k.to_string(), v.clone());
                }
                out.insert(set_name.to_string(), m);
            }
            out
        };

        ElementRecord {
            entity_id: id,
            global_id: Some(format!("guid{}", id)),
            class_name: "IfcWall".to_string(),
            name: Some(name.to_string()),
            type_name: None,
            property_sets: build(psets),
            quantity_sets: build(qsets),
        }
    }

    #[test]
    fn test_column_union_is_sorted() {
        let records = vec![
            record(
                1,
                "A",
                &[("Zed", &[("P", CellValue::Integer(1))])],
                &[],
            ),
            record(
                2,
                "B",
                &[("Alpha", &[("Q", CellValue::Integer(2))])],
                &[],
            ),
        ];

        let table = build_table(&records);
        assert_eq!(
            table.columns,
            vec!["GlobalId", "Class", "Name", "Type", "Alpha.Q", "Zed.P"]
        );
        // Missing key on the other element flattens to Empty
        assert_eq!(table.rows[0][4], CellValue::Empty);
        assert_eq!(table.rows[0][5], CellValue::Integer(1));
    }

    #[test]
    fn test_property_set_shadows_quantity_set() {
        let records = vec![record(
            1,
            "A",
            &[("Common", &[("Width", CellValue::Text("from pset".into()))])],
            &[("Common", &[("Width", CellValue::Real(0.2))])],
        )];

        let table = build_table(&records);
        let idx = table.column_index("Common.Width").unwrap();
        assert_eq!(table.rows[0][idx], CellValue::Text("from pset".into()));
    }

    #[test]
    fn test_dotted_property_name_splits_once() {
        let records = vec![record(
            1,
            "A",
            &[("Set", &[("a.b", CellValue::Integer(7))])],
            &[],
        )];

        let table = build_table(&records);
        let idx = table.column_index("Set.a.b").unwrap();
        assert_eq!(table.rows[0][idx], CellValue::Integer(7));
    }

    #[test]
    fn test_empty_input() {
        let table = build_table(&[]);
        assert_eq!(table.columns, IDENTITY_COLUMNS);
        assert_eq!(table.row_count(), 0);
    }
}
