// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat table model shared by the flattening, filtering and export stages.

use ifc_sheet_core::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single table cell.
///
/// Serialized untagged so JSON rows read naturally:
/// `["2O2Fr$t4X", "IfcWall", 3.6, true, null]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Boolean value (IFC logicals)
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Real(f64),
    /// String value
    Text(String),
    /// Missing/null cell
    Empty,
}

impl CellValue {
    /// Convert a decoded IFC attribute value into a cell.
    ///
    /// Wrapped types contribute their inner value; lists (e.g. enumerated
    /// properties) flatten to comma-joined text.
    pub fn from_attribute(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Typed(_, inner) => Self::from_attribute(inner),
            AttributeValue::String(s) => CellValue::Text(s.clone()),
            AttributeValue::Integer(i) => CellValue::Integer(*i),
            AttributeValue::Float(f) => CellValue::Real(*f),
            AttributeValue::Enum(_) => match value.as_bool() {
                Some(b) => CellValue::Bool(b),
                None => CellValue::Text(value.as_enum().unwrap_or_default().to_string()),
            },
            AttributeValue::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(Self::from_attribute)
                    .filter(|c| !matches!(c, CellValue::Empty))
                    .map(|c| c.to_string())
                    .collect();
                if parts.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(parts.join(", "))
                }
            }
            AttributeValue::EntityRef(_) | AttributeValue::Null | AttributeValue::Derived => {
                CellValue::Empty
            }
        }
    }

    /// Whether the cell holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the cell, when it has one.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Grouping key for value counting. Numerically equal integer and real
    /// values share a bucket; text never collides with numbers.
    pub(crate) fn group_key(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(format!("b:{}", b)),
            CellValue::Integer(i) => Some(format!("n:{}", *i as f64)),
            CellValue::Real(f) => Some(format!("n:{}", f)),
            CellValue::Text(s) => Some(format!("t:{}", s)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Empty => Ok(()),
        }
    }
}

/// A flat table: named columns and rows of cells.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in display order.
    pub columns: Vec<String>,
    /// Row data.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// New table without the named columns. Names not present are ignored.
    pub fn drop_columns(&self, names: &[String]) -> Table {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.iter().any(|n| n == &self.columns[i]))
            .collect();

        Table {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// New table keeping only rows for which the predicate holds.
    pub fn retain_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table {
            columns: vec!["A".into(), "B".into(), "C".into()],
            rows: vec![
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Integer(1),
                    CellValue::Empty,
                ],
                vec![
                    CellValue::Text("y".into()),
                    CellValue::Real(2.5),
                    CellValue::Bool(true),
                ],
            ],
        }
    }

    #[test]
    fn test_drop_columns() {
        let t = sample().drop_columns(&["B".into(), "Nope".into()]);
        assert_eq!(t.columns, vec!["A", "C"]);
        assert_eq!(t.rows[1], vec![CellValue::Text("y".into()), CellValue::Bool(true)]);
    }

    #[test]
    fn test_retain_rows() {
        let t = sample().retain_rows(|row| !row[2].is_empty());
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0][0], CellValue::Text("y".into()));
    }

    #[test]
    fn test_cell_json_shape() {
        let row = vec![
            CellValue::Text("w".into()),
            CellValue::Integer(3),
            CellValue::Bool(false),
            CellValue::Empty,
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["w",3,false,null]"#);
    }

    #[test]
    fn test_from_attribute() {
        let v = AttributeValue::Typed(
            "IFCBOOLEAN".into(),
            Box::new(AttributeValue::Enum("F".into())),
        );
        assert_eq!(CellValue::from_attribute(&v), CellValue::Bool(false));

        let v = AttributeValue::List(vec![
            AttributeValue::String("A".into()),
            AttributeValue::String("B".into()),
        ]);
        assert_eq!(CellValue::from_attribute(&v), CellValue::Text("A, B".into()));

        assert_eq!(CellValue::from_attribute(&AttributeValue::Null), CellValue::Empty);
    }

    #[test]
    fn test_group_key_numeric_merge() {
        assert_eq!(
            CellValue::Integer(1).group_key(),
            CellValue::Real(1.0).group_key()
        );
        assert_ne!(
            CellValue::Text("1".into()).group_key(),
            CellValue::Integer(1).group_key()
        );
    }
}
