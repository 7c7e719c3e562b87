// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spreadsheet export.

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::table::{CellValue, Table};

/// Serialize a table to a single-worksheet `.xlsx` workbook in memory.
///
/// The first row holds the column names; cells keep their types (numbers
/// as numbers, booleans as booleans). Empty cells are left blank.
pub fn write_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col_num, s.as_str())?;
                }
                CellValue::Integer(i) => {
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Real(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_xlsx() {
        let table = Table {
            columns: vec!["Name".into(), "NetVolume".into(), "LoadBearing".into()],
            rows: vec![
                vec![
                    CellValue::Text("Wall-A".into()),
                    CellValue::Real(2.5),
                    CellValue::Bool(true),
                ],
                vec![CellValue::Text("Wall-B".into()), CellValue::Empty, CellValue::Empty],
            ],
        };

        let bytes = write_xlsx(&table).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_write_xlsx_empty_table() {
        let table = Table::new(vec!["GlobalId".into(), "Class".into()]);
        let bytes = write_xlsx(&table).unwrap();
        assert!(!bytes.is_empty());
    }
}
