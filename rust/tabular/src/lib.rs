// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Sheet Tabular
//!
//! Turns the building elements of an IFC file into a flat table:
//!
//! - identity columns (`GlobalId`, `Class`, `Name`, `Type`) plus one column
//!   per observed `"property set.property"` pair
//! - ignore-list filtering (hidden columns, dropped row values)
//! - per-column value counts and two-column diffs
//! - `.xlsx` export
//!
//! ```rust,ignore
//! use ifc_sheet_tabular::{build_table, extract_elements, ClassFilter};
//!
//! let records = extract_elements(&content, &ClassFilter::BuildingElements);
//! let table = build_table(&records);
//! let counts = ifc_sheet_tabular::value_counts(&table, "Class")?;
//! let xlsx = ifc_sheet_tabular::write_xlsx(&counts)?;
//! ```

pub mod elements;
pub mod error;
pub mod export;
pub mod filter;
pub mod flatten;
pub mod summary;
pub mod table;

pub use elements::{extract_elements, ClassFilter, ElementRecord};
pub use error::{Error, Result};
pub use export::write_xlsx;
pub use filter::IgnoreLists;
pub use flatten::{build_table, IDENTITY_COLUMNS};
pub use summary::{column_diff, count_total, value_counts};
pub use table::{CellValue, Table};
