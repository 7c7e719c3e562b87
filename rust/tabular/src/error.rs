// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for tabular operations.

use thiserror::Error;

/// Result type alias for tabular operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from table manipulation and export.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested column does not exist in the table.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The same column was selected for both sides of a comparison.
    #[error("cannot compare column '{0}' with itself")]
    IdenticalColumns(String),

    /// Ignore-list file could not be read.
    #[error("failed to read ignore list: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet serialization failed.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
