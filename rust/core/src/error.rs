// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the parsing core.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing STEP/IFC content.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse an entity line.
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Referenced entity does not exist in the file.
    #[error("entity #{0} not found")]
    EntityNotFound(u32),

    /// An attribute had an unexpected shape.
    #[error("unexpected attribute: {0}")]
    UnexpectedAttribute(String),
}

impl Error {
    /// Construct a parse error at a byte offset.
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            message: message.into(),
        }
    }
}
