// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("'{0}' is not an IFC file. Please upload a file with .ifc extension")]
    NotAnIfcFile(String),

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Invalid UTF-8 content")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Table not found in cache. Upload the file first")]
    TableNotFound,

    #[error("No columns selected")]
    NoColumnsSelected,

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Select different columns: '{0}' was chosen for both sides")]
    IdenticalColumns(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),

    #[error("Spreadsheet serialization error: {0}")]
    Xlsx(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::NotAnIfcFile(_) => (StatusCode::BAD_REQUEST, "NOT_AN_IFC_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::InvalidUtf8(_) => (StatusCode::BAD_REQUEST, "INVALID_UTF8"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR"),
            ApiError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            ApiError::TableNotFound => (StatusCode::NOT_FOUND, "TABLE_NOT_FOUND"),
            ApiError::NoColumnsSelected => (StatusCode::BAD_REQUEST, "NO_COLUMNS_SELECTED"),
            ApiError::UnknownColumn(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_COLUMN"),
            ApiError::IdenticalColumns(_) => (StatusCode::BAD_REQUEST, "IDENTICAL_COLUMNS"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
            ApiError::Xlsx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "XLSX_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ifc_sheet_core::Error> for ApiError {
    fn from(err: ifc_sheet_core::Error) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl From<ifc_sheet_tabular::Error> for ApiError {
    fn from(err: ifc_sheet_tabular::Error) -> Self {
        match err {
            ifc_sheet_tabular::Error::UnknownColumn(name) => ApiError::UnknownColumn(name),
            ifc_sheet_tabular::Error::IdenticalColumns(name) => ApiError::IdenticalColumns(name),
            ifc_sheet_tabular::Error::Io(e) => ApiError::Processing(e.to_string()),
            ifc_sheet_tabular::Error::Xlsx(e) => ApiError::Xlsx(e.to_string()),
        }
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}
