// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC endpoints: upload, table view, value counts, diff, xlsx downloads.
//!
//! Every interaction after the upload addresses the flattened table by its
//! cache key; the table is re-read from the cache on each request.

use crate::error::ApiError;
use crate::services::{cache::DiskCache, flatten_content, TableArtifact};
use crate::types::{
    CountRequest, CountResponse, DiffRequest, DiffResponse, ProcessingStats, TableRequest,
    TableResponse, UploadResponse,
};
use crate::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use ifc_sheet_tabular::{column_diff, count_total, value_counts, write_xlsx, ClassFilter,
    IgnoreLists, Table};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Download file name used for every export.
const XLSX_FILE_NAME: &str = "ifc_data.xlsx";

/// Fields extracted from the upload form.
struct UploadParts {
    file_name: String,
    data: Vec<u8>,
    /// Optional class filter; defaults to all building elements.
    class: Option<String>,
}

/// Extract the file (and optional class filter) from a multipart request.
async fn extract_upload(multipart: &mut Multipart) -> Result<UploadParts, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut class: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                tracing::debug!(size = bytes.len(), file_name = %file_name, "Extracted file");
                file = Some((file_name, bytes.to_vec()));
            }
            "class" => {
                let value = field.text().await?;
                if !value.is_empty() {
                    class = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = file else {
        tracing::warn!("No 'file' field found in multipart request");
        return Err(ApiError::MissingFile);
    };

    Ok(UploadParts {
        file_name,
        data,
        class,
    })
}

/// POST /api/v1/ifc - Upload, flatten, cache.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let request_start = std::time::Instant::now();

    let parts = extract_upload(&mut multipart).await?;

    // Only .ifc uploads are processed
    if !parts.file_name.to_ascii_lowercase().ends_with(".ifc") {
        return Err(ApiError::NotAnIfcFile(parts.file_name));
    }

    if parts.data.len() > state.config.max_file_size_mb * 1024 * 1024 {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    let file_size = parts.data.len();

    // Class filter participates in the key: the same file flattened for a
    // different class is a different table.
    let mut cache_key = DiskCache::generate_key(&parts.data);
    if let Some(class) = &parts.class {
        cache_key = format!("{}-{}", cache_key, class.to_ascii_lowercase());
    }

    if let Some(cached) = state.cache.get::<TableArtifact>(&cache_key).await? {
        tracing::info!(cache_key = %cache_key, "Cache HIT");
        return Ok(Json(upload_response(
            cache_key,
            cached,
            file_size,
            ProcessingStats {
                flatten_time_ms: 0,
                total_time_ms: request_start.elapsed().as_millis() as u64,
                from_cache: true,
            },
        )));
    }

    tracing::info!(cache_key = %cache_key, size = file_size, "Cache MISS - processing");

    let content = String::from_utf8(parts.data)?;

    let filter = match parts.class {
        Some(class) => ClassFilter::Class(class),
        None => ClassFilter::BuildingElements,
    };

    let ignore = IgnoreLists::load(
        std::path::Path::new(&state.config.ignore_columns_path),
        std::path::Path::new(&state.config.ignore_rows_path),
    )
    .map_err(|e| ApiError::Processing(format!("ignore lists: {}", e)))?;

    // Flattening is CPU-bound, keep it off the async workers
    let result =
        tokio::task::spawn_blocking(move || flatten_content(&content, &filter, &ignore)).await?;

    let artifact = result.artifact;
    let stats = ProcessingStats {
        flatten_time_ms: result.flatten_time_ms,
        total_time_ms: request_start.elapsed().as_millis() as u64,
        from_cache: false,
    };

    // Cache in the background
    let cache = state.cache.clone();
    let artifact_clone = artifact.clone();
    let key_clone = cache_key.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set(&key_clone, &artifact_clone).await {
            tracing::error!(error = %e, "Failed to cache flattened table");
        }
    });

    Ok(Json(upload_response(cache_key, artifact, file_size, stats)))
}

fn upload_response(
    cache_key: String,
    artifact: TableArtifact,
    file_size: usize,
    stats: ProcessingStats,
) -> UploadResponse {
    UploadResponse {
        cache_key,
        schema_version: artifact.schema_version,
        element_count: artifact.element_count,
        row_count: artifact.table.row_count(),
        columns: artifact.table.columns,
        file_size,
        stats,
    }
}

/// Fetch the cached table and apply the requested column drops.
async fn load_view(
    state: &AppState,
    key: &str,
    drop_columns: &[String],
) -> Result<Table, ApiError> {
    let artifact = state
        .cache
        .get::<TableArtifact>(key)
        .await?
        .ok_or(ApiError::TableNotFound)?;

    let view = if drop_columns.is_empty() {
        artifact.table
    } else {
        artifact.table.drop_columns(drop_columns)
    };

    if view.column_count() == 0 {
        return Err(ApiError::NoColumnsSelected);
    }

    Ok(view)
}

/// POST /api/v1/ifc/:key/table - Table view.
pub async fn table(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<TableRequest>,
) -> Result<Json<TableResponse>, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    Ok(Json(view.into()))
}

/// POST /api/v1/ifc/:key/counts - Distinct-value counts for one column.
pub async fn counts(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<CountRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    let counts = value_counts(&view, &request.column)?;
    let total = count_total(&counts);

    Ok(Json(CountResponse {
        column: request.column,
        counts: counts.into(),
        total,
    }))
}

/// POST /api/v1/ifc/:key/diff - Rows where two columns differ.
pub async fn diff(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<DiffRequest>,
) -> Result<Json<DiffResponse>, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    let diff = column_diff(&view, &request.column_a, &request.column_b)?;

    Ok(Json(DiffResponse {
        identical: diff.row_count() == 0,
        diff: diff.into(),
    }))
}

/// POST /api/v1/ifc/:key/table/xlsx - Table view as a spreadsheet download.
pub async fn table_xlsx(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<TableRequest>,
) -> Result<Response, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    xlsx_response(&view)
}

/// POST /api/v1/ifc/:key/counts/xlsx - Value counts as a spreadsheet download.
pub async fn counts_xlsx(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<CountRequest>,
) -> Result<Response, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    let counts = value_counts(&view, &request.column)?;
    xlsx_response(&counts)
}

/// POST /api/v1/ifc/:key/diff/xlsx - Column diff as a spreadsheet download.
pub async fn diff_xlsx(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<DiffRequest>,
) -> Result<Response, ApiError> {
    let view = load_view(&state, &key, &request.drop_columns).await?;
    let diff = column_diff(&view, &request.column_a, &request.column_b)?;
    xlsx_response(&diff)
}

/// Build a binary attachment response from a table.
fn xlsx_response(table: &Table) -> Result<Response, ApiError> {
    let data = write_xlsx(table)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_MIME)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", XLSX_FILE_NAME),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
