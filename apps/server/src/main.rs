// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Sheet Server - flattens IFC building elements into tables.
//!
//! Each endpoint maps to one interaction of the workflow: upload a file,
//! inspect the flattened table, toggle columns, count values, compare two
//! columns, and download any view as a spreadsheet.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/ifc` - Upload and flatten an .ifc file
//! - `POST /api/v1/ifc/:key/table` - Table view (JSON)
//! - `POST /api/v1/ifc/:key/counts` - Distinct-value counts for a column
//! - `POST /api/v1/ifc/:key/diff` - Rows where two columns differ
//! - `POST /api/v1/ifc/:key/{table,counts,diff}/xlsx` - Spreadsheet downloads

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::cache::DiskCache;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DiskCache>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,ifc_sheet_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        cache_dir = %config.cache_dir,
        max_file_size_mb = config.max_file_size_mb,
        worker_threads = config.worker_threads,
        ignore_columns_path = %config.ignore_columns_path,
        ignore_rows_path = %config.ignore_rows_path,
        "Starting IFC-Sheet Server"
    );

    // Initialize rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .expect("Failed to initialize rayon thread pool");

    // Initialize cache
    let cache = Arc::new(DiskCache::new(&config.cache_dir).await);

    let state = AppState {
        cache,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Upload
        .route("/api/v1/ifc", post(routes::ifc::upload))
        // Table interactions
        .route("/api/v1/ifc/:key/table", post(routes::ifc::table))
        .route("/api/v1/ifc/:key/counts", post(routes::ifc::counts))
        .route("/api/v1/ifc/:key/diff", post(routes::ifc::diff))
        // Spreadsheet downloads
        .route("/api/v1/ifc/:key/table/xlsx", post(routes::ifc::table_xlsx))
        .route("/api/v1/ifc/:key/counts/xlsx", post(routes::ifc::counts_xlsx))
        .route("/api/v1/ifc/:key/diff/xlsx", post(routes::ifc::diff_xlsx))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_mb * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
