// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "ifc-sheet-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "ifc-sheet-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Flattens IFC building elements into spreadsheet-ready tables",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc",
                description: "Upload an .ifc file and flatten it to a table",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/table",
                description: "Table view with optional dropped columns",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/counts",
                description: "Distinct-value counts for one column",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/diff",
                description: "Rows where two columns differ",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/table/xlsx",
                description: "Table view as a downloadable .xlsx file",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/counts/xlsx",
                description: "Value counts as a downloadable .xlsx file",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/ifc/:key/diff/xlsx",
                description: "Column diff as a downloadable .xlsx file",
            },
        ],
    })
}
