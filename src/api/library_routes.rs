// Bookshelf - Personal Library Catalog
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Library HTTP Routes
//!
//! Statistics and export downloads.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{ApiResult, AppState};
use crate::export;
use crate::storage::stats::{self, LibraryStats};

/// Create library routes
pub fn library_routes(state: AppState) -> Router {
    Router::new()
        .route("/library/stats", get(stats_handler))
        .route("/export/csv", get(export_csv_handler))
        .route("/export/json", get(export_json_handler))
        .with_state(state)
}

async fn stats_handler(State(state): State<AppState>) -> ApiResult<Json<LibraryStats>> {
    Ok(Json(stats::library_stats(state.db.pool()).await?))
}

async fn export_csv_handler(State(state): State<AppState>) -> ApiResult<Response> {
    let body = export::export_csv(state.db.pool()).await?;
    Ok(attachment("text/csv; charset=utf-8", "csv", body))
}

async fn export_json_handler(State(state): State<AppState>) -> ApiResult<Response> {
    let body = export::export_json(state.db.pool()).await?;
    Ok(attachment("application/json", "json", body))
}

/// File download named after today's date
fn attachment(content_type: &str, extension: &str, body: Vec<u8>) -> Response {
    let filename = export::today_export_filename(extension);
    tracing::info!(%filename, bytes = body.len(), "serving export");

    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
