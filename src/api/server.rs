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


//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::author_routes::author_routes;
use super::book_routes::book_routes;
use super::catalog_routes::catalog_routes;
use super::library_routes::library_routes;
use super::{AppState, ErrorResponse};
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::Database;

/// HTTP server for the catalog API
pub struct ApiServer {
    config: AppConfig,
    router: Router,
}

impl ApiServer {
    /// Create a server over an opened database
    pub fn new(config: AppConfig, db: Database) -> Self {
        let router = build_router(AppState::new(db), &config.cors_origins);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let addr = self.config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "bookshelf API listening");
        tracing::info!("health check: http://{}/health", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
///
/// An empty `cors_origins` list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .merge(book_routes(state.clone()))
        .merge(author_routes(state.clone()))
        .merge(catalog_routes(state.clone()))
        .merge(library_routes(state));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse {
        error: "Not found".to_string(),
        code: StatusCode::NOT_FOUND.as_u16(),
    };
    (StatusCode::NOT_FOUND, Json(body))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
