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


//! # Bookshelf HTTP API
//!
//! JSON REST endpoints over the catalog, combined into one axum router.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/books` - Books with search and status filters
//! - `/api/authors`, `/api/publishers`, `/api/series` - People and imprints
//! - `/api/genres`, `/api/topics`, `/api/categories` - Classification terms
//! - `/api/recommended-books` - Suggestions outside the library
//! - `/api/library/stats` - Library statistics
//! - `/api/export/{csv,json}` - File downloads

pub mod author_routes;
pub mod book_routes;
pub mod catalog_routes;
pub mod error;
pub mod library_routes;
pub mod server;

use serde::{Deserialize, Serialize};

use crate::storage::Database;

pub use error::{ApiJson, ApiPath, ApiQuery, ApiResult, ErrorResponse};
pub use server::{build_router, ApiServer};

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Body returned by create endpoints (201)
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

impl CreatedResponse {
    pub fn new(id: i64, entity: &str) -> Self {
        Self {
            id,
            message: format!("{} created", entity),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn updated(entity: &str) -> Self {
        Self {
            message: format!("{} updated", entity),
        }
    }
}
