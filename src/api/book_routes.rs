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


//! Book HTTP Routes
//!
//! CRUD endpoints for books plus the filtered list.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{ApiJson, ApiPath, ApiQuery, ApiResult, AppState, CreatedResponse, MessageResponse};
use crate::storage::queries::{self, BookDetail, BookFilter, BookWithRelations};
use crate::storage::{BookPatch, NewBook};

// ==================
// Request Types
// ==================

/// Raw list filters; validated by `BookFilter::from_params`
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ==================
// Book Routes
// ==================

/// Create book routes
pub fn book_routes(state: AppState) -> Router {
    Router::new()
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route(
            "/books/:id",
            get(get_book_handler)
                .put(update_book_handler)
                .delete(delete_book_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_books_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BookListQuery>,
) -> ApiResult<Json<Vec<BookWithRelations>>> {
    let filter = BookFilter::from_params(params.search.as_deref(), params.status.as_deref())?;
    let books = queries::list_books_with_relations(state.db.pool(), &filter).await?;
    Ok(Json(books))
}

async fn get_book_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<BookDetail>> {
    let book = queries::get_book_detail(state.db.pool(), id).await?;
    Ok(Json(book))
}

async fn create_book_handler(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<NewBook>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = queries::insert_book(state.db.pool(), &book).await?;
    tracing::info!(book_id = id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, "Book"))))
}

async fn update_book_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<BookPatch>,
) -> ApiResult<Json<MessageResponse>> {
    queries::update_book(state.db.pool(), id, &patch).await?;
    Ok(Json(MessageResponse::updated("Book")))
}

async fn delete_book_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    queries::delete_book(state.db.pool(), id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
