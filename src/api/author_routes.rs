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


//! Author HTTP Routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{ApiJson, ApiPath, ApiResult, AppState, CreatedResponse, MessageResponse};
use crate::storage::catalog;
use crate::storage::{Author, AuthorPatch, NewAuthor};

/// Create author routes
pub fn author_routes(state: AppState) -> Router {
    Router::new()
        .route("/authors", get(list_authors_handler).post(create_author_handler))
        .route(
            "/authors/:id",
            get(get_author_handler)
                .put(update_author_handler)
                .delete(delete_author_handler),
        )
        .with_state(state)
}

async fn list_authors_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Author>>> {
    Ok(Json(catalog::list_authors(state.db.pool()).await?))
}

async fn get_author_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Author>> {
    Ok(Json(catalog::get_author(state.db.pool(), id).await?))
}

async fn create_author_handler(
    State(state): State<AppState>,
    ApiJson(author): ApiJson<NewAuthor>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = catalog::insert_author(state.db.pool(), &author).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, "Author"))))
}

async fn update_author_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<AuthorPatch>,
) -> ApiResult<Json<MessageResponse>> {
    catalog::update_author(state.db.pool(), id, &patch).await?;
    Ok(Json(MessageResponse::updated("Author")))
}

/// Books and series keep existing; only their links to the author go
async fn delete_author_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    catalog::delete_author(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
