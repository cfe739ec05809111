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


//! Catalog HTTP Routes
//!
//! Endpoints for publishers, genres, topics, categories, series and
//! recommended books. Genres, topics and categories share one set of
//! handlers parameterised by `TaxonomyKind`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{ApiJson, ApiPath, ApiResult, AppState, CreatedResponse, MessageResponse};
use crate::storage::catalog::{self, RecommendedBookWithGenres, SeriesWithAuthors};
use crate::storage::{
    NewPublisher, NewRecommendedBook, NewSeries, NewTaxonomyTerm, Publisher, PublisherPatch,
    SeriesPatch, TaxonomyKind, TaxonomyTerm, TaxonomyTermPatch,
};

// ==================
// Catalog Routes
// ==================

/// Create catalog routes
pub fn catalog_routes(state: AppState) -> Router {
    let mut router = Router::new()
        .route(
            "/publishers",
            get(list_publishers_handler).post(create_publisher_handler),
        )
        .route(
            "/publishers/:id",
            get(get_publisher_handler)
                .put(update_publisher_handler)
                .delete(delete_publisher_handler),
        )
        .route("/series", get(list_series_handler).post(create_series_handler))
        .route(
            "/series/:id",
            get(get_series_handler)
                .put(update_series_handler)
                .delete(delete_series_handler),
        )
        .route(
            "/recommended-books",
            get(list_recommended_handler).post(create_recommended_handler),
        )
        .route(
            "/recommended-books/:id",
            get(get_recommended_handler).delete(delete_recommended_handler),
        );

    for kind in [TaxonomyKind::Genre, TaxonomyKind::Topic, TaxonomyKind::Category] {
        router = taxonomy_routes(router, kind);
    }

    router.with_state(state)
}

/// Mount `/<table>` and `/<table>/:id` for one taxonomy
fn taxonomy_routes(router: Router<AppState>, kind: TaxonomyKind) -> Router<AppState> {
    let collection = format!("/{}", kind.table());
    let item = format!("/{}/:id", kind.table());

    router
        .route(
            &collection,
            get(move |state: State<AppState>| list_terms_handler(state, kind)).post(
                move |state: State<AppState>, body: ApiJson<NewTaxonomyTerm>| {
                    create_term_handler(state, kind, body)
                },
            ),
        )
        .route(
            &item,
            get(move |state: State<AppState>, id: ApiPath<i64>| get_term_handler(state, kind, id))
                .put(
                    move |state: State<AppState>, id: ApiPath<i64>, body: ApiJson<TaxonomyTermPatch>| {
                        update_term_handler(state, kind, id, body)
                    },
                )
                .delete(move |state: State<AppState>, id: ApiPath<i64>| {
                    delete_term_handler(state, kind, id)
                }),
        )
}

// ==================
// Publisher Handlers
// ==================

async fn list_publishers_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Publisher>>> {
    Ok(Json(catalog::list_publishers(state.db.pool()).await?))
}

async fn get_publisher_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Publisher>> {
    Ok(Json(catalog::get_publisher(state.db.pool(), id).await?))
}

async fn create_publisher_handler(
    State(state): State<AppState>,
    ApiJson(publisher): ApiJson<NewPublisher>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = catalog::insert_publisher(state.db.pool(), &publisher).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, "Publisher"))))
}

async fn update_publisher_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PublisherPatch>,
) -> ApiResult<Json<MessageResponse>> {
    catalog::update_publisher(state.db.pool(), id, &patch).await?;
    Ok(Json(MessageResponse::updated("Publisher")))
}

async fn delete_publisher_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    catalog::delete_publisher(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Taxonomy Handlers
// ==================

async fn list_terms_handler(
    State(state): State<AppState>,
    kind: TaxonomyKind,
) -> ApiResult<Json<Vec<TaxonomyTerm>>> {
    Ok(Json(catalog::list_terms(state.db.pool(), kind).await?))
}

async fn get_term_handler(
    State(state): State<AppState>,
    kind: TaxonomyKind,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TaxonomyTerm>> {
    Ok(Json(catalog::get_term(state.db.pool(), kind, id).await?))
}

async fn create_term_handler(
    State(state): State<AppState>,
    kind: TaxonomyKind,
    ApiJson(term): ApiJson<NewTaxonomyTerm>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = catalog::insert_term(state.db.pool(), kind, &term).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, kind.entity()))))
}

async fn update_term_handler(
    State(state): State<AppState>,
    kind: TaxonomyKind,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<TaxonomyTermPatch>,
) -> ApiResult<Json<MessageResponse>> {
    catalog::update_term(state.db.pool(), kind, id, &patch).await?;
    Ok(Json(MessageResponse::updated(kind.entity())))
}

async fn delete_term_handler(
    State(state): State<AppState>,
    kind: TaxonomyKind,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    catalog::delete_term(state.db.pool(), kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Series Handlers
// ==================

async fn list_series_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SeriesWithAuthors>>> {
    Ok(Json(catalog::list_series(state.db.pool()).await?))
}

async fn get_series_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<SeriesWithAuthors>> {
    Ok(Json(catalog::get_series(state.db.pool(), id).await?))
}

async fn create_series_handler(
    State(state): State<AppState>,
    ApiJson(series): ApiJson<NewSeries>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = catalog::insert_series(state.db.pool(), &series).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, "Series"))))
}

async fn update_series_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<SeriesPatch>,
) -> ApiResult<Json<MessageResponse>> {
    catalog::update_series(state.db.pool(), id, &patch).await?;
    Ok(Json(MessageResponse::updated("Series")))
}

async fn delete_series_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    catalog::delete_series(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Recommended Book Handlers
// ==================

async fn list_recommended_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RecommendedBookWithGenres>>> {
    Ok(Json(catalog::list_recommended_books(state.db.pool()).await?))
}

async fn get_recommended_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<RecommendedBookWithGenres>> {
    Ok(Json(catalog::get_recommended_book(state.db.pool(), id).await?))
}

async fn create_recommended_handler(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<NewRecommendedBook>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = catalog::insert_recommended_book(state.db.pool(), &book).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id, "Recommended book"))))
}

async fn delete_recommended_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    catalog::delete_recommended_book(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
