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


//! Library statistics
//!
//! Totals per entity type, a reading-status breakdown and the newest books.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::storage::catalog::count_rows;
use crate::storage::queries;

/// Number of books listed in `recent_books`
pub const RECENT_BOOKS_LIMIT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBook {
    pub id: i64,
    pub title: String,
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_authors: i64,
    pub total_publishers: i64,
    pub total_genres: i64,
    pub total_topics: i64,
    pub total_categories: i64,
    pub total_series: i64,
    pub total_recommended_books: i64,
    /// Book count per reading status; statuses without books are absent
    pub reading_status: BTreeMap<String, i64>,
    pub recent_books: Vec<RecentBook>,
}

/// Compute the current library statistics
pub async fn library_stats(pool: &SqlitePool) -> Result<LibraryStats> {
    let reading_status = queries::count_books_by_status(pool)
        .await?
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();

    let recent_books = queries::recent_books(pool, RECENT_BOOKS_LIMIT)
        .await?
        .into_iter()
        .map(|(book, authors)| RecentBook {
            id: book.id,
            title: book.title,
            authors,
        })
        .collect();

    Ok(LibraryStats {
        total_books: queries::count_books(pool).await?,
        total_authors: count_rows(pool, "authors").await?,
        total_publishers: count_rows(pool, "publishers").await?,
        total_genres: count_rows(pool, "genres").await?,
        total_topics: count_rows(pool, "topics").await?,
        total_categories: count_rows(pool, "categories").await?,
        total_series: count_rows(pool, "series").await?,
        total_recommended_books: count_rows(pool, "recommended_books").await?,
        reading_status,
        recent_books,
    })
}
