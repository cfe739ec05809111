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


//! Catalog export
//!
//! Serializes every book to CSV or JSON. Both formats list books in id order
//! with author names joined as "First Last" and the publisher by name.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{CatalogError, Result};
use crate::storage::queries::{self, BookFilter};
use crate::storage::ReadingStatus;

const CSV_HEADER: [&str; 9] = [
    "ID",
    "Title",
    "ISBN",
    "Year",
    "Pages",
    "Authors",
    "Publisher",
    "Status",
    "Rating",
];

/// One exported book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedBook {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub pages: Option<i32>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub status: ReadingStatus,
    pub rating: Option<f64>,
}

/// JSON export document
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub export_date: String,
    pub total: usize,
    pub books: Vec<ExportedBook>,
}

/// CSV row; authors are flattened into one cell
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: i64,
    title: &'a str,
    isbn: Option<&'a str>,
    year: Option<i32>,
    pages: Option<i32>,
    authors: String,
    publisher: Option<&'a str>,
    status: ReadingStatus,
    rating: Option<f64>,
}

impl<'a> From<&'a ExportedBook> for CsvRow<'a> {
    fn from(book: &'a ExportedBook) -> Self {
        Self {
            id: book.id,
            title: &book.title,
            isbn: book.isbn.as_deref(),
            year: book.year,
            pages: book.pages,
            authors: book.authors.join(", "),
            publisher: book.publisher.as_deref(),
            status: book.status,
            rating: book.rating,
        }
    }
}

/// Load every book in export shape
pub async fn exported_books(pool: &SqlitePool) -> Result<Vec<ExportedBook>> {
    let rows = queries::list_book_rows(pool, &BookFilter::default()).await?;
    let ids: Vec<i64> = rows.iter().map(|row| row.book.id).collect();
    let mut authors = queries::author_names_by_book(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| ExportedBook {
            authors: authors.remove(&row.book.id).unwrap_or_default(),
            id: row.book.id,
            title: row.book.title,
            isbn: row.book.isbn,
            year: row.book.publication_year,
            pages: row.book.pages,
            publisher: row.publisher_name,
            status: row.book.reading_status,
            rating: row.book.rating,
        })
        .collect())
}

/// Render the catalog as CSV
pub async fn export_csv(pool: &SqlitePool) -> Result<Vec<u8>> {
    let books = exported_books(pool).await?;
    write_csv(&books)
}

fn write_csv(books: &[ExportedBook]) -> Result<Vec<u8>> {
    // Header is written by hand so an empty catalog still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for book in books {
        writer.serialize(CsvRow::from(book))?;
    }

    writer
        .into_inner()
        .map_err(|e| CatalogError::IoError(e.into_error()))
}

/// Render the catalog as a pretty-printed JSON document
pub async fn export_json(pool: &SqlitePool) -> Result<Vec<u8>> {
    let books = exported_books(pool).await?;
    let document = ExportDocument {
        export_date: Local::now().to_rfc3339(),
        total: books.len(),
        books,
    };

    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Download filename for an export made on `date`, e.g. `library_20250101.csv`
pub fn export_filename(extension: &str, date: NaiveDate) -> String {
    format!("library_{}.{}", date.format("%Y%m%d"), extension)
}

/// Export filename for today's local date
pub fn today_export_filename(extension: &str) -> String {
    export_filename(extension, Local::now().date_naive())
}
