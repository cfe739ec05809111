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


//! Database storage and models
//!
//! This module handles all catalog persistence using SQLite through sqlx.
//!
//! # Database Schema
//! - Books: bibliographic data plus reading progress
//! - Authors, Publishers, Series: the people and imprints behind books
//! - Genres, Topics, Categories: classification terms
//! - Recommended books: suggestions that are not in the library yet
//! - Association tables for every many-to-many relationship
//!
//! # Usage Example
//! ```no_run
//! use bookshelf::storage::{catalog, queries, Database, NewBook, NewPublisher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://library.db").await?;
//!
//! let publisher_id = catalog::insert_publisher(db.pool(), &NewPublisher::new("Penguin")).await?;
//! let book_id = queries::insert_book(db.pool(), &NewBook::new("1984", publisher_id)).await?;
//!
//! let book = queries::get_book_detail(db.pool(), book_id).await?;
//! assert_eq!(book.book.title, "1984");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod database;
pub mod links;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;
pub mod stats;
pub mod update;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Author, AuthorPatch, Book, BookPatch, EntityRef, NewAuthor, NewBook, NewPublisher,
    NewRecommendedBook, NewSeries, NewTaxonomyTerm, Publisher, PublisherPatch, ReadingStatus,
    RecommendedBook, Series, SeriesPatch, TaxonomyKind, TaxonomyTerm, TaxonomyTermPatch,
};
pub use queries::{BookDetail, BookFilter, BookWithRelations};
pub use stats::LibraryStats;
