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


//! Book query functions
//!
//! This module implements the repository functions for books: create, lookup,
//! filtered listing with eager-loaded relations, partial update and delete.
//!
//! # Query Patterns
//! - Async/await for all database operations
//! - Multi-step writes (book row + association rows) run in one transaction
//! - Relations are loaded with one batched query per association table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::error::{CatalogError, Result};
use crate::storage::links::{load_link_refs, replace_links, BOOK_AUTHORS, BOOK_GENRES, BOOK_TOPICS};
use crate::storage::models::*;
use crate::storage::update::ColumnUpdate;

/// Book columns, qualified with the `b` alias used by every book query
const BOOK_COLUMNS: &str = "b.id, b.title, b.isbn, b.publication_year, b.pages, b.language, \
     b.description, b.reading_status, b.current_page, b.notes, b.rating, b.date_started, \
     b.date_completed, b.publisher_id, b.series_id, b.series_position, b.category_id, b.created_at";

// ============================================================================
// FILTERS
// ============================================================================

/// Filters accepted by the book list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFilter {
    /// Case-insensitive substring matched against title and description
    pub search: Option<String>,
    /// Exact reading status
    pub status: Option<ReadingStatus>,
}

impl BookFilter {
    /// Build a filter from raw query-string values
    ///
    /// Empty values are treated as absent; an unknown status is rejected.
    pub fn from_params(search: Option<&str>, status: Option<&str>) -> Result<Self> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<ReadingStatus>()?),
            None => None,
        };
        Ok(Self { search, status })
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(status) = self.status {
            qb.push(" AND b.reading_status = ").push_bind(status);
        }
    }

    /// Whether `book` matches the search term
    ///
    /// SQLite's `LOWER()` only folds ASCII, so both sides are folded here
    /// with full Unicode case mapping.
    pub fn matches_search(&self, book: &Book) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        book.title.to_lowercase().contains(&needle)
            || book
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// RESPONSE SHAPES
// ============================================================================

/// Book row joined with the names of its single-valued relations
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    #[sqlx(flatten)]
    pub book: Book,
    pub publisher_name: Option<String>,
    pub series_name: Option<String>,
    pub category_name: Option<String>,
}

/// List item: book summary with denormalized relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWithRelations {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub pages: Option<i32>,
    pub reading_status: ReadingStatus,
    pub current_page: i32,
    pub rating: Option<f64>,
    pub publisher: Option<EntityRef>,
    pub authors: Vec<EntityRef>,
    pub genres: Vec<EntityRef>,
    pub series: Option<EntityRef>,
    pub category: Option<EntityRef>,
}

/// Full book detail: every column plus the linked ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub author_ids: Vec<i64>,
    pub genre_ids: Vec<i64>,
    pub topic_ids: Vec<i64>,
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book together with its author/genre/topic links
///
/// Returns the id of the inserted book. A dangling `publisher_id`,
/// `series_id` or `category_id` is rejected by the foreign key constraint.
pub async fn insert_book(pool: &SqlitePool, book: &NewBook) -> Result<i64> {
    book.validate()?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO books (
            title, isbn, publication_year, pages, language, description,
            reading_status, current_page, notes, rating, date_started, date_completed,
            publisher_id, series_id, series_position, category_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(&book.isbn)
    .bind(book.publication_year)
    .bind(book.pages)
    .bind(&book.language)
    .bind(&book.description)
    .bind(book.reading_status)
    .bind(book.current_page)
    .bind(&book.notes)
    .bind(book.rating)
    .bind(book.date_started)
    .bind(book.date_completed)
    .bind(book.publisher_id)
    .bind(book.series_id)
    .bind(book.series_position)
    .bind(book.category_id)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;

    let book_id = result.last_insert_rowid();

    replace_links(&mut tx, &BOOK_AUTHORS, book_id, &book.author_ids).await?;
    replace_links(&mut tx, &BOOK_GENRES, book_id, &book.genre_ids).await?;
    replace_links(&mut tx, &BOOK_TOPICS, book_id, &book.topic_ids).await?;

    tx.commit().await?;

    tracing::debug!(book_id, title = %book.title, "inserted book");
    Ok(book_id)
}

/// Find book by ID
pub async fn find_book_by_id(pool: &SqlitePool, book_id: i64) -> Result<Option<Book>> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = ?");
    let book = sqlx::query_as::<_, Book>(&sql)
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// Get book by ID, failing with NotFound when it does not exist
pub async fn get_book(pool: &SqlitePool, book_id: i64) -> Result<Book> {
    find_book_by_id(pool, book_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Book", book_id))
}

/// Get the full detail of one book, including linked ids
pub async fn get_book_detail(pool: &SqlitePool, book_id: i64) -> Result<BookDetail> {
    let book = get_book(pool, book_id).await?;

    let ids = |mut refs: HashMap<i64, Vec<EntityRef>>| -> Vec<i64> {
        refs.remove(&book_id)
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.id)
            .collect()
    };

    let author_ids = ids(load_link_refs(pool, &BOOK_AUTHORS, &[book_id]).await?);
    let genre_ids = ids(load_link_refs(pool, &BOOK_GENRES, &[book_id]).await?);
    let topic_ids = ids(load_link_refs(pool, &BOOK_TOPICS, &[book_id]).await?);

    Ok(BookDetail {
        book,
        author_ids,
        genre_ids,
        topic_ids,
    })
}

/// Load book rows matching `filter`, ordered by id
pub async fn list_book_rows(pool: &SqlitePool, filter: &BookFilter) -> Result<Vec<BookRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {BOOK_COLUMNS}, p.name AS publisher_name, s.name AS series_name, \
         c.name AS category_name \
         FROM books b \
         LEFT JOIN publishers p ON p.id = b.publisher_id \
         LEFT JOIN series s ON s.id = b.series_id \
         LEFT JOIN categories c ON c.id = b.category_id \
         WHERE 1 = 1"
    ));
    filter.push_conditions(&mut qb);
    qb.push(" ORDER BY b.id");

    let mut rows = qb.build_query_as::<BookRow>().fetch_all(pool).await?;
    rows.retain(|row| filter.matches_search(&row.book));
    Ok(rows)
}

/// List books matching `filter` (no relations)
pub async fn list_books(pool: &SqlitePool, filter: &BookFilter) -> Result<Vec<Book>> {
    let rows = list_book_rows(pool, filter).await?;
    Ok(rows.into_iter().map(|row| row.book).collect())
}

/// List books matching `filter` with publisher, authors, genres, series and
/// category summaries eager-loaded
pub async fn list_books_with_relations(
    pool: &SqlitePool,
    filter: &BookFilter,
) -> Result<Vec<BookWithRelations>> {
    let rows = list_book_rows(pool, filter).await?;
    let book_ids: Vec<i64> = rows.iter().map(|row| row.book.id).collect();

    let mut authors = load_link_refs(pool, &BOOK_AUTHORS, &book_ids).await?;
    let mut genres = load_link_refs(pool, &BOOK_GENRES, &book_ids).await?;

    let books = rows
        .into_iter()
        .map(|row| {
            let book = row.book;
            let name_ref = |id: Option<i64>, name: Option<String>| match (id, name) {
                (Some(id), Some(name)) => Some(EntityRef { id, name }),
                _ => None,
            };
            BookWithRelations {
                publisher: name_ref(Some(book.publisher_id), row.publisher_name),
                series: name_ref(book.series_id, row.series_name),
                category: name_ref(book.category_id, row.category_name),
                authors: authors.remove(&book.id).unwrap_or_default(),
                genres: genres.remove(&book.id).unwrap_or_default(),
                id: book.id,
                title: book.title,
                isbn: book.isbn,
                publication_year: book.publication_year,
                pages: book.pages,
                reading_status: book.reading_status,
                current_page: book.current_page,
                rating: book.rating,
            }
        })
        .collect();

    Ok(books)
}

/// Apply a partial update to a book
///
/// Only fields present in the patch change. A supplied relation id list
/// replaces the existing links. Returns the updated book.
pub async fn update_book(pool: &SqlitePool, book_id: i64, patch: &BookPatch) -> Result<Book> {
    patch.validate()?;

    let mut update = ColumnUpdate::new("books");
    patch.push_columns(&mut update);

    // The write comes first so the transaction never upgrades a read snapshot
    let mut tx = pool.begin().await?;
    let result = update.finish(book_id).build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Book", book_id));
    }

    if let Some(ids) = &patch.author_ids {
        replace_links(&mut tx, &BOOK_AUTHORS, book_id, ids).await?;
    }
    if let Some(ids) = &patch.genre_ids {
        replace_links(&mut tx, &BOOK_GENRES, book_id, ids).await?;
    }
    if let Some(ids) = &patch.topic_ids {
        replace_links(&mut tx, &BOOK_TOPICS, book_id, ids).await?;
    }

    let sql = format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = ?");
    let book = sqlx::query_as::<_, Book>(&sql)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(book_id, columns = ?update.columns(), "updated book");
    Ok(book)
}

/// Delete a book
///
/// Its author/genre/topic links are removed by `ON DELETE CASCADE`; the
/// linked authors, genres and topics stay.
pub async fn delete_book(pool: &SqlitePool, book_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(book_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Book", book_id));
    }

    tracing::debug!(book_id, "deleted book");
    Ok(())
}

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count books per reading status; statuses without books are omitted
pub async fn count_books_by_status(pool: &SqlitePool) -> Result<Vec<(ReadingStatus, i64)>> {
    let rows = sqlx::query_as::<_, (ReadingStatus, i64)>(
        "SELECT reading_status, COUNT(*) FROM books GROUP BY reading_status ORDER BY reading_status",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Most recently created books, newest first, with "First Last" author names
pub async fn recent_books(pool: &SqlitePool, limit: i64) -> Result<Vec<(Book, Vec<String>)>> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b ORDER BY b.created_at DESC, b.id DESC LIMIT ?"
    );
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let mut authors = load_link_refs(pool, &BOOK_AUTHORS, &ids).await?;

    Ok(books
        .into_iter()
        .map(|book| {
            let names = authors
                .remove(&book.id)
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.name)
                .collect();
            (book, names)
        })
        .collect())
}

/// Author names per book id, for exports
pub async fn author_names_by_book(
    pool: &SqlitePool,
    book_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    let refs = load_link_refs(pool, &BOOK_AUTHORS, book_ids).await?;
    Ok(refs
        .into_iter()
        .map(|(book_id, authors)| (book_id, authors.into_iter().map(|a| a.name).collect()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintKind;
    use crate::storage::catalog;
    use crate::storage::database::Database;
    use crate::storage::links::count_links;

    async fn setup() -> (Database, i64) {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let publisher_id = catalog::insert_publisher(db.pool(), &NewPublisher::new("Penguin"))
            .await
            .expect("Failed to insert publisher");
        (db, publisher_id)
    }

    #[tokio::test]
    async fn test_insert_book_with_defaults() {
        let (db, publisher_id) = setup().await;

        let book_id = insert_book(db.pool(), &NewBook::new("Test Book", publisher_id))
            .await
            .expect("Failed to insert book");
        assert!(book_id > 0);

        let book = get_book(db.pool(), book_id).await.expect("Failed to find book");
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.reading_status, ReadingStatus::Unread);
        assert_eq!(book.current_page, 0);
        assert_eq!(book.publisher_id, publisher_id);
        assert!(book.rating.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_book_is_not_found() {
        let (db, _) = setup().await;
        let err = get_book(db.pool(), 404).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "Book", id: 404 }));
    }

    #[tokio::test]
    async fn test_insert_book_with_unknown_publisher_violates_foreign_key() {
        let (db, _) = setup().await;
        let err = insert_book(db.pool(), &NewBook::new("Orphan", 999)).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ConstraintViolation { kind: ConstraintKind::ForeignKey, .. }
        ));
        assert_eq!(count_books(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rating_patch_changes_only_rating() {
        let (db, publisher_id) = setup().await;
        let author_id = catalog::insert_author(db.pool(), &NewAuthor::new("George", "Orwell"))
            .await
            .unwrap();

        let mut new_book = NewBook::new("1984", publisher_id);
        new_book.isbn = Some("9780451524935".to_string());
        new_book.pages = Some(328);
        new_book.author_ids = vec![author_id];
        let book_id = insert_book(db.pool(), &new_book).await.unwrap();
        let before = get_book_detail(db.pool(), book_id).await.unwrap();

        let patch: BookPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
        update_book(db.pool(), book_id, &patch).await.expect("Failed to update book");

        let after = get_book_detail(db.pool(), book_id).await.unwrap();
        let mut expected = before.clone();
        expected.book.rating = Some(4.5);
        assert_eq!(after, expected);
    }

    #[tokio::test]
    async fn test_update_replaces_links_when_supplied() {
        let (db, publisher_id) = setup().await;
        let fiction = catalog::insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Fiction"))
            .await
            .unwrap();
        let classic = catalog::insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Classic"))
            .await
            .unwrap();

        let mut new_book = NewBook::new("Animal Farm", publisher_id);
        new_book.genre_ids = vec![fiction];
        let book_id = insert_book(db.pool(), &new_book).await.unwrap();

        let patch = BookPatch {
            genre_ids: Some(vec![classic, 12345]),
            reading_status: Some(ReadingStatus::Completed),
            ..Default::default()
        };
        let book = update_book(db.pool(), book_id, &patch).await.unwrap();
        assert_eq!(book.reading_status, ReadingStatus::Completed);

        let detail = get_book_detail(db.pool(), book_id).await.unwrap();
        assert_eq!(detail.genre_ids, vec![classic]);
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let (db, _) = setup().await;
        let err = update_book(db.pool(), 7, &BookPatch::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_book_cascades_links_only() {
        let (db, publisher_id) = setup().await;
        let author_id = catalog::insert_author(db.pool(), &NewAuthor::new("Jane", "Austen"))
            .await
            .unwrap();
        let genre_id = catalog::insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Romance"))
            .await
            .unwrap();
        let topic_id = catalog::insert_term(db.pool(), TaxonomyKind::Topic, &NewTaxonomyTerm::new("Society"))
            .await
            .unwrap();

        let mut new_book = NewBook::new("Pride and Prejudice", publisher_id);
        new_book.author_ids = vec![author_id];
        new_book.genre_ids = vec![genre_id];
        new_book.topic_ids = vec![topic_id];
        let book_id = insert_book(db.pool(), &new_book).await.unwrap();

        delete_book(db.pool(), book_id).await.expect("Failed to delete book");

        assert!(list_books(db.pool(), &BookFilter::default()).await.unwrap().is_empty());
        for link in [&BOOK_AUTHORS, &BOOK_GENRES, &BOOK_TOPICS] {
            assert_eq!(count_links(db.pool(), link, book_id).await.unwrap(), 0);
        }
        assert!(catalog::get_author(db.pool(), author_id).await.is_ok());
        assert!(catalog::get_term(db.pool(), TaxonomyKind::Genre, genre_id).await.is_ok());

        assert!(delete_book(db.pool(), book_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_filters() {
        let (db, publisher_id) = setup().await;

        let mut dystopia = NewBook::new("1984", publisher_id);
        dystopia.description = Some("A Dystopian social science fiction novel".to_string());
        dystopia.reading_status = ReadingStatus::Completed;
        let dystopia_id = insert_book(db.pool(), &dystopia).await.unwrap();

        let mut reading = NewBook::new("The Shining", publisher_id);
        reading.reading_status = ReadingStatus::Reading;
        insert_book(db.pool(), &reading).await.unwrap();

        insert_book(db.pool(), &NewBook::new("100% Pure", publisher_id)).await.unwrap();

        let completed = list_books(
            db.pool(),
            &BookFilter { status: Some(ReadingStatus::Completed), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(completed.len(), 1);
        assert!(completed.iter().all(|b| b.reading_status == ReadingStatus::Completed));

        let search = BookFilter::from_params(Some("dystop"), None).unwrap();
        let found = list_books(db.pool(), &search).await.unwrap();
        assert_eq!(found.iter().map(|b| b.id).collect::<Vec<_>>(), vec![dystopia_id]);

        let title_search = BookFilter::from_params(Some("SHINING"), Some("")).unwrap();
        assert_eq!(list_books(db.pool(), &title_search).await.unwrap().len(), 1);

        // '%' in the search term is literal, not a wildcard
        let literal = BookFilter::from_params(Some("0%"), None).unwrap();
        let found = list_books(db.pool(), &literal).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "100% Pure");
    }

    #[test]
    fn test_filter_from_params() {
        let filter = BookFilter::from_params(Some(""), Some("")).unwrap();
        assert_eq!(filter, BookFilter::default());

        let filter = BookFilter::from_params(Some(" dune "), Some("reading")).unwrap();
        assert_eq!(filter.search.as_deref(), Some("dune"));
        assert_eq!(filter.status, Some(ReadingStatus::Reading));

        assert!(BookFilter::from_params(None, Some("abandoned")).is_err());
    }

    #[tokio::test]
    async fn test_list_with_relations_is_denormalized() {
        let (db, publisher_id) = setup().await;
        let author_id = catalog::insert_author(db.pool(), &NewAuthor::new("J.K.", "Rowling"))
            .await
            .unwrap();
        let series_id = catalog::insert_series(db.pool(), &NewSeries::new("Harry Potter"))
            .await
            .unwrap();

        let mut new_book = NewBook::new("Philosopher's Stone", publisher_id);
        new_book.author_ids = vec![author_id];
        new_book.series_id = Some(series_id);
        new_book.series_position = Some(1);
        insert_book(db.pool(), &new_book).await.unwrap();

        let books = list_books_with_relations(db.pool(), &BookFilter::default()).await.unwrap();
        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.publisher, Some(EntityRef::new(publisher_id, "Penguin")));
        assert_eq!(book.authors, vec![EntityRef::new(author_id, "J.K. Rowling")]);
        assert_eq!(book.series, Some(EntityRef::new(series_id, "Harry Potter")));
        assert!(book.category.is_none());
        assert!(book.genres.is_empty());
    }

    #[tokio::test]
    async fn test_count_by_status_and_recent_books() {
        let (db, publisher_id) = setup().await;
        for (title, status) in [
            ("A", ReadingStatus::Completed),
            ("B", ReadingStatus::Completed),
            ("C", ReadingStatus::Unread),
        ] {
            let mut book = NewBook::new(title, publisher_id);
            book.reading_status = status;
            insert_book(db.pool(), &book).await.unwrap();
        }

        let counts = count_books_by_status(db.pool()).await.unwrap();
        assert_eq!(
            counts,
            vec![(ReadingStatus::Completed, 2), (ReadingStatus::Unread, 1)]
        );

        let recent = recent_books(db.pool(), 2).await.unwrap();
        let titles: Vec<_> = recent.iter().map(|(b, _)| b.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let (db, publisher_id) = setup().await;

        let emile = insert_book(db.pool(), &NewBook::new("Émile ou De l'éducation", publisher_id))
            .await
            .unwrap();
        let mut crime = NewBook::new("Crime and Punishment", publisher_id);
        crime.description = Some("ПРЕСТУПЛЕНИЕ и наказание".to_string());
        let crime = insert_book(db.pool(), &crime).await.unwrap();

        for (term, expected) in [
            ("émile", emile),
            ("ÉMILE", emile),
            ("Émile", emile),
            ("L'ÉDUCATION", emile),
            ("преступление", crime),
            ("Наказание", crime),
        ] {
            let filter = BookFilter::from_params(Some(term), None).unwrap();
            let found: Vec<i64> = list_books(db.pool(), &filter)
                .await
                .unwrap()
                .iter()
                .map(|b| b.id)
                .collect();
            assert_eq!(found, vec![expected], "search {:?}", term);
        }

        // Search and status combine
        let filter = BookFilter::from_params(Some("émile"), Some("completed")).unwrap();
        assert!(list_books(db.pool(), &filter).await.unwrap().is_empty());
    }
}
