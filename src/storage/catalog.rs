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


//! Catalog entity queries
//!
//! Repository functions for everything that is not a book: authors,
//! publishers, genres/topics/categories (taxonomy terms), series and
//! recommended books.
//!
//! Lookups by id return `NotFound` when the row is absent. Deletes remove the
//! entity's association rows through `ON DELETE CASCADE`; books that point at
//! a deleted series or category are detached, and deleting a publisher that
//! still has books fails with a foreign key violation.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{CatalogError, Result};
use crate::storage::links::{load_link_refs, replace_links, RECOMMENDED_BOOK_GENRES, SERIES_AUTHORS};
use crate::storage::models::*;
use crate::storage::update::ColumnUpdate;

/// Series with its author summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesWithAuthors {
    #[serde(flatten)]
    pub series: Series,
    pub authors: Vec<EntityRef>,
}

/// Recommended book with its genre summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBookWithGenres {
    #[serde(flatten)]
    pub book: RecommendedBook,
    pub genres: Vec<EntityRef>,
}

/// Count the rows of one catalog table
pub async fn count_rows(pool: &SqlitePool, table: &'static str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

/// Delete one row by id, mapping "nothing deleted" to NotFound
async fn delete_row(pool: &SqlitePool, table: &'static str, entity: &'static str, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", table);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(entity, id));
    }

    tracing::debug!(entity, id, "deleted row");
    Ok(())
}

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

pub async fn insert_author(pool: &SqlitePool, author: &NewAuthor) -> Result<i64> {
    author.validate()?;

    let result = sqlx::query("INSERT INTO authors (first_name, last_name, biography) VALUES (?, ?, ?)")
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_author_by_id(pool: &SqlitePool, author_id: i64) -> Result<Option<Author>> {
    let author = sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, biography FROM authors WHERE id = ?",
    )
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

pub async fn get_author(pool: &SqlitePool, author_id: i64) -> Result<Author> {
    find_author_by_id(pool, author_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Author", author_id))
}

pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, biography FROM authors ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

/// Apply a partial update to an author and return the result
pub async fn update_author(pool: &SqlitePool, author_id: i64, patch: &AuthorPatch) -> Result<Author> {
    patch.validate()?;

    let mut update = ColumnUpdate::new("authors");
    patch.push_columns(&mut update);
    let result = update.finish(author_id).build().execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Author", author_id));
    }

    get_author(pool, author_id).await
}

/// Delete an author; its book and series links go with it
pub async fn delete_author(pool: &SqlitePool, author_id: i64) -> Result<()> {
    delete_row(pool, "authors", "Author", author_id).await
}

// ============================================================================
// PUBLISHER QUERIES
// ============================================================================

/// Insert a publisher; a duplicate name is a unique constraint violation
pub async fn insert_publisher(pool: &SqlitePool, publisher: &NewPublisher) -> Result<i64> {
    publisher.validate()?;

    let result = sqlx::query("INSERT INTO publishers (name, country) VALUES (?, ?)")
        .bind(&publisher.name)
        .bind(&publisher.country)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_publisher(pool: &SqlitePool, publisher_id: i64) -> Result<Publisher> {
    sqlx::query_as::<_, Publisher>("SELECT id, name, country FROM publishers WHERE id = ?")
        .bind(publisher_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("Publisher", publisher_id))
}

pub async fn list_publishers(pool: &SqlitePool) -> Result<Vec<Publisher>> {
    let publishers =
        sqlx::query_as::<_, Publisher>("SELECT id, name, country FROM publishers ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(publishers)
}

pub async fn update_publisher(
    pool: &SqlitePool,
    publisher_id: i64,
    patch: &PublisherPatch,
) -> Result<Publisher> {
    patch.validate()?;

    let mut update = ColumnUpdate::new("publishers");
    patch.push_columns(&mut update);
    let result = update.finish(publisher_id).build().execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Publisher", publisher_id));
    }

    get_publisher(pool, publisher_id).await
}

pub async fn delete_publisher(pool: &SqlitePool, publisher_id: i64) -> Result<()> {
    delete_row(pool, "publishers", "Publisher", publisher_id).await
}

// ============================================================================
// TAXONOMY QUERIES (genres, topics, categories)
// ============================================================================

pub async fn insert_term(pool: &SqlitePool, kind: TaxonomyKind, term: &NewTaxonomyTerm) -> Result<i64> {
    term.validate()?;

    let sql = format!("INSERT INTO {} (name, description) VALUES (?, ?)", kind.table());
    let result = sqlx::query(&sql)
        .bind(&term.name)
        .bind(&term.description)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_term(pool: &SqlitePool, kind: TaxonomyKind, term_id: i64) -> Result<TaxonomyTerm> {
    let sql = format!("SELECT id, name, description FROM {} WHERE id = ?", kind.table());
    sqlx::query_as::<_, TaxonomyTerm>(&sql)
        .bind(term_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(kind.entity(), term_id))
}

pub async fn list_terms(pool: &SqlitePool, kind: TaxonomyKind) -> Result<Vec<TaxonomyTerm>> {
    let sql = format!("SELECT id, name, description FROM {} ORDER BY id", kind.table());
    let terms = sqlx::query_as::<_, TaxonomyTerm>(&sql).fetch_all(pool).await?;

    Ok(terms)
}

pub async fn update_term(
    pool: &SqlitePool,
    kind: TaxonomyKind,
    term_id: i64,
    patch: &TaxonomyTermPatch,
) -> Result<TaxonomyTerm> {
    patch.validate()?;

    let mut update = ColumnUpdate::new(kind.table());
    patch.push_columns(&mut update);
    let result = update.finish(term_id).build().execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(kind.entity(), term_id));
    }

    get_term(pool, kind, term_id).await
}

pub async fn delete_term(pool: &SqlitePool, kind: TaxonomyKind, term_id: i64) -> Result<()> {
    delete_row(pool, kind.table(), kind.entity(), term_id).await
}

// ============================================================================
// SERIES QUERIES
// ============================================================================

/// Insert a series and link its authors
pub async fn insert_series(pool: &SqlitePool, series: &NewSeries) -> Result<i64> {
    series.validate()?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO series (name, description, total_books) VALUES (?, ?, ?)")
        .bind(&series.name)
        .bind(&series.description)
        .bind(series.total_books)
        .execute(&mut *tx)
        .await?;
    let series_id = result.last_insert_rowid();

    replace_links(&mut tx, &SERIES_AUTHORS, series_id, &series.author_ids).await?;

    tx.commit().await?;
    Ok(series_id)
}

pub async fn get_series(pool: &SqlitePool, series_id: i64) -> Result<SeriesWithAuthors> {
    let series = sqlx::query_as::<_, Series>(
        "SELECT id, name, description, total_books FROM series WHERE id = ?",
    )
    .bind(series_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| CatalogError::not_found("Series", series_id))?;

    let mut authors = load_link_refs(pool, &SERIES_AUTHORS, &[series_id]).await?;
    Ok(SeriesWithAuthors {
        series,
        authors: authors.remove(&series_id).unwrap_or_default(),
    })
}

pub async fn list_series(pool: &SqlitePool) -> Result<Vec<SeriesWithAuthors>> {
    let all = sqlx::query_as::<_, Series>(
        "SELECT id, name, description, total_books FROM series ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = all.iter().map(|s| s.id).collect();
    let mut authors = load_link_refs(pool, &SERIES_AUTHORS, &ids).await?;

    Ok(all
        .into_iter()
        .map(|series| SeriesWithAuthors {
            authors: authors.remove(&series.id).unwrap_or_default(),
            series,
        })
        .collect())
}

pub async fn update_series(
    pool: &SqlitePool,
    series_id: i64,
    patch: &SeriesPatch,
) -> Result<SeriesWithAuthors> {
    patch.validate()?;

    let mut update = ColumnUpdate::new("series");
    patch.push_columns(&mut update);

    // The write comes first so the transaction never upgrades a read snapshot
    let mut tx = pool.begin().await?;
    let result = update.finish(series_id).build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Series", series_id));
    }
    if let Some(ids) = &patch.author_ids {
        replace_links(&mut tx, &SERIES_AUTHORS, series_id, ids).await?;
    }
    tx.commit().await?;

    get_series(pool, series_id).await
}

/// Delete a series; its books stay and lose their series reference
pub async fn delete_series(pool: &SqlitePool, series_id: i64) -> Result<()> {
    delete_row(pool, "series", "Series", series_id).await
}

// ============================================================================
// RECOMMENDED BOOK QUERIES
// ============================================================================

pub async fn insert_recommended_book(pool: &SqlitePool, book: &NewRecommendedBook) -> Result<i64> {
    book.validate()?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO recommended_books (
            title, author_name, isbn, publication_year, pages, language,
            description, average_rating
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(&book.author_name)
    .bind(&book.isbn)
    .bind(book.publication_year)
    .bind(book.pages)
    .bind(&book.language)
    .bind(&book.description)
    .bind(book.average_rating)
    .execute(&mut *tx)
    .await?;
    let book_id = result.last_insert_rowid();

    replace_links(&mut tx, &RECOMMENDED_BOOK_GENRES, book_id, &book.genre_ids).await?;

    tx.commit().await?;
    Ok(book_id)
}

const RECOMMENDED_COLUMNS: &str = "id, title, author_name, isbn, publication_year, pages, \
     language, description, average_rating";

pub async fn get_recommended_book(pool: &SqlitePool, book_id: i64) -> Result<RecommendedBookWithGenres> {
    let sql = format!("SELECT {RECOMMENDED_COLUMNS} FROM recommended_books WHERE id = ?");
    let book = sqlx::query_as::<_, RecommendedBook>(&sql)
        .bind(book_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("RecommendedBook", book_id))?;

    let mut genres = load_link_refs(pool, &RECOMMENDED_BOOK_GENRES, &[book_id]).await?;
    Ok(RecommendedBookWithGenres {
        book,
        genres: genres.remove(&book_id).unwrap_or_default(),
    })
}

pub async fn list_recommended_books(pool: &SqlitePool) -> Result<Vec<RecommendedBookWithGenres>> {
    let sql = format!("SELECT {RECOMMENDED_COLUMNS} FROM recommended_books ORDER BY id");
    let books = sqlx::query_as::<_, RecommendedBook>(&sql).fetch_all(pool).await?;

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let mut genres = load_link_refs(pool, &RECOMMENDED_BOOK_GENRES, &ids).await?;

    Ok(books
        .into_iter()
        .map(|book| RecommendedBookWithGenres {
            genres: genres.remove(&book.id).unwrap_or_default(),
            book,
        })
        .collect())
}

pub async fn delete_recommended_book(pool: &SqlitePool, book_id: i64) -> Result<()> {
    delete_row(pool, "recommended_books", "RecommendedBook", book_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintKind;
    use crate::storage::database::Database;
    use crate::storage::links::{count_links, BOOK_AUTHORS};
    use crate::storage::queries;

    #[tokio::test]
    async fn test_author_crud() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let mut new_author = NewAuthor::new("Stephen", "King");
        new_author.biography = Some("American author of horror fiction".to_string());
        let author_id = insert_author(db.pool(), &new_author).await.expect("Failed to insert author");

        let patch = AuthorPatch {
            first_name: Some("Richard".to_string()),
            ..Default::default()
        };
        let updated = update_author(db.pool(), author_id, &patch).await.unwrap();
        assert_eq!(updated.full_name(), "Richard King");
        assert_eq!(updated.biography.as_deref(), Some("American author of horror fiction"));

        let listed = list_authors(db.pool()).await.unwrap();
        assert_eq!(listed, vec![updated]);

        delete_author(db.pool(), author_id).await.unwrap();
        assert!(get_author(db.pool(), author_id).await.unwrap_err().is_not_found());
        assert!(delete_author(db.pool(), author_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_disjoint_author_patches_both_survive() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let author_id = insert_author(db.pool(), &NewAuthor::new("Eric", "Blair")).await.unwrap();

        let first: AuthorPatch = serde_json::from_str(r#"{"first_name": "George"}"#).unwrap();
        let last: AuthorPatch = serde_json::from_str(r#"{"last_name": "Orwell"}"#).unwrap();
        update_author(db.pool(), author_id, &first).await.unwrap();
        let author = update_author(db.pool(), author_id, &last).await.unwrap();

        assert_eq!(author.full_name(), "George Orwell");

        // An empty patch is a no-op, not a NotFound
        let same = update_author(db.pool(), author_id, &AuthorPatch::default()).await.unwrap();
        assert_eq!(same, author);
        let err = update_author(db.pool(), 999, &AuthorPatch::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "Author", id: 999 }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_author_patches_do_not_lose_updates() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("library.db").display());
        let db = Database::connect(&url).await.expect("Failed to open file database");

        for round in 0..25 {
            let author_id = insert_author(db.pool(), &NewAuthor::new("A", "B")).await.unwrap();

            let pool = db.pool().clone();
            let first = tokio::spawn(async move {
                let patch = AuthorPatch {
                    first_name: Some("X".to_string()),
                    ..Default::default()
                };
                update_author(&pool, author_id, &patch).await
            });
            let pool = db.pool().clone();
            let last = tokio::spawn(async move {
                let patch = AuthorPatch {
                    last_name: Some("Y".to_string()),
                    ..Default::default()
                };
                update_author(&pool, author_id, &patch).await
            });
            first.await.unwrap().unwrap();
            last.await.unwrap().unwrap();

            let author = get_author(db.pool(), author_id).await.unwrap();
            assert_eq!(author.full_name(), "X Y", "round {}", round);
        }

        db.close().await.expect("Failed to close database");
    }

    #[tokio::test]
    async fn test_blank_author_name_is_rejected() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let err = insert_author(db.pool(), &NewAuthor::new("George", " ")).await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingRequiredField(ref f) if f == "last_name"));
    }

    #[tokio::test]
    async fn test_deleting_author_keeps_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let publisher_id = insert_publisher(db.pool(), &NewPublisher::new("Penguin")).await.unwrap();
        let author_id = insert_author(db.pool(), &NewAuthor::new("George", "Orwell")).await.unwrap();

        let mut book = NewBook::new("Animal Farm", publisher_id);
        book.author_ids = vec![author_id];
        let book_id = queries::insert_book(db.pool(), &book).await.unwrap();

        let mut series = NewSeries::new("Essays");
        series.author_ids = vec![author_id];
        let series_id = insert_series(db.pool(), &series).await.unwrap();

        delete_author(db.pool(), author_id).await.unwrap();

        assert!(queries::get_book(db.pool(), book_id).await.is_ok());
        assert_eq!(count_links(db.pool(), &BOOK_AUTHORS, book_id).await.unwrap(), 0);
        assert!(get_series(db.pool(), series_id).await.unwrap().authors.is_empty());
    }

    #[tokio::test]
    async fn test_publisher_names_are_unique() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        insert_publisher(db.pool(), &NewPublisher::new("HarperCollins")).await.unwrap();

        let err = insert_publisher(db.pool(), &NewPublisher::new("HarperCollins"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(list_publishers(db.pool()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publisher_with_books_cannot_be_deleted() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let publisher_id = insert_publisher(db.pool(), &NewPublisher::new("Oxford")).await.unwrap();
        queries::insert_book(db.pool(), &NewBook::new("Dictionary", publisher_id))
            .await
            .unwrap();

        let err = delete_publisher(db.pool(), publisher_id).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ConstraintViolation { kind: ConstraintKind::ForeignKey, .. }
        ));
    }

    #[tokio::test]
    async fn test_publisher_patch() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let mut new_publisher = NewPublisher::new("Oxford University Press");
        new_publisher.country = Some("UK".to_string());
        let publisher_id = insert_publisher(db.pool(), &new_publisher).await.unwrap();

        let patch: PublisherPatch = serde_json::from_str(r#"{"country": null}"#).unwrap();
        let publisher = update_publisher(db.pool(), publisher_id, &patch).await.unwrap();
        assert_eq!(publisher.name, "Oxford University Press");
        assert!(publisher.country.is_none());
    }

    #[tokio::test]
    async fn test_rename_to_existing_publisher_is_conflict() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        insert_publisher(db.pool(), &NewPublisher::new("Penguin")).await.unwrap();
        let harper = insert_publisher(db.pool(), &NewPublisher::new("Harper")).await.unwrap();

        let patch = PublisherPatch {
            name: Some("Penguin".to_string()),
            ..Default::default()
        };
        let err = update_publisher(db.pool(), harper, &patch).await.unwrap_err();
        assert!(err.is_conflict());

        let err = update_publisher(db.pool(), 404, &PublisherPatch::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_taxonomy_tables_are_separate() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let genre = insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Fiction"))
            .await
            .unwrap();
        // Same name in a different taxonomy is fine
        insert_term(db.pool(), TaxonomyKind::Topic, &NewTaxonomyTerm::new("Fiction"))
            .await
            .unwrap();
        let err = insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Fiction"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let patch = TaxonomyTermPatch {
            description: Some(Some("Literary fiction".to_string())),
            ..Default::default()
        };
        let term = update_term(db.pool(), TaxonomyKind::Genre, genre, &patch).await.unwrap();
        assert_eq!(term.description.as_deref(), Some("Literary fiction"));

        assert_eq!(list_terms(db.pool(), TaxonomyKind::Genre).await.unwrap().len(), 1);
        assert!(list_terms(db.pool(), TaxonomyKind::Category).await.unwrap().is_empty());

        let err = get_term(db.pool(), TaxonomyKind::Category, genre).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "Category", .. }));
    }

    #[tokio::test]
    async fn test_deleting_category_detaches_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let publisher_id = insert_publisher(db.pool(), &NewPublisher::new("Penguin")).await.unwrap();
        let category_id =
            insert_term(db.pool(), TaxonomyKind::Category, &NewTaxonomyTerm::new("Favorites"))
                .await
                .unwrap();

        let mut book = NewBook::new("1984", publisher_id);
        book.category_id = Some(category_id);
        let book_id = queries::insert_book(db.pool(), &book).await.unwrap();

        delete_term(db.pool(), TaxonomyKind::Category, category_id).await.unwrap();

        let book = queries::get_book(db.pool(), book_id).await.unwrap();
        assert!(book.category_id.is_none());
    }

    #[tokio::test]
    async fn test_series_with_authors() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let rowling = insert_author(db.pool(), &NewAuthor::new("J.K.", "Rowling")).await.unwrap();
        let king = insert_author(db.pool(), &NewAuthor::new("Stephen", "King")).await.unwrap();

        let mut new_series = NewSeries::new("Harry Potter");
        new_series.total_books = Some(7);
        new_series.author_ids = vec![rowling];
        let series_id = insert_series(db.pool(), &new_series).await.unwrap();

        let listed = list_series(db.pool()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].series.total_books, Some(7));
        assert_eq!(listed[0].authors, vec![EntityRef::new(rowling, "J.K. Rowling")]);

        let patch = SeriesPatch {
            author_ids: Some(vec![rowling, king]),
            ..Default::default()
        };
        let updated = update_series(db.pool(), series_id, &patch).await.unwrap();
        assert_eq!(updated.authors.len(), 2);
        assert_eq!(updated.series.name, "Harry Potter");
    }

    #[tokio::test]
    async fn test_recommended_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let scifi = insert_term(db.pool(), TaxonomyKind::Genre, &NewTaxonomyTerm::new("Science Fiction"))
            .await
            .unwrap();

        let mut rec = NewRecommendedBook::new("Dune", "Frank Herbert");
        rec.average_rating = Some(4.3);
        rec.genre_ids = vec![scifi];
        let rec_id = insert_recommended_book(db.pool(), &rec).await.unwrap();

        let found = get_recommended_book(db.pool(), rec_id).await.unwrap();
        assert_eq!(found.book.language.as_deref(), Some("English"));
        assert_eq!(found.genres, vec![EntityRef::new(scifi, "Science Fiction")]);

        // Deleting the genre removes only the link
        delete_term(db.pool(), TaxonomyKind::Genre, scifi).await.unwrap();
        let listed = list_recommended_books(db.pool()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].genres.is_empty());

        delete_recommended_book(db.pool(), rec_id).await.unwrap();
        assert_eq!(count_rows(db.pool(), "recommended_books").await.unwrap(), 0);
    }
}
