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


//! Sample library
//!
//! `bookshelf seed` wipes the catalog and loads a small, fixed library so the
//! API has something to show right away.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::storage::catalog::{self, count_rows};
use crate::storage::models::*;
use crate::storage::queries;

/// Row counts after seeding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub publishers: i64,
    pub authors: i64,
    pub books: i64,
    pub genres: i64,
    pub categories: i64,
    pub topics: i64,
    pub series: i64,
}

/// Delete every catalog row, leaving the schema in place
pub async fn clear_catalog(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    // Children before parents so foreign keys hold at every step
    for table in [
        "book_authors",
        "book_genres",
        "book_topics",
        "series_authors",
        "recommended_book_genres",
        "books",
        "recommended_books",
        "series",
        "authors",
        "publishers",
        "genres",
        "topics",
        "categories",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!("cleared catalog");
    Ok(())
}

/// Insert `(name, description)` terms of one kind, returning their ids in order
async fn insert_terms<const N: usize>(
    pool: &SqlitePool,
    kind: TaxonomyKind,
    terms: [(&str, &str); N],
) -> Result<[i64; N]> {
    let mut ids = [0; N];
    for (id, (name, description)) in ids.iter_mut().zip(terms) {
        let term = NewTaxonomyTerm {
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        *id = catalog::insert_term(pool, kind, &term).await?;
    }
    Ok(ids)
}

fn author(first_name: &str, last_name: &str, biography: &str) -> NewAuthor {
    NewAuthor {
        biography: Some(biography.to_string()),
        ..NewAuthor::new(first_name, last_name)
    }
}

fn publisher(name: &str, country: &str) -> NewPublisher {
    NewPublisher {
        country: Some(country.to_string()),
        ..NewPublisher::new(name)
    }
}

/// Bibliographic fields shared by every sample book
fn sample_book(
    title: &str,
    isbn: &str,
    year: i32,
    pages: i32,
    description: &str,
    publisher_id: i64,
) -> NewBook {
    NewBook {
        isbn: Some(isbn.to_string()),
        publication_year: Some(year),
        pages: Some(pages),
        language: Some("English".to_string()),
        description: Some(description.to_string()),
        ..NewBook::new(title, publisher_id)
    }
}

/// Replace the catalog with the sample library
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<SeedSummary> {
    clear_catalog(pool).await?;

    let penguin = catalog::insert_publisher(pool, &publisher("Penguin Random House", "USA")).await?;
    let harpercollins = catalog::insert_publisher(pool, &publisher("HarperCollins", "USA")).await?;
    catalog::insert_publisher(pool, &publisher("Oxford University Press", "UK")).await?;

    let orwell = catalog::insert_author(pool, &author("George", "Orwell", "English novelist and essayist")).await?;
    let austen = catalog::insert_author(pool, &author("Jane", "Austen", "English novelist")).await?;
    let rowling = catalog::insert_author(pool, &author("J.K.", "Rowling", "British author")).await?;
    let king = catalog::insert_author(pool, &author("Stephen", "King", "American author of horror fiction")).await?;

    let [fiction, fantasy, horror, classic, romance] = insert_terms(
        pool,
        TaxonomyKind::Genre,
        [
            ("Fiction", "Literary fiction"),
            ("Fantasy", "Fantasy literature"),
            ("Horror", "Horror fiction"),
            ("Classic", "Classic literature"),
            ("Romance", "Romantic fiction"),
        ],
    )
    .await?;

    let [favorites, to_read, _reference] = insert_terms(
        pool,
        TaxonomyKind::Category,
        [
            ("Favorites", "My favorite books"),
            ("To Read", "Books to read"),
            ("Reference", "Reference books"),
        ],
    )
    .await?;

    let [politics, society, magic] = insert_terms(
        pool,
        TaxonomyKind::Topic,
        [
            ("Politics", "Political themes"),
            ("Society", "Social commentary"),
            ("Magic", "Magical elements"),
        ],
    )
    .await?;

    let harry_potter = catalog::insert_series(
        pool,
        &NewSeries {
            description: Some("Fantasy series about a young wizard".to_string()),
            total_books: Some(7),
            author_ids: vec![rowling],
            ..NewSeries::new("Harry Potter")
        },
    )
    .await?;

    let books = [
        NewBook {
            reading_status: ReadingStatus::Completed,
            current_page: 328,
            rating: Some(5.0),
            category_id: Some(favorites),
            author_ids: vec![orwell],
            genre_ids: vec![fiction, classic],
            topic_ids: vec![politics, society],
            ..sample_book("1984", "9780451524935", 1949, 328, "A dystopian social science fiction novel", penguin)
        },
        NewBook {
            reading_status: ReadingStatus::Completed,
            rating: Some(4.5),
            category_id: Some(favorites),
            author_ids: vec![austen],
            genre_ids: vec![fiction, classic, romance],
            ..sample_book("Pride and Prejudice", "9780141439518", 1813, 432, "A romantic novel of manners", penguin)
        },
        NewBook {
            reading_status: ReadingStatus::Reading,
            current_page: 150,
            rating: Some(4.8),
            series_id: Some(harry_potter),
            series_position: Some(1),
            category_id: Some(to_read),
            author_ids: vec![rowling],
            genre_ids: vec![fiction, fantasy],
            topic_ids: vec![magic],
            ..sample_book(
                "Harry Potter and the Philosopher's Stone",
                "9780747532699",
                1997,
                223,
                "The first book in the Harry Potter series",
                harpercollins,
            )
        },
        NewBook {
            category_id: Some(to_read),
            author_ids: vec![king],
            genre_ids: vec![fiction, horror],
            ..sample_book(
                "The Shining",
                "9780307743657",
                1977,
                447,
                "A horror novel about a family in an isolated hotel",
                penguin,
            )
        },
        NewBook {
            reading_status: ReadingStatus::Completed,
            current_page: 112,
            rating: Some(4.7),
            category_id: Some(favorites),
            author_ids: vec![orwell],
            genre_ids: vec![fiction, classic],
            topic_ids: vec![politics, society],
            ..sample_book("Animal Farm", "9780451526342", 1945, 112, "Allegorical novella about Stalinism", penguin)
        },
    ];
    for book in &books {
        queries::insert_book(pool, book).await?;
    }

    let summary = SeedSummary {
        publishers: count_rows(pool, "publishers").await?,
        authors: count_rows(pool, "authors").await?,
        books: queries::count_books(pool).await?,
        genres: count_rows(pool, "genres").await?,
        categories: count_rows(pool, "categories").await?,
        topics: count_rows(pool, "topics").await?,
        series: count_rows(pool, "series").await?,
    };

    tracing::info!(?summary, "seeded sample library");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;
    use crate::storage::queries::BookFilter;

    #[tokio::test]
    async fn test_seed_counts() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let summary = seed_sample_data(db.pool()).await.expect("Failed to seed");

        assert_eq!(
            summary,
            SeedSummary {
                publishers: 3,
                authors: 4,
                books: 5,
                genres: 5,
                categories: 3,
                topics: 3,
                series: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        seed_sample_data(db.pool()).await.expect("First seed failed");
        let summary = seed_sample_data(db.pool()).await.expect("Second seed failed");

        assert_eq!(summary.books, 5);
        assert_eq!(summary.publishers, 3);
    }

    #[tokio::test]
    async fn test_seeded_relations() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        seed_sample_data(db.pool()).await.expect("Failed to seed");

        let filter = BookFilter::from_params(Some("philosopher"), None).unwrap();
        let books = queries::list_books_with_relations(db.pool(), &filter).await.unwrap();
        assert_eq!(books.len(), 1);

        let hp = &books[0];
        assert_eq!(hp.reading_status, ReadingStatus::Reading);
        assert_eq!(hp.current_page, 150);
        assert_eq!(hp.authors.len(), 1);
        assert_eq!(hp.authors[0].name, "J.K. Rowling");
        assert_eq!(hp.series.as_ref().map(|s| s.name.as_str()), Some("Harry Potter"));
        assert_eq!(hp.publisher.as_ref().map(|p| p.name.as_str()), Some("HarperCollins"));
        let genres: Vec<_> = hp.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(genres, vec!["Fiction", "Fantasy"]);
    }

    #[tokio::test]
    async fn test_clear_catalog() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        seed_sample_data(db.pool()).await.expect("Failed to seed");
        clear_catalog(db.pool()).await.expect("Failed to clear");

        assert_eq!(queries::count_books(db.pool()).await.unwrap(), 0);
        assert_eq!(count_rows(db.pool(), "book_authors").await.unwrap(), 0);
        assert_eq!(count_rows(db.pool(), "publishers").await.unwrap(), 0);
    }
}
