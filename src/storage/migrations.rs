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


//! Database migrations
//!
//! This module creates the catalog schema when it is absent and applies any
//! later schema changes.
//!
//! # Migration Strategy
//! Migrations are plain runtime SQL tracked in the `_migrations` table, so a
//! fresh database file is usable without any external tooling.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};

/// Run all database migrations
///
/// This function creates the database schema and applies any pending migrations.
/// Migrations are tracked in the `_migrations` table.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Create migrations tracking table
    create_migrations_table(pool).await?;

    // Run all migrations in order
    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;
    run_migration(pool, 2, "book_query_indexes", create_book_indexes(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    tracing::info!(migration = name, "applied database migration");

    Ok(())
}

/// List applied migrations as (id, name) pairs
pub async fn applied_migrations(pool: &SqlitePool) -> Result<Vec<(i32, String)>> {
    let rows = sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM _migrations ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Create initial database schema
///
/// Creates all entity tables and association tables with their constraints.
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- ============================================================================
-- MAIN ENTITIES
-- ============================================================================

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    biography TEXT
);

CREATE TABLE IF NOT EXISTS publishers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    country TEXT
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS series (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    total_books INTEGER
);

-- Books: a publisher is mandatory; deleting a series or category detaches
-- the book instead of deleting it.
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,

    title TEXT NOT NULL,
    isbn TEXT,
    publication_year INTEGER,
    pages INTEGER,
    language TEXT,
    description TEXT,

    reading_status TEXT NOT NULL DEFAULT 'unread'
        CHECK (reading_status IN ('unread', 'reading', 'completed')),
    current_page INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    rating REAL,
    date_started TEXT,    -- ISO 8601 date (YYYY-MM-DD)
    date_completed TEXT,  -- ISO 8601 date (YYYY-MM-DD)

    publisher_id INTEGER NOT NULL REFERENCES publishers(id),
    series_id INTEGER REFERENCES series(id) ON DELETE SET NULL,
    series_position INTEGER,
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,

    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS recommended_books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author_name TEXT NOT NULL,
    isbn TEXT,
    publication_year INTEGER,
    pages INTEGER,
    language TEXT DEFAULT 'English',
    description TEXT,
    average_rating REAL
);

-- ============================================================================
-- ASSOCIATION TABLES (Many-to-Many Relationships)
-- ============================================================================

CREATE TABLE IF NOT EXISTS book_authors (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, author_id)
);

CREATE TABLE IF NOT EXISTS book_genres (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, genre_id)
);

CREATE TABLE IF NOT EXISTS book_topics (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    topic_id INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, topic_id)
);

CREATE TABLE IF NOT EXISTS series_authors (
    series_id INTEGER NOT NULL REFERENCES series(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    PRIMARY KEY (series_id, author_id)
);

CREATE TABLE IF NOT EXISTS recommended_book_genres (
    recommended_book_id INTEGER NOT NULL REFERENCES recommended_books(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    PRIMARY KEY (recommended_book_id, genre_id)
);
        "#,
    )
    .await?;

    Ok(())
}

/// Indexes for the book list filters, the recent-books query and the
/// reverse side of each association table.
async fn create_book_indexes(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
CREATE INDEX IF NOT EXISTS idx_books_reading_status ON books(reading_status);
CREATE INDEX IF NOT EXISTS idx_books_created_at ON books(created_at);
CREATE INDEX IF NOT EXISTS idx_books_publisher ON books(publisher_id);
CREATE INDEX IF NOT EXISTS idx_book_authors_author ON book_authors(author_id);
CREATE INDEX IF NOT EXISTS idx_book_genres_genre ON book_genres(genre_id);
CREATE INDEX IF NOT EXISTS idx_book_topics_topic ON book_topics(topic_id);
CREATE INDEX IF NOT EXISTS idx_series_authors_author ON series_authors(author_id);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        // Running again must be a no-op
        run_migrations(db.pool()).await.expect("Re-running migrations failed");

        let applied = applied_migrations(db.pool()).await.expect("Failed to list migrations");
        assert_eq!(
            applied,
            vec![
                (1, "initial_schema".to_string()),
                (2, "book_query_indexes".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_schema_has_all_tables() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .expect("Failed to list tables");

        for expected in [
            "_migrations",
            "authors",
            "book_authors",
            "book_genres",
            "book_topics",
            "books",
            "categories",
            "genres",
            "publishers",
            "recommended_book_genres",
            "recommended_books",
            "series",
            "series_authors",
            "topics",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }
}
