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


//! Association table helpers
//!
//! Every many-to-many relationship is a table of id pairs. The helpers here
//! rewrite the links of one owner row and eager-load `{id, name}` summaries
//! for a batch of owners, so callers never fall back to per-row lazy loads.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::storage::models::EntityRef;

/// SQLite's default host parameter limit is 999 on older builds
const MAX_IDS_PER_QUERY: usize = 500;

/// Static description of one association table
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    pub table: &'static str,
    /// Column holding the owning row id (e.g. `book_id`)
    pub owner_column: &'static str,
    /// Column holding the linked row id (e.g. `author_id`)
    pub target_column: &'static str,
    pub target_table: &'static str,
    /// SQL expression over the target alias `t` that yields a display name
    pub target_name: &'static str,
}

pub const BOOK_AUTHORS: LinkTable = LinkTable {
    table: "book_authors",
    owner_column: "book_id",
    target_column: "author_id",
    target_table: "authors",
    target_name: "t.first_name || ' ' || t.last_name",
};

pub const BOOK_GENRES: LinkTable = LinkTable {
    table: "book_genres",
    owner_column: "book_id",
    target_column: "genre_id",
    target_table: "genres",
    target_name: "t.name",
};

pub const BOOK_TOPICS: LinkTable = LinkTable {
    table: "book_topics",
    owner_column: "book_id",
    target_column: "topic_id",
    target_table: "topics",
    target_name: "t.name",
};

pub const SERIES_AUTHORS: LinkTable = LinkTable {
    table: "series_authors",
    owner_column: "series_id",
    target_column: "author_id",
    target_table: "authors",
    target_name: "t.first_name || ' ' || t.last_name",
};

pub const RECOMMENDED_BOOK_GENRES: LinkTable = LinkTable {
    table: "recommended_book_genres",
    owner_column: "recommended_book_id",
    target_column: "genre_id",
    target_table: "genres",
    target_name: "t.name",
};

/// Replace all links of `owner_id` with `target_ids`
///
/// Ids without a matching target row are skipped and duplicates collapse to
/// a single link. Run inside the caller's transaction.
pub async fn replace_links(
    conn: &mut SqliteConnection,
    link: &LinkTable,
    owner_id: i64,
    target_ids: &[i64],
) -> Result<()> {
    let delete = format!("DELETE FROM {} WHERE {} = ?", link.table, link.owner_column);
    sqlx::query(&delete).bind(owner_id).execute(&mut *conn).await?;

    let insert = format!(
        "INSERT OR IGNORE INTO {} ({}, {}) SELECT ?, id FROM {} WHERE id = ?",
        link.table, link.owner_column, link.target_column, link.target_table
    );
    for target_id in target_ids {
        sqlx::query(&insert)
            .bind(owner_id)
            .bind(target_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Load linked `{id, name}` summaries for each owner id, ordered by target id
///
/// Owners without links are absent from the returned map.
pub async fn load_link_refs(
    pool: &SqlitePool,
    link: &LinkTable,
    owner_ids: &[i64],
) -> Result<HashMap<i64, Vec<EntityRef>>> {
    let mut refs: HashMap<i64, Vec<EntityRef>> = HashMap::new();

    for chunk in owner_ids.chunks(MAX_IDS_PER_QUERY) {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT l.{owner} AS owner_id, t.id AS id, {name} AS name \
             FROM {table} l JOIN {target} t ON t.id = l.{target_col} \
             WHERE l.{owner} IN (",
            owner = link.owner_column,
            name = link.target_name,
            table = link.table,
            target = link.target_table,
            target_col = link.target_column,
        ));
        let mut ids = qb.separated(", ");
        for id in chunk {
            ids.push_bind(*id);
        }
        qb.push(format!(") ORDER BY l.{}, t.id", link.owner_column));

        let rows: Vec<(i64, i64, String)> = qb.build_query_as().fetch_all(pool).await?;
        for (owner_id, id, name) in rows {
            refs.entry(owner_id).or_default().push(EntityRef { id, name });
        }
    }

    Ok(refs)
}

/// Count rows in an association table that reference `owner_id`
pub async fn count_links(pool: &SqlitePool, link: &LinkTable, owner_id: i64) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?",
        link.table, link.owner_column
    );
    let count: i64 = sqlx::query_scalar(&sql).bind(owner_id).fetch_one(pool).await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    async fn seed_authors(pool: &SqlitePool) -> (i64, i64) {
        let a = sqlx::query("INSERT INTO authors (first_name, last_name) VALUES ('George', 'Orwell')")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();
        let b = sqlx::query("INSERT INTO authors (first_name, last_name) VALUES ('Jane', 'Austen')")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();
        (a, b)
    }

    #[tokio::test]
    async fn test_replace_links_skips_unknown_and_duplicate_ids() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (orwell, austen) = seed_authors(db.pool()).await;
        let series_id = sqlx::query("INSERT INTO series (name) VALUES ('Classics')")
            .execute(db.pool())
            .await
            .unwrap()
            .last_insert_rowid();

        let mut conn = db.pool().acquire().await.unwrap();
        replace_links(&mut conn, &SERIES_AUTHORS, series_id, &[orwell, orwell, 999])
            .await
            .expect("Failed to link authors");
        drop(conn);

        assert_eq!(count_links(db.pool(), &SERIES_AUTHORS, series_id).await.unwrap(), 1);

        let mut conn = db.pool().acquire().await.unwrap();
        replace_links(&mut conn, &SERIES_AUTHORS, series_id, &[austen])
            .await
            .expect("Failed to relink authors");
        drop(conn);

        let refs = load_link_refs(db.pool(), &SERIES_AUTHORS, &[series_id]).await.unwrap();
        assert_eq!(refs[&series_id], vec![EntityRef::new(austen, "Jane Austen")]);
    }

    #[tokio::test]
    async fn test_load_link_refs_with_no_owners() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let refs = load_link_refs(db.pool(), &BOOK_AUTHORS, &[]).await.unwrap();
        assert!(refs.is_empty());
    }
}
