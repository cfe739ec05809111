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


//! Database connection and management
//!
//! This module handles database connection pooling, initialization, and maintenance.
//! A `Database` is created once at startup and handed to every request handler;
//! there is no process-wide connection registry.
//!
//! # Connection Strings
//! - `sqlite://library.db` - file relative to the working directory
//! - `sqlite:///var/lib/bookshelf/library.db` - absolute path
//! - `sqlite::memory:` - in-memory database (tests)
//!
//! # SQLite Configuration
//! - WAL mode for better concurrency
//! - Foreign keys enabled (association rows cascade on delete)
//! - Normal synchronous mode (balance safety/speed)

use crate::error::{CatalogError, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous},
    ConnectOptions,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Database manager - handles connection pooling and operations
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>, // None for in-memory databases
}

impl Database {
    /// Open (or create) the database behind a connection string and run migrations
    ///
    /// # Errors
    /// Returns error if:
    /// - The URL is not a SQLite URL
    /// - Parent directory doesn't exist and can't be created
    /// - Database file can't be opened
    /// - Migrations fail
    pub async fn connect(database_url: &str) -> Result<Self> {
        let path = sqlite_file_path(database_url)?;

        if let Some(parent) = path.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CatalogError::DatabaseError(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .disable_statement_logging();

        let max_connections = if path.is_some() { 5 } else { 1 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            // An in-memory database lives only as long as its connection
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;

        let db = Self { pool, path };
        db.migrate().await?;

        tracing::info!(
            path = %db.path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| ":memory:".to_string()),
            "database ready"
        );

        Ok(db)
    }

    /// Create in-memory database for testing
    ///
    /// # Errors
    /// Returns error if database creation or migration fails
    pub async fn new_in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Run database migrations
    ///
    /// Applies all pending migrations to bring the database schema up to date.
    /// Migrations are run automatically when creating a new database connection.
    pub async fn migrate(&self) -> Result<()> {
        crate::storage::migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| CatalogError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Get reference to the connection pool
    ///
    /// Use this to execute queries directly on the pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get database file path
    ///
    /// Returns `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close database and release all connections
    pub async fn close(self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }

    /// Check database integrity
    ///
    /// Runs SQLite integrity check and returns true if database is okay.
    pub async fn check_integrity(&self) -> Result<bool> {
        let result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&self.pool)
            .await?;

        Ok(result == "ok")
    }
}

/// Resolve the file behind a SQLite connection string
///
/// Returns `Ok(None)` for in-memory databases and a configuration error for
/// anything that is not a SQLite URL.
pub fn sqlite_file_path(database_url: &str) -> Result<Option<PathBuf>> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .ok_or_else(|| {
            CatalogError::ConfigurationError(format!(
                "unsupported database URL '{}': only sqlite:// URLs are supported",
                database_url
            ))
        })?;

    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file == ":memory:" {
        return Ok(None);
    }

    Ok(Some(PathBuf::from(file)))
}
