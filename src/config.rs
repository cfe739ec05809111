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


//! Application configuration
//!
//! Where the catalog lives, where the HTTP server binds and which origins may
//! call it. Values come from serde defaults, environment variables or CLI
//! flags (the CLI maps its flags onto the same fields).

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::storage::database::sqlite_file_path;

/// Session secret used when `SECRET_KEY` is not set
pub const DEFAULT_SECRET_KEY: &str = "dev-key-change-me";

#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite connection string (default: "sqlite://library.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Secret key reserved for session signing
    #[serde(default = "default_secret_key", skip_serializing)]
    pub secret_key: String,

    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_database_url() -> String {
    "sqlite://library.db".to_string()
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            secret_key: default_secret_key(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

// The secret key must never end up in logs
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl AppConfig {
    /// Build a config from `DATABASE_URL`, `SECRET_KEY`, `BOOKSHELF_HOST`,
    /// `BOOKSHELF_PORT` and `BOOKSHELF_CORS_ORIGINS` (comma separated)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(key) = lookup("SECRET_KEY") {
            config.secret_key = key;
        }
        if let Some(host) = lookup("BOOKSHELF_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("BOOKSHELF_PORT") {
            config.port = port.trim().parse().map_err(|_| {
                CatalogError::ConfigurationError(format!("invalid BOOKSHELF_PORT '{}'", port))
            })?;
        }
        if let Some(origins) = lookup("BOOKSHELF_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    ///
    /// Logs a warning when the built-in secret key is still in use.
    pub fn validate(&self) -> Result<()> {
        sqlite_file_path(&self.database_url)?;

        if self.secret_key.trim().is_empty() {
            return Err(CatalogError::ConfigurationError(
                "SECRET_KEY must not be empty".to_string(),
            ));
        }
        if self.uses_default_secret() {
            tracing::warn!("SECRET_KEY is not set; using the built-in development key");
        }

        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse the bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.socket_addr().parse().map_err(|_| {
            CatalogError::ConfigurationError(format!(
                "invalid bind address '{}'",
                self.socket_addr()
            ))
        })
    }
}
