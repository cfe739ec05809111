//! Bookshelf - a personal library catalog
//!
//! Books, their authors, publishers, series and classification terms stored
//! in SQLite and served over a JSON REST API, with library statistics and
//! CSV/JSON export.
//!
//! - [`storage`] - schema, models and repository functions
//! - [`api`] - axum router and handlers
//! - [`export`] - CSV and JSON export
//! - [`config`] - runtime configuration

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod storage;

pub use config::AppConfig;
pub use error::{CatalogError, Result};
pub use storage::Database;
