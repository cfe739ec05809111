//! Database models for Bookshelf
//!
//! This module contains the catalog entity rows, the inputs used to create
//! them and the patch structures used for partial updates.
//!
//! # SQLite Adaptations
//! - Reading status stored as lowercase TEXT guarded by a CHECK constraint
//! - Dates stored as TEXT in ISO 8601 format (`YYYY-MM-DD`)
//! - `created_at` stored as RFC 3339 TEXT so it sorts chronologically
//! - Many-to-many relationships use association tables holding id pairs
//!
//! # Patches
//! Patch fields come in two shapes:
//! - `Option<T>` for columns that cannot be NULL: absent leaves the column
//!   unchanged, a value replaces it
//! - `Option<Option<T>>` for nullable columns: absent leaves the column
//!   unchanged, `null` clears it, a value replaces it

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::error::{require_text, CatalogError};
use crate::storage::update::ColumnUpdate;

// ============================================================================
// ENUMS
// ============================================================================

/// Reading progress of a book
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReadingStatus {
    #[default]
    Unread,
    Reading,
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::Unread,
        ReadingStatus::Reading,
        ReadingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Unread => "unread",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CatalogError::invalid_input(format!(
                    "unknown reading status '{}' (expected unread, reading or completed)",
                    s
                ))
            })
    }
}

/// Genre, topic and category share one shape: a unique name and an optional
/// description. This selects which table a term lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Genre,
    Topic,
    Category,
}

impl TaxonomyKind {
    pub fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Genre => "genres",
            TaxonomyKind::Topic => "topics",
            TaxonomyKind::Category => "categories",
        }
    }

    /// Entity name used in error messages and log lines
    pub fn entity(&self) -> &'static str {
        match self {
            TaxonomyKind::Genre => "Genre",
            TaxonomyKind::Topic => "Topic",
            TaxonomyKind::Category => "Category",
        }
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(default)]
    pub biography: Option<String>,
}

impl Author {
    /// "First Last", the form used in listings and exports
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub country: Option<String>,
}

/// A genre, topic or category row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub total_books: Option<i32>,
}

/// Book entity - a title in the personal library
///
/// `publisher_id` is required; series and category are optional. Authors,
/// genres and topics live in association tables and are loaded separately.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,

    // Bibliographic fields
    pub title: String,
    #[sqlx(default)]
    pub isbn: Option<String>,
    #[sqlx(default)]
    pub publication_year: Option<i32>,
    #[sqlx(default)]
    pub pages: Option<i32>,
    #[sqlx(default)]
    pub language: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,

    // Reading progress
    pub reading_status: ReadingStatus,
    pub current_page: i32,
    #[sqlx(default)]
    pub notes: Option<String>,
    #[sqlx(default)]
    pub rating: Option<f64>,
    #[sqlx(default)]
    pub date_started: Option<NaiveDate>,
    #[sqlx(default)]
    pub date_completed: Option<NaiveDate>,

    // Relations
    pub publisher_id: i64,
    #[sqlx(default)]
    pub series_id: Option<i64>,
    #[sqlx(default)]
    pub series_position: Option<i32>,
    #[sqlx(default)]
    pub category_id: Option<i64>,

    pub created_at: DateTime<Utc>,
}

/// A book suggestion that is not (yet) part of the library.
/// `author_name` is free text rather than a link to an Author.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RecommendedBook {
    pub id: i64,
    pub title: String,
    pub author_name: String,
    #[sqlx(default)]
    pub isbn: Option<String>,
    #[sqlx(default)]
    pub publication_year: Option<i32>,
    #[sqlx(default)]
    pub pages: Option<i32>,
    #[sqlx(default)]
    pub language: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub average_rating: Option<f64>,
}

/// `{id, name}` pair embedded in denormalized responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts)
// ============================================================================

/// New book record for insertion
///
/// Relation id lists are optional; ids that do not exist are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub publisher_id: i64,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reading_status: ReadingStatus,
    #[serde(default)]
    pub current_page: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub date_started: Option<NaiveDate>,
    #[serde(default)]
    pub date_completed: Option<NaiveDate>,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub series_position: Option<i32>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub author_ids: Vec<i64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub topic_ids: Vec<i64>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, publisher_id: i64) -> Self {
        Self {
            title: title.into(),
            publisher_id,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("title", &self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub biography: Option<String>,
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            biography: None,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewPublisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("name", &self.name)
    }
}

/// New genre, topic or category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaxonomyTerm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTaxonomyTerm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeries {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_books: Option<i32>,
    #[serde(default)]
    pub author_ids: Vec<i64>,
}

impl NewSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            total_books: None,
            author_ids: Vec::new(),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecommendedBook {
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default = "default_language")]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

fn default_language() -> Option<String> {
    Some("English".to_string())
}

impl NewRecommendedBook {
    pub fn new(title: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_name: author_name.into(),
            isbn: None,
            publication_year: None,
            pages: None,
            language: default_language(),
            description: None,
            average_rating: None,
            genre_ids: Vec::new(),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_text("title", &self.title)?;
        require_text("author_name", &self.author_name)
    }
}

// ============================================================================
// PATCH STRUCTS (for partial updates)
// ============================================================================

/// Deserialize a present field (including `null`) as `Some(..)`, so that
/// together with `#[serde(default)]` an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update of a book
///
/// A supplied relation id list replaces the current links entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pages: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub language: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub reading_status: Option<ReadingStatus>,
    #[serde(default)]
    pub current_page: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_started: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_completed: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub publisher_id: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub series_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub series_position: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
    #[serde(default)]
    pub author_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub topic_ids: Option<Vec<i64>>,
}

impl BookPatch {
    pub fn validate(&self) -> crate::error::Result<()> {
        match &self.title {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }

    /// Assign the scalar columns this patch carries
    pub fn push_columns(&self, update: &mut ColumnUpdate<'_>) {
        update
            .set("title", self.title.clone())
            .set("isbn", self.isbn.clone())
            .set("publication_year", self.publication_year)
            .set("pages", self.pages)
            .set("language", self.language.clone())
            .set("description", self.description.clone())
            .set("reading_status", self.reading_status)
            .set("current_page", self.current_page)
            .set("notes", self.notes.clone())
            .set("rating", self.rating)
            .set("date_started", self.date_started)
            .set("date_completed", self.date_completed)
            .set("publisher_id", self.publisher_id)
            .set("series_id", self.series_id)
            .set("series_position", self.series_position)
            .set("category_id", self.category_id);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub biography: Option<Option<String>>,
}

impl AuthorPatch {
    pub fn validate(&self) -> crate::error::Result<()> {
        if let Some(first_name) = &self.first_name {
            require_text("first_name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require_text("last_name", last_name)?;
        }
        Ok(())
    }

    pub fn push_columns(&self, update: &mut ColumnUpdate<'_>) {
        update
            .set("first_name", self.first_name.clone())
            .set("last_name", self.last_name.clone())
            .set("biography", self.biography.clone());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
}

impl PublisherPatch {
    pub fn validate(&self) -> crate::error::Result<()> {
        match &self.name {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }

    pub fn push_columns(&self, update: &mut ColumnUpdate<'_>) {
        update
            .set("name", self.name.clone())
            .set("country", self.country.clone());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyTermPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl TaxonomyTermPatch {
    pub fn validate(&self) -> crate::error::Result<()> {
        match &self.name {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }

    pub fn push_columns(&self, update: &mut ColumnUpdate<'_>) {
        update
            .set("name", self.name.clone())
            .set("description", self.description.clone());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_books: Option<Option<i32>>,
    #[serde(default)]
    pub author_ids: Option<Vec<i64>>,
}

impl SeriesPatch {
    pub fn validate(&self) -> crate::error::Result<()> {
        match &self.name {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }

    pub fn push_columns(&self, update: &mut ColumnUpdate<'_>) {
        update
            .set("name", self.name.clone())
            .set("description", self.description.clone())
            .set("total_books", self.total_books);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_status_round_trip_through_str() {
        for status in ReadingStatus::ALL {
            assert_eq!(status.as_str().parse::<ReadingStatus>().unwrap(), status);
        }
        assert!("finished".parse::<ReadingStatus>().is_err());
        assert_eq!(ReadingStatus::default(), ReadingStatus::Unread);
    }

    #[test]
    fn test_reading_status_serde_is_lowercase() {
        let json = serde_json::to_string(&ReadingStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_new_book_defaults() {
        let new_book: NewBook =
            serde_json::from_str(r#"{"title": "Dune", "publisher_id": 3}"#).unwrap();
        assert_eq!(new_book.reading_status, ReadingStatus::Unread);
        assert_eq!(new_book.current_page, 0);
        assert!(new_book.author_ids.is_empty());
        assert!(new_book.validate().is_ok());
    }

    #[test]
    fn test_new_book_requires_title() {
        let result = serde_json::from_str::<NewBook>(r#"{"publisher_id": 3}"#);
        assert!(result.unwrap_err().to_string().contains("missing field `title`"));

        let blank = NewBook::new("  ", 3);
        assert!(matches!(
            blank.validate(),
            Err(CatalogError::MissingRequiredField(ref f)) if f == "title"
        ));
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_value() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"rating": 4.5, "notes": null}"#).unwrap();
        assert_eq!(patch.rating, Some(Some(4.5)));
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.isbn, None);
        assert!(patch.author_ids.is_none());

        let mut update = ColumnUpdate::new("books");
        patch.push_columns(&mut update);
        assert_eq!(update.columns(), ["notes", "rating"]);
    }

    #[test]
    fn test_rating_only_patch_touches_only_rating() {
        let patch: BookPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
        let mut update = ColumnUpdate::new("books");
        patch.push_columns(&mut update);
        assert_eq!(update.columns(), ["rating"]);
    }

    #[test]
    fn test_author_patch_columns() {
        let patch: AuthorPatch =
            serde_json::from_str(r#"{"last_name": "Blair", "biography": null}"#).unwrap();
        let mut update = ColumnUpdate::new("authors");
        patch.push_columns(&mut update);
        assert_eq!(update.columns(), ["last_name", "biography"]);
    }

    #[test]
    fn test_recommended_book_language_defaults_to_english() {
        let rec: NewRecommendedBook =
            serde_json::from_str(r#"{"title": "Dune", "author_name": "Frank Herbert"}"#)
                .unwrap();
        assert_eq!(rec.language.as_deref(), Some("English"));
    }
}
