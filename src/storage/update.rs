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


//! Partial-update statements
//!
//! A patch becomes a single `UPDATE <table> SET ... WHERE id = ?` that only
//! names the columns the patch carries, so concurrent patches touching
//! different columns never overwrite each other.

use sqlx::{Encode, QueryBuilder, Sqlite, Type};

/// Builder for one `UPDATE ... SET` statement
pub struct ColumnUpdate<'args> {
    qb: QueryBuilder<'args, Sqlite>,
    columns: Vec<&'static str>,
}

impl<'args> ColumnUpdate<'args> {
    pub fn new(table: &str) -> Self {
        Self {
            qb: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            columns: Vec::new(),
        }
    }

    /// Assign `column` when the patch supplies a value for it
    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Sqlite> + Type<Sqlite> + Send,
    {
        if let Some(value) = value {
            if !self.columns.is_empty() {
                self.qb.push(", ");
            }
            self.qb.push(column).push(" = ").push_bind(value);
            self.columns.push(column);
        }
        self
    }

    /// Columns assigned so far, in order
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Close the statement for row `id`
    ///
    /// An empty patch still touches the row (`SET id = id`) so the caller can
    /// tell a missing row from a no-op through `rows_affected()`.
    pub fn finish(&mut self, id: i64) -> &mut QueryBuilder<'args, Sqlite> {
        if self.columns.is_empty() {
            self.qb.push("id = id");
        }
        self.qb.push(" WHERE id = ").push_bind(id);
        &mut self.qb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_supplied_columns_are_assigned() {
        let mut update = ColumnUpdate::new("authors");
        update
            .set("first_name", Some("Eric".to_string()))
            .set::<String>("last_name", None)
            .set("biography", Some(None::<String>));

        assert_eq!(update.columns(), ["first_name", "biography"]);
        assert_eq!(
            update.finish(1).sql(),
            "UPDATE authors SET first_name = ?, biography = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_empty_update_still_matches_row() {
        let mut update = ColumnUpdate::new("genres");
        assert_eq!(update.finish(3).sql(), "UPDATE genres SET id = id WHERE id = ?");
    }
}
