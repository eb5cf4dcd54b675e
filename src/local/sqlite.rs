use async_trait::async_trait;
use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use super::LocalCardStore;
use crate::error::{Result, YgoError};
use crate::model::{status_label, AdditionalInfoKind, FieldPair, INFO_COLUMNS, NOT_AVAILABLE, STATUS_COLUMNS};

/// SQLite implementation of [`LocalCardStore`] over the bundled `card` table.
///
/// The database is opened read-only for each query on the blocking pool; the
/// schema is owned by whoever ships the database file.
#[derive(Debug, Clone)]
pub struct SqliteCardStore {
    db_path: PathBuf,
}

impl SqliteCardStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run a query against a fresh read-only connection on the blocking pool
    async fn with_connection<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
            f(&conn)
        })
        .await
        .map_err(|e| YgoError::Other(format!("Failed to spawn {} query: {}", operation, e)))?
    }
}

/// Read a column as text whatever its storage class; NULL and blobs read as `None`
fn column_text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    })
}

fn not_found(name: &str) -> YgoError {
    YgoError::NotFound(format!("card '{}' is not in the local database", name))
}

fn verbatim(value: &str) -> &str {
    value
}

/// Pair each column's value with its label, dropping empty values
fn labelled_pairs(
    row: &Row<'_>,
    columns: &[(&str, &str)],
    map_value: fn(&str) -> &str,
) -> rusqlite::Result<Vec<FieldPair>> {
    let mut pairs = Vec::new();
    for (column, label) in columns {
        match column_text(row, column)? {
            Some(value) if !value.is_empty() => {
                pairs.push(FieldPair::new(*label, map_value(&value)));
            }
            _ => {}
        }
    }
    Ok(pairs)
}

#[async_trait]
impl LocalCardStore for SqliteCardStore {
    async fn card_names(&self) -> Result<Vec<String>> {
        self.with_connection("card list", |conn| {
            let mut stmt = conn.prepare("SELECT name FROM card")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Loaded {} card names from local database", names.len());
            Ok(names)
        })
        .await
    }

    async fn lore(&self, name: &str) -> Result<String> {
        let name = name.to_string();
        self.with_connection("lore", move |conn| {
            conn.query_row(
                "SELECT lore FROM card WHERE name = ?1",
                params![&name],
                |row| column_text(row, "lore"),
            )
            .optional()?
            .map(Option::unwrap_or_default)
            .ok_or_else(|| not_found(&name))
        })
        .await
    }

    async fn info(&self, name: &str) -> Result<Vec<FieldPair>> {
        let name = name.to_string();
        self.with_connection("info", move |conn| {
            conn.query_row(
                "SELECT * FROM card WHERE name = ?1",
                params![&name],
                |row| labelled_pairs(row, &INFO_COLUMNS, verbatim),
            )
            .optional()?
            .ok_or_else(|| not_found(&name))
        })
        .await
    }

    async fn status(&self, name: &str) -> Result<Vec<FieldPair>> {
        let name = name.to_string();
        self.with_connection("status", move |conn| {
            conn.query_row(
                "SELECT ocgStatus, tcgAdvStatus, tcgTrnStatus FROM card WHERE name = ?1",
                params![&name],
                |row| labelled_pairs(row, &STATUS_COLUMNS, status_label),
            )
            .optional()?
            .ok_or_else(|| not_found(&name))
        })
        .await
    }

    async fn additional_info(&self, kind: AdditionalInfoKind, name: &str) -> Result<String> {
        let name = name.to_string();
        let column = kind.config().column;
        // `column` comes from a fixed table, never from input
        let sql = format!("SELECT {} FROM card WHERE name = ?1", column);

        self.with_connection("additional info", move |conn| {
            let value = conn
                .query_row(&sql, params![&name], |row| column_text(row, column))
                .optional()?
                .ok_or_else(|| not_found(&name))?;

            Ok(match value {
                Some(text) if !text.is_empty() => text,
                _ => NOT_AVAILABLE.to_string(),
            })
        })
        .await
    }
}
