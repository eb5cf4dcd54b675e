use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AdditionalInfoKind, FieldPair};

pub mod sqlite;

pub use sqlite::SqliteCardStore;

/// Bundled card database, queried by exact card name.
///
/// Every per-card query returns [`crate::error::YgoError::NotFound`] when no
/// row matches the name.
#[async_trait]
pub trait LocalCardStore: Send + Sync {
    /// Names of every card in the database
    async fn card_names(&self) -> Result<Vec<String>>;

    async fn lore(&self, name: &str) -> Result<String>;

    /// Info fields in canonical column order, empty values left out
    async fn info(&self, name: &str) -> Result<Vec<FieldPair>>;

    /// Banlist statuses, empty values left out and raw codes mapped to labels
    async fn status(&self, name: &str) -> Result<Vec<FieldPair>>;

    /// Ruling, tips or trivia text; `"Not available."` when the column is empty
    async fn additional_info(&self, kind: AdditionalInfoKind, name: &str) -> Result<String>;
}
