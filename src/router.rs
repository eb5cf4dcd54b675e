use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{WikiClient, WikiSource};
use crate::cache::{CardPage, DocumentCache};
use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::error::{Result, YgoError};
use crate::extract;
use crate::index::CardIndex;
use crate::local::{LocalCardStore, SqliteCardStore};
use crate::model::{AdditionalInfoKind, FieldPair, NOT_AVAILABLE};

/// Which source answered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Wiki,
    Local,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wiki => f.write_str("wiki"),
            Self::Local => f.write_str("local database"),
        }
    }
}

/// A field group of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardQuery {
    Lore,
    Info,
    Status,
    Image,
    Additional(AdditionalInfoKind),
}

/// Answer to a [`CardQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CardData {
    Text(String),
    Fields(Vec<FieldPair>),
}

/// Cooperative cancellation for [`CardRepository::load_card`].
///
/// Checked before each unit of work; a fetch already in flight runs to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(YgoError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Every field group of one card, each loaded independently
#[derive(Debug)]
pub struct CardDetail {
    pub name: String,
    pub source: DataSource,
    pub image: Result<String>,
    pub lore: Result<String>,
    pub info: Result<Vec<FieldPair>>,
    pub status: Result<Vec<FieldPair>>,
}

/// Entry point for every card query.
///
/// Owns the card index and the document cache for as long as it lives, and
/// picks the wiki or the local database for each call from the connectivity
/// signal at that moment.
pub struct CardRepository {
    connectivity: Arc<dyn Connectivity>,
    wiki: Arc<dyn WikiSource>,
    store: Arc<dyn LocalCardStore>,
    index: CardIndex,
    cache: DocumentCache,
}

impl CardRepository {
    pub fn new(
        connectivity: Arc<dyn Connectivity>,
        wiki: Arc<dyn WikiSource>,
        store: Arc<dyn LocalCardStore>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            connectivity,
            wiki,
            store,
            index: CardIndex::new(),
            cache: DocumentCache::new(cache_capacity),
        }
    }

    /// Wire the HTTP wiki client and the SQLite store from configuration
    pub fn from_config(config: &Config, connectivity: Arc<dyn Connectivity>) -> Result<Self> {
        let wiki = WikiClient::new(config.wiki.clone())?;
        let store = SqliteCardStore::new(&config.database.path);

        Ok(Self::new(
            connectivity,
            Arc::new(wiki),
            Arc::new(store),
            config.cache.capacity,
        ))
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub fn current_source(&self) -> DataSource {
        if self.is_online() {
            DataSource::Wiki
        } else {
            DataSource::Local
        }
    }

    pub fn index(&self) -> &CardIndex {
        &self.index
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub async fn ensure_indexed(&self) -> Result<()> {
        self.index
            .ensure_indexed(
                self.connectivity.as_ref(),
                self.wiki.as_ref(),
                self.store.as_ref(),
            )
            .await
    }

    /// All known card names
    pub async fn card_names(&self) -> Result<Vec<String>> {
        self.ensure_indexed().await?;
        Ok(self.index.card_names().await)
    }

    /// Make sure the card's page is cached, indexing first if needed
    pub async fn ensure_document(&self, name: &str) -> Result<Arc<CardPage>> {
        self.ensure_indexed().await?;
        let entry = self.index.require_entry(name).await?;
        self.cache
            .ensure_document(self.wiki.as_ref(), name, &entry.path)
            .await
    }

    /// The card's cached page, fetched on first use
    pub async fn get_document(&self, name: &str) -> Result<Arc<CardPage>> {
        match self.cache.get(name).await {
            Some(page) => Ok(page),
            None => self.ensure_document(name).await,
        }
    }

    pub async fn lore(&self, name: &str) -> Result<String> {
        if self.is_online() {
            let page = self.get_document(name).await?;
            extract::lore(&page.document())
        } else {
            self.store.lore(name).await
        }
    }

    pub async fn info(&self, name: &str) -> Result<Vec<FieldPair>> {
        if self.is_online() {
            let page = self.get_document(name).await?;
            extract::info(&page.document())
        } else {
            self.store.info(name).await
        }
    }

    pub async fn status(&self, name: &str) -> Result<Vec<FieldPair>> {
        if self.is_online() {
            let page = self.get_document(name).await?;
            let statuses = extract::status(&page.document())?;
            if statuses.is_empty() {
                info!("Card banlist status not found online for '{}'", name);
            }
            Ok(statuses)
        } else {
            self.store.status(name).await
        }
    }

    /// Link to the card image; images are only available online
    pub async fn image_link(&self, name: &str) -> Result<String> {
        if self.is_online() {
            let page = self.get_document(name).await?;
            extract::image_link(&page.document())
        } else {
            Err(YgoError::NotFound(
                "card images are unavailable in offline mode".to_string(),
            ))
        }
    }

    /// Ruling, tips or trivia. Online, the page is fetched fresh each time
    /// and any failure to fetch or read it yields `"Not available."`.
    pub async fn additional_info(&self, kind: AdditionalInfoKind, name: &str) -> Result<String> {
        if !self.is_online() {
            return self.store.additional_info(kind, name).await;
        }

        self.ensure_indexed().await?;
        let entry = self.index.require_entry(name).await?;
        let path = format!("{}{}", kind.config().page_prefix, entry.page_name());

        let markup = match self.wiki.fetch_page(&path).await {
            Ok(markup) => markup,
            Err(e) => {
                info!("Error fetching {}{}: {}", self.wiki.base_url(), path, e);
                return Ok(NOT_AVAILABLE.to_string());
            }
        };

        let page = CardPage::new(format!("{}{}", self.wiki.base_url(), path), markup);
        match extract::page_content(&page.document()) {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!("No {} content on {}: {}", kind, page.url, e);
                Ok(NOT_AVAILABLE.to_string())
            }
        }
    }

    /// Run any query by kind
    pub async fn get(&self, query: CardQuery, name: &str) -> Result<CardData> {
        debug!("Query {:?} for '{}' via {}", query, name, self.current_source());
        match query {
            CardQuery::Lore => self.lore(name).await.map(CardData::Text),
            CardQuery::Info => self.info(name).await.map(CardData::Fields),
            CardQuery::Status => self.status(name).await.map(CardData::Fields),
            CardQuery::Image => self.image_link(name).await.map(CardData::Text),
            CardQuery::Additional(kind) => self.additional_info(kind, name).await.map(CardData::Text),
        }
    }

    /// Load image, lore, info and status for a card. A failure in one group
    /// is kept in that group and does not stop the others.
    pub async fn load_card(&self, name: &str, cancel: &CancelFlag) -> Result<CardDetail> {
        let source = self.current_source();

        if source == DataSource::Wiki {
            cancel.check()?;
            if let Err(e) = self.ensure_document(name).await {
                warn!("Could not load the page for '{}': {}", name, e);
                // Every group needs the page; report the one failure to each
                return Ok(CardDetail {
                    name: name.to_string(),
                    source,
                    image: Err(page_error(&e)),
                    lore: Err(page_error(&e)),
                    info: Err(page_error(&e)),
                    status: Err(page_error(&e)),
                });
            }
        }

        cancel.check()?;
        let image = self.image_link(name).await;
        cancel.check()?;
        let lore = self.lore(name).await;
        cancel.check()?;
        let info = self.info(name).await;
        cancel.check()?;
        let status = self.status(name).await;

        Ok(CardDetail {
            name: name.to_string(),
            source,
            image,
            lore,
            info,
            status,
        })
    }
}

/// Copy of a page fetch failure for one field group. Variants that carry a
/// foreign error are flattened to their message.
fn page_error(error: &YgoError) -> YgoError {
    match error {
        YgoError::NotFound(message) => YgoError::NotFound(message.clone()),
        YgoError::HttpStatus { status, message } => YgoError::HttpStatus {
            status: *status,
            message: message.clone(),
        },
        YgoError::Parse(message) => YgoError::Parse(message.clone()),
        YgoError::ServerError(message) => YgoError::ServerError(message.clone()),
        YgoError::Timeout(seconds) => YgoError::Timeout(*seconds),
        YgoError::RateLimit => YgoError::RateLimit,
        YgoError::Cancelled => YgoError::Cancelled,
        other => YgoError::Other(other.to_string()),
    }
}
