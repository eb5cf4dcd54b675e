use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use lru::LruCache;
use scraper::Html;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::WikiSource;
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::Result;

/// A fetched card page.
///
/// The markup is kept as fetched and parsed into a document tree on demand:
/// the parsed tree is not `Send`, so it cannot live in a cache shared across
/// tasks.
#[derive(Debug, Clone)]
pub struct CardPage {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    markup: String,
}

impl CardPage {
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetched_at: Utc::now(),
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Parse the page into a navigable document tree
    pub fn document(&self) -> Html {
        Html::parse_document(&self.markup)
    }

    pub fn size(&self) -> usize {
        self.markup.len()
    }

    /// Time since the page was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

/// Card name → fetched page, bounded by an LRU policy.
///
/// Lookups and inserts go through one mutex. Misses are serialised per card
/// through a lock in `fetch_locks`, so concurrent callers asking for the same
/// card trigger a single fetch while other cards are fetched in parallel.
#[derive(Debug)]
pub struct DocumentCache {
    pages: Mutex<LruCache<String, Arc<CardPage>>>,
    fetch_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    capacity: NonZeroUsize,
}

impl DocumentCache {
    /// Create a cache holding at most `capacity` pages (0 falls back to the default)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            pages: Mutex::new(LruCache::new(capacity)),
            fetch_locks: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Get a cached page, marking it as recently used
    pub async fn get(&self, name: &str) -> Option<Arc<CardPage>> {
        self.pages.lock().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.pages.lock().await.contains(name)
    }

    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.pages.lock().await.clear();
    }

    /// Make sure the page for `name` is cached, fetching `path` on a miss.
    ///
    /// A failed fetch is logged and returned; nothing is cached, so the next
    /// call retries.
    pub async fn ensure_document(
        &self,
        source: &dyn WikiSource,
        name: &str,
        path: &str,
    ) -> Result<Arc<CardPage>> {
        if let Some(page) = self.get(name).await {
            debug!(
                "Document cache hit for '{}' (fetched {}s ago)",
                name,
                page.age().num_seconds()
            );
            return Ok(page);
        }

        let lock = self.fetch_lock(name).await;
        let result = {
            let _fetching = lock.lock().await;

            // Another caller may have fetched it while we waited
            match self.get(name).await {
                Some(page) => {
                    debug!("Document for '{}' fetched by a concurrent caller", name);
                    Ok(page)
                }
                None => self.fetch_and_store(source, name, path).await,
            }
        };
        self.release_fetch_lock(name, &lock).await;

        result
    }

    async fn fetch_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fetch_locks.lock().await;
        Arc::clone(locks.entry(name.to_string()).or_default())
    }

    /// Forget the card's lock once no other caller holds or waits on it
    async fn release_fetch_lock(&self, name: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.fetch_locks.lock().await;
        let unshared = locks
            .get(name)
            .is_some_and(|held| Arc::ptr_eq(held, lock) && Arc::strong_count(lock) <= 2);
        if unshared {
            locks.remove(name);
        }
    }

    async fn fetch_and_store(
        &self,
        source: &dyn WikiSource,
        name: &str,
        path: &str,
    ) -> Result<Arc<CardPage>> {
        debug!("Document cache miss for '{}', fetching {}", name, path);
        let markup = match source.fetch_page(path).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Error fetching the card page for '{}': {}", name, e);
                return Err(e);
            }
        };

        let page = Arc::new(CardPage::new(
            format!("{}{}", source.base_url(), path),
            markup,
        ));

        let mut pages = self.pages.lock().await;
        if let Some((evicted, _)) = pages.push(name.to_string(), Arc::clone(&page)) {
            if evicted != name {
                info!("Evicted '{}' from the document cache", evicted);
            }
        }
        debug!(
            "Cached '{}' at {} ({} bytes, {} pages held)",
            name,
            page.fetched_at.to_rfc3339(),
            page.size(),
            pages.len()
        );

        Ok(page)
    }

    #[cfg(test)]
    async fn pending_fetch_locks(&self) -> usize {
        self.fetch_locks.lock().await.len()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
