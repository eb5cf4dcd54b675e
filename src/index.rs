use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

use crate::api::{CardCategory, WikiSource};
use crate::connectivity::Connectivity;
use crate::error::{Result, YgoError};
use crate::local::LocalCardStore;

/// Where a card lives on the wiki
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardIndexEntry {
    /// Page path relative to the wiki root, e.g. `/wiki/Dark_Magician`
    pub path: String,
    /// Wiki article id
    pub id: u64,
}

impl CardIndexEntry {
    /// The page name without the `/wiki/` prefix, as used by the
    /// ruling/tips/trivia pages
    pub fn page_name(&self) -> &str {
        self.path
            .strip_prefix("/wiki/")
            .unwrap_or_else(|| self.path.trim_start_matches('/'))
    }
}

#[derive(Debug, Default)]
struct IndexState {
    names: Vec<String>,
    links: HashMap<String, CardIndexEntry>,
    online: bool,
    offline: bool,
}

/// The universe of known card names and, once indexed online, where each
/// card's page lives.
///
/// Population runs at most once per mode. A completed online index is never
/// rebuilt; an offline index is replaced by the online one the first time
/// the index is ensured while connected.
#[derive(Debug, Default)]
pub struct CardIndex {
    state: RwLock<IndexState>,
    populate_lock: Mutex<()>,
}

type OnlineTables = (Vec<String>, HashMap<String, CardIndexEntry>);

impl CardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the index for the current connectivity mode if not done yet
    pub async fn ensure_indexed(
        &self,
        connectivity: &dyn Connectivity,
        source: &dyn WikiSource,
        store: &dyn LocalCardStore,
    ) -> Result<()> {
        let _populating = self.populate_lock.lock().await;
        let online = connectivity.is_online();

        {
            let state = self.state.read().await;
            if state.online || (!online && state.offline) {
                return Ok(());
            }
        }

        if online {
            info!("Initializing card index online...");
            let (names, links) = Self::fetch_online(source).await?;

            let mut state = self.state.write().await;
            state.names = names;
            state.links = links;
            state.online = true;
            info!("Done initializing online. Number of cards: {}", state.names.len());
        } else {
            info!("Initializing card index offline...");
            let names = store.card_names().await?;

            let mut state = self.state.write().await;
            state.names = names;
            state.offline = true;
            info!("Done initializing offline. Number of cards: {}", state.names.len());
        }

        Ok(())
    }

    /// Walk every list page of both categories. Nothing is committed unless
    /// all pages arrive.
    async fn fetch_online(source: &dyn WikiSource) -> Result<OnlineTables> {
        let mut names = Vec::with_capacity(8192);
        let mut links = HashMap::with_capacity(8192);

        for category in CardCategory::ALL {
            let mut offset: Option<String> = None;
            let mut seen_offsets = HashSet::new();
            let mut pages = 0usize;

            loop {
                let page = source.fetch_article_list(category, offset.as_deref()).await?;
                pages += 1;
                debug!(
                    "{} page {}: {} items, continuation {:?}",
                    category.as_str(),
                    pages,
                    page.items.len(),
                    page.offset
                );

                for item in page.items {
                    if let Entry::Vacant(slot) = links.entry(item.title.clone()) {
                        slot.insert(CardIndexEntry {
                            path: item.url,
                            id: item.id,
                        });
                        names.push(item.title);
                    }
                }

                // A continuation token seen before means the list is cycling
                match page.offset {
                    Some(next) if !seen_offsets.insert(next.clone()) => {
                        return Err(YgoError::Parse(format!(
                            "{} list returned offset '{}' twice",
                            category.as_str(),
                            next
                        )));
                    }
                    Some(next) => offset = Some(next),
                    None => break,
                }
            }
        }

        Ok((names, links))
    }

    /// Known card names, in index order
    pub async fn card_names(&self) -> Vec<String> {
        self.state.read().await.names.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.names.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.names.is_empty()
    }

    pub async fn contains(&self, name: &str) -> bool {
        let state = self.state.read().await;
        state.links.contains_key(name) || state.names.iter().any(|n| n == name)
    }

    /// Wiki location of a card; only available after online indexing
    pub async fn entry(&self, name: &str) -> Option<CardIndexEntry> {
        self.state.read().await.links.get(name).cloned()
    }

    /// Like [`CardIndex::entry`], but a missing card is an error
    pub async fn require_entry(&self, name: &str) -> Result<CardIndexEntry> {
        self.entry(name)
            .await
            .ok_or_else(|| YgoError::NotFound(format!("no wiki page is known for '{}'", name)))
    }

    /// Whether the name → page table has been built
    pub async fn link_table_ready(&self) -> bool {
        self.state.read().await.online
    }

    pub async fn is_offline_indexed(&self) -> bool {
        self.state.read().await.offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::StaticConnectivity;
    use crate::local::sqlite::tests::create_test_db;
    use crate::test_support::FakeWiki;
    use pretty_assertions::assert_eq;

    fn paged_wiki() -> FakeWiki {
        FakeWiki::new()
            .with_list_page(
                CardCategory::Tcg,
                None,
                &[("Dark Magician", "/wiki/Dark_Magician", 1), ("Kuriboh", "/wiki/Kuriboh", 2)],
                Some("Kuriboh"),
            )
            .with_list_page(
                CardCategory::Tcg,
                Some("Kuriboh"),
                &[("Pot of Greed", "/wiki/Pot_of_Greed", 3)],
                None,
            )
            .with_list_page(
                CardCategory::Ocg,
                None,
                &[
                    ("Kuriboh", "/wiki/Kuriboh_(OCG)", 99),
                    ("Ash Blossom & Joyous Spring", "/wiki/Ash_Blossom_%26_Joyous_Spring", 4),
                ],
                None,
            )
    }

    #[tokio::test]
    async fn test_online_pagination_and_first_seen_dedup() {
        let wiki = paged_wiki();
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();

        index
            .ensure_indexed(&StaticConnectivity::online(), &wiki, &store)
            .await
            .unwrap();

        assert_eq!(
            index.card_names().await,
            vec![
                "Dark Magician".to_string(),
                "Kuriboh".to_string(),
                "Pot of Greed".to_string(),
                "Ash Blossom & Joyous Spring".to_string(),
            ]
        );
        assert_eq!(
            index.entry("Kuriboh").await,
            Some(CardIndexEntry {
                path: "/wiki/Kuriboh".to_string(),
                id: 2
            })
        );
        assert_eq!(
            wiki.list_fetches(),
            vec![
                (CardCategory::Tcg, None),
                (CardCategory::Tcg, Some("Kuriboh".to_string())),
                (CardCategory::Ocg, None),
            ]
        );
        assert!(index.link_table_ready().await);
    }

    #[tokio::test]
    async fn test_ensure_indexed_is_idempotent() {
        let wiki = paged_wiki();
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();
        let connectivity = StaticConnectivity::online();

        index.ensure_indexed(&connectivity, &wiki, &store).await.unwrap();
        index.ensure_indexed(&connectivity, &wiki, &store).await.unwrap();

        assert_eq!(wiki.list_fetches().len(), 3);
    }

    #[tokio::test]
    async fn test_offline_uses_local_store_without_links() {
        let wiki = paged_wiki();
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();

        index
            .ensure_indexed(&StaticConnectivity::offline(), &wiki, &store)
            .await
            .unwrap();

        assert_eq!(index.len().await, 2);
        assert!(index.contains("Pot of Greed").await);
        assert!(index.is_offline_indexed().await);
        assert!(!index.link_table_ready().await);
        assert_eq!(index.entry("Pot of Greed").await, None);
        assert!(wiki.list_fetches().is_empty());
    }

    #[tokio::test]
    async fn test_mode_switches() {
        let wiki = paged_wiki();
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();
        let connectivity = StaticConnectivity::offline();

        index.ensure_indexed(&connectivity, &wiki, &store).await.unwrap();
        assert_eq!(index.len().await, 2);

        // Going online builds the online index once
        connectivity.set_online(true);
        index.ensure_indexed(&connectivity, &wiki, &store).await.unwrap();
        assert_eq!(index.len().await, 4);

        // Going back offline keeps the online index
        connectivity.set_online(false);
        index.ensure_indexed(&connectivity, &wiki, &store).await.unwrap();
        assert_eq!(index.len().await, 4);
        assert!(index.link_table_ready().await);
        assert_eq!(wiki.list_fetches().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_page_leaves_index_untouched() {
        // The OCG category has no first page registered
        let wiki = FakeWiki::new().with_list_page(
            CardCategory::Tcg,
            None,
            &[("Dark Magician", "/wiki/Dark_Magician", 1)],
            None,
        );
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();
        let connectivity = StaticConnectivity::online();

        let result = index.ensure_indexed(&connectivity, &wiki, &store).await;
        assert!(result.is_err());
        assert!(index.is_empty().await);
        assert!(!index.link_table_ready().await);

        // Not marked as indexed, so the next call tries again
        let _ = index.ensure_indexed(&connectivity, &wiki, &store).await;
        assert_eq!(wiki.list_fetches().len(), 4);
    }

    #[tokio::test]
    async fn test_stuck_continuation_token() {
        let wiki = FakeWiki::new()
            .with_list_page(CardCategory::Tcg, None, &[], Some("A"))
            .with_list_page(CardCategory::Tcg, Some("A"), &[], Some("A"));
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();

        let result = index
            .ensure_indexed(&StaticConnectivity::online(), &wiki, &store)
            .await;
        assert!(matches!(result, Err(YgoError::Parse(_))));
    }

    #[tokio::test]
    async fn test_cycling_continuation_tokens() {
        let wiki = FakeWiki::new()
            .with_list_page(
                CardCategory::Tcg,
                None,
                &[("Dark Magician", "/wiki/Dark_Magician", 1)],
                Some("X"),
            )
            .with_list_page(
                CardCategory::Tcg,
                Some("X"),
                &[("Kuriboh", "/wiki/Kuriboh", 2)],
                Some("Y"),
            )
            .with_list_page(CardCategory::Tcg, Some("Y"), &[], Some("X"));
        let (store, _temp_dir) = create_test_db();
        let index = CardIndex::new();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            index.ensure_indexed(&StaticConnectivity::online(), &wiki, &store),
        )
        .await
        .expect("indexing should stop on a repeated offset");

        assert!(matches!(result, Err(YgoError::Parse(_))));
        assert_eq!(wiki.list_fetches().len(), 3);
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_require_entry_not_found() {
        let index = CardIndex::new();
        assert!(matches!(
            index.require_entry("Dark Magician").await,
            Err(YgoError::NotFound(_))
        ));
    }

    #[test]
    fn test_page_name() {
        let entry = CardIndexEntry {
            path: "/wiki/Dark_Magician".to_string(),
            id: 1,
        };
        assert_eq!(entry.page_name(), "Dark_Magician");

        let entry = CardIndexEntry {
            path: "/Dark_Magician".to_string(),
            id: 1,
        };
        assert_eq!(entry.page_name(), "Dark_Magician");
    }
}
