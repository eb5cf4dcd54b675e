//! In-memory wiki used by unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ArticleItem, ArticleListPage, CardCategory, WikiSource};
use crate::error::{Result, YgoError};

pub const BASE_URL: &str = "http://wiki.test";

#[derive(Default)]
pub struct FakeWiki {
    pages: HashMap<String, String>,
    lists: HashMap<(CardCategory, Option<String>), ArticleListPage>,
    page_fetches: Mutex<HashMap<String, usize>>,
    list_fetches: Mutex<Vec<(CardCategory, Option<String>)>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, path: &str, html: &str) -> Self {
        self.pages.insert(path.to_string(), html.to_string());
        self
    }

    /// Register the list page served for `category` at continuation `offset`.
    /// Items are `(title, path, id)`.
    pub fn with_list_page(
        mut self,
        category: CardCategory,
        offset: Option<&str>,
        items: &[(&str, &str, u64)],
        next: Option<&str>,
    ) -> Self {
        let page = ArticleListPage {
            items: items
                .iter()
                .map(|(title, url, id)| ArticleItem {
                    id: *id,
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
            offset: next.map(str::to_string),
        };
        self.lists.insert((category, offset.map(str::to_string)), page);
        self
    }

    pub fn page_fetches(&self, path: &str) -> usize {
        self.page_fetches
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_page_fetches(&self) -> usize {
        self.page_fetches.lock().unwrap().values().sum()
    }

    pub fn list_fetches(&self) -> Vec<(CardCategory, Option<String>)> {
        self.list_fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl WikiSource for FakeWiki {
    async fn fetch_article_list(
        &self,
        category: CardCategory,
        offset: Option<&str>,
    ) -> Result<ArticleListPage> {
        let key = (category, offset.map(str::to_string));
        self.list_fetches.lock().unwrap().push(key.clone());

        self.lists.get(&key).cloned().ok_or_else(|| YgoError::HttpStatus {
            status: 404,
            message: format!("no list page for {:?}", key),
        })
    }

    async fn fetch_page(&self, path: &str) -> Result<String> {
        *self
            .page_fetches
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_insert(0) += 1;

        self.pages.get(path).cloned().ok_or_else(|| YgoError::HttpStatus {
            status: 404,
            message: format!("GET {}{} failed", BASE_URL, path),
        })
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}
