use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use super::http_client::create_wiki_client;
use super::types::{ArticleListPage, CardCategory};
use crate::config::WikiConfig;
use crate::error::{Result, YgoError};

const LIST_PATH: &str = "/api/v1/Articles/List";

/// Remote side of the card database: the wiki's list endpoint and its pages.
///
/// Fetches are never cached here; see [`crate::cache::DocumentCache`].
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Fetch one page of the article list for a category, continuing from `offset`
    async fn fetch_article_list(
        &self,
        category: CardCategory,
        offset: Option<&str>,
    ) -> Result<ArticleListPage>;

    /// Fetch the HTML body of a page given its path relative to the wiki root
    async fn fetch_page(&self, path: &str) -> Result<String>;

    /// Wiki root URL, without trailing slash
    fn base_url(&self) -> &str;
}

/// HTTP implementation of [`WikiSource`]
pub struct WikiClient {
    config: WikiConfig,
    http_client: Client,
}

impl WikiClient {
    pub fn new(config: WikiConfig) -> Result<Self> {
        let http_client = create_wiki_client(&config)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Build the list endpoint URL. The continuation token, when present, is
    /// always the last query parameter.
    pub fn article_list_url(&self, category: CardCategory, offset: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url, LIST_PATH))
            .map_err(|e| YgoError::Config(format!("Invalid wiki base URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("category", category.as_str())
                .append_pair("limit", &self.config.page_size.to_string())
                .append_pair("namespaces", "0");
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }

        Ok(url)
    }

    /// Execute request with retry logic
    async fn execute_with_retry(&self, url: &str) -> Result<Response> {
        let mut last_error = None;
        let mut retry_delay = Duration::from_millis(self.config.retry_base_delay);

        for attempt in 0..self.config.max_retries.max(1) {
            if attempt > 0 {
                debug!("Retrying {} (attempt {})", url, attempt + 1);
                sleep(retry_delay).await;
                retry_delay *= 2;
            }

            match self.http_client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    } else if status.as_u16() == 429 {
                        last_error = Some(YgoError::RateLimit);
                    } else if status.is_server_error() {
                        last_error = Some(YgoError::ServerError(format!(
                            "Server returned status {}",
                            status
                        )));
                    } else {
                        return Err(YgoError::HttpStatus {
                            status: status.as_u16(),
                            message: format!("GET {} failed", url),
                        });
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(YgoError::Timeout(self.config.timeout));
                }
                Err(e) => {
                    last_error = Some(YgoError::Network(e));
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| YgoError::Other("Request failed after all retries".to_string()));
        warn!("Giving up on {}: {}", url, error);
        Err(error)
    }
}

#[async_trait]
impl WikiSource for WikiClient {
    async fn fetch_article_list(
        &self,
        category: CardCategory,
        offset: Option<&str>,
    ) -> Result<ArticleListPage> {
        let url = self.article_list_url(category, offset)?;
        debug!("Fetching article list: {}", url);

        let body = self.execute_with_retry(url.as_str()).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            YgoError::Parse(format!(
                "Unexpected article list response for {}: {}",
                category.as_str(),
                e
            ))
        })
    }

    async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("Fetching page: {}", url);

        let body = self.execute_with_retry(&url).await?.text().await?;
        Ok(body)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
