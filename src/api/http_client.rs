use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::WikiConfig;
use crate::error::Result;

/// Build the HTTP client shared by every wiki request.
///
/// Every request carries the configured timeout so a stalled connection can
/// never suspend a caller indefinitely.
pub fn create_wiki_client(config: &WikiConfig) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(config.timeout.clamp(1, 10)))
        .timeout(Duration::from_secs(config.timeout.max(1)))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(config.user_agent.clone())
        .use_rustls_tls()
        .build()?;

    Ok(client)
}
