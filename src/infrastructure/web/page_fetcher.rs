use crate::config::HTTP_TIMEOUT;
use crate::domain::error::DomainError;
use crate::domain::ports::page_fetcher::PageFetcher;
use async_trait::async_trait;
use reqwest::Client;

/// Plain HTTP transport for evidence pages. Many news sites reject obvious
/// bot agents, so the client presents a browser user-agent string.
pub struct ReqwestPageFetcher {
    client: Client,
}

impl ReqwestPageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0")
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for ReqwestPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("{url}: {e}")))?;

        if !resp.status().is_success() {
            return Err(DomainError::Fetch(format!("{url}: {}", resp.status())));
        }

        resp.text()
            .await
            .map_err(|e| DomainError::Fetch(format!("{url}: {e}")))
    }
}
