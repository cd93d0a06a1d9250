use crate::config::HTTP_TIMEOUT;
use crate::domain::error::DomainError;
use crate::domain::ports::search_provider::{SearchHit, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Serper (Google Search) adapter.
pub struct SerperSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

impl SerperSearch {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://google.serper.dev".into())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({
                "q": query,
                "num": max_results,
            }))
            .send()
            .await
            .map_err(|e| DomainError::Search(format!("Serper request: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Search(format!("Serper API {status}: {body}")));
        }

        let data: SerperResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Serper response: {e}")))?;

        let hits: Vec<SearchHit> = data
            .organic
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .take(max_results)
            .map(|r| SearchHit {
                url: r.link,
                title: r.title,
                snippet: r.snippet,
                published: r.date,
            })
            .collect();

        debug!(query, count = hits.len(), "search complete");
        Ok(hits)
    }
}
