//! Shared test helpers: substitute collaborators for every external port.

#![allow(dead_code)]

use async_trait::async_trait;
use foresight::config::PipelineConfig;
use foresight::domain::error::DomainError;
use foresight::domain::ports::completion_port::CompletionProvider;
use foresight::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use foresight::domain::ports::market_feed::{EventListing, MarketFeed};
use foresight::domain::ports::page_fetcher::PageFetcher;
use foresight::domain::ports::search_provider::{SearchHit, SearchProvider};
use foresight::Foresight;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub fn listing(id: &str, domain: &str) -> EventListing {
    EventListing {
        id: id.to_string(),
        title: format!("Will {id} resolve yes"),
        subtitle: "Before end of month".to_string(),
        resolution_rules: format!("Resolves yes if {id} happens."),
        domain: domain.to_string(),
        market_count: 2,
    }
}

pub fn test_config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig {
        state_dir: dir.path().join("state"),
        db_path: dir
            .path()
            .join("snapshots.db")
            .to_string_lossy()
            .into_owned(),
        ..PipelineConfig::default()
    }
}

pub fn pipeline_with(
    config: PipelineConfig,
    feed: Arc<dyn MarketFeed>,
    llm: Arc<dyn CompletionProvider>,
) -> Foresight {
    Foresight::with_providers(
        config,
        feed,
        Arc::new(StubSearch::empty()),
        Arc::new(StubFetcher::new()),
        llm,
        Arc::new(foresight::infrastructure::embeddings::noop::NoopProvider),
    )
    .unwrap()
}

/// Market feed returning a fixed listing, or a transport error when down.
pub struct StubFeed {
    listings: Option<Vec<EventListing>>,
}

impl StubFeed {
    pub fn up(listings: Vec<EventListing>) -> Self {
        Self {
            listings: Some(listings),
        }
    }

    pub fn down() -> Self {
        Self { listings: None }
    }
}

#[async_trait]
impl MarketFeed for StubFeed {
    fn name(&self) -> &str {
        "stub"
    }

    async fn list_open_events(&self) -> Result<Vec<EventListing>, DomainError> {
        match &self.listings {
            Some(listings) => Ok(listings.clone()),
            None => Err(DomainError::UpstreamUnavailable("connection refused".into())),
        }
    }
}

pub fn hit(url: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: format!("Page at {url}"),
        snippet: "A short snippet.".to_string(),
        published: Some("2026-08-01".to_string()),
    }
}

/// Search provider returning a fixed hit list, or an error when failing.
pub struct StubSearch {
    hits: Vec<SearchHit>,
    fail: bool,
}

impl StubSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self { hits, fail: false }
    }

    pub fn empty() -> Self {
        Self::with_hits(vec![])
    }

    pub fn failing() -> Self {
        Self {
            hits: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        if self.fail {
            return Err(DomainError::Search("provider unavailable".into()));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// Page fetcher serving a url→html map; urls not in the map fail to fetch.
pub struct StubFetcher {
    pages: HashMap<String, String>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::Fetch(format!("{url}: 404")))
    }
}

/// An article page whose paragraph text mentions `topic` and clears the
/// extraction length guard.
pub fn article_page(topic: &str) -> String {
    let filler = "The situation developed further this week according to officials \
                  familiar with the matter, and several analysts revised their outlook.";
    format!("<html><body><p>Reporting on {topic}. {filler}</p><p>{filler}</p></body></html>")
}

/// LLM substitute that answers by prompt shape: query-generation prompts get
/// `query_lines`, summarization prompts get `summary` (or an error when
/// unset). Every prompt received is recorded.
pub struct StubLlm {
    query_lines: Vec<String>,
    summary: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn new(query_lines: Vec<&str>, summary: Option<&str>) -> Self {
        Self {
            query_lines: query_lines.into_iter().map(String::from).collect(),
            summary: summary.map(String::from),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `count` well-formed queries plus a working summarizer.
    pub fn well_behaved(count: usize) -> Self {
        let lines: Vec<String> = (0..count).map(|i| format!("query number {i}")).collect();
        Self {
            query_lines: lines,
            summary: Some("Factual insight from the article. (2026-08-01, see source)".into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn is_query_prompt(prompt: &str) -> bool {
        prompt.contains("short search queries")
    }
}

#[async_trait]
impl CompletionProvider for StubLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if Self::is_query_prompt(prompt) {
            Ok(self.query_lines.join("\n"))
        } else {
            self.summary
                .clone()
                .ok_or_else(|| DomainError::Completion("model overloaded".into()))
        }
    }
}

/// Embeds text as keyword counts so cosine ranking is deterministic.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(keywords: Vec<&str>) -> Self {
        Self {
            keywords: keywords.into_iter().map(String::from).collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts
            .iter()
            .map(|text| {
                self.keywords
                    .iter()
                    .map(|k| text.matches(k.as_str()).count() as f32)
                    .collect()
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.keywords.len()
    }
}
