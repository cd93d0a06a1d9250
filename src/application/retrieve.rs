use crate::config::{MAX_ARTICLE_CHARS, MIN_ARTICLE_CHARS};
use crate::domain::entities::document::Document;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::page_fetcher::PageFetcher;
use crate::domain::ports::search_provider::{SearchHit, SearchProvider};
use crate::domain::values::similarity::{cosine_similarity, top_k_by_score};
use crate::domain::values::url_canon::dedupe_by_canonical;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Only a bounded prefix of each article goes to the embedding provider;
/// relevance is decided in the first screenfuls, not the footer.
const EMBED_PREFIX_CHARS: usize = 4000;

pub struct EvidenceRetriever {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    embedder: Arc<dyn EmbeddingProvider>,
    fetch_limiter: Arc<Semaphore>,
    top_k: usize,
}

/// Ranked, deduplicated evidence for one query. `degraded` marks a total
/// search failure or a batch where every fetch died — fewer documents than
/// K is normal operation, not degradation.
#[derive(Debug, Default)]
pub struct RetrievedEvidence {
    pub documents: Vec<Document>,
    pub degraded: bool,
}

impl EvidenceRetriever {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn EmbeddingProvider>,
        fetch_concurrency: usize,
        top_k: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            embedder,
            fetch_limiter: Arc::new(Semaphore::new(fetch_concurrency)),
            top_k,
        }
    }

    /// One query → at most K scraped documents, ranked by similarity to the
    /// event's market metadata. Degrades to fewer (or zero) documents on
    /// search/fetch failures; never errors out of the build.
    pub async fn retrieve(&self, query: &str, reference: &str) -> RetrievedEvidence {
        // 2×K margin compensates for dedup, fetch failures, and empty pages.
        let hits = match self.search.search(query, self.top_k * 2).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "search failed, returning no evidence");
                return RetrievedEvidence {
                    documents: Vec::new(),
                    degraded: true,
                };
            }
        };

        let candidates = dedupe_by_canonical(hits, |h| h.url.as_str());
        let had_candidates = !candidates.is_empty();
        let fetches = candidates.into_iter().map(|hit| self.fetch_one(hit));
        let documents: Vec<Document> = futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        if documents.is_empty() {
            return RetrievedEvidence {
                documents,
                degraded: had_candidates,
            };
        }

        let ranked = self.rank(documents, reference).await;
        RetrievedEvidence {
            documents: ranked,
            degraded: false,
        }
    }

    /// Fetch and extract one candidate page. Any failure drops the page —
    /// no retry; retrieval proceeds with fewer documents.
    async fn fetch_one(&self, hit: SearchHit) -> Option<Document> {
        let _permit = self.fetch_limiter.acquire().await.ok()?;
        let html = match self.fetcher.fetch(&hit.url).await {
            Ok(html) => html,
            Err(e) => {
                debug!(url = %hit.url, error = %e, "fetch failed, dropping page");
                return None;
            }
        };
        let text = extract_paragraphs(&html);
        if text.len() < MIN_ARTICLE_CHARS || text.len() > MAX_ARTICLE_CHARS {
            debug!(url = %hit.url, chars = text.len(), "extraction outside length guard");
            return None;
        }
        Some(Document {
            url: hit.url,
            title: hit.title,
            snippet: hit.snippet,
            text,
            published: hit.published,
            fetched_at: Utc::now(),
        })
    }

    /// Cosine-rank documents against the reference text; stable sort keeps
    /// retrieval order on ties. Without a usable embedding provider the
    /// ranking degrades to retrieval order.
    async fn rank(&self, documents: Vec<Document>, reference: &str) -> Vec<Document> {
        if self.embedder.dimension() == 0 {
            let mut docs = documents;
            docs.truncate(self.top_k);
            return docs;
        }

        let mut inputs: Vec<String> = vec![reference.to_string()];
        inputs.extend(
            documents
                .iter()
                .map(|d| d.text.chars().take(EMBED_PREFIX_CHARS).collect::<String>()),
        );

        let vectors = match self.embedder.embed(&inputs, InputType::Document).await {
            Ok(v) if v.len() == inputs.len() => v,
            Ok(_) | Err(_) => {
                warn!("embedding unavailable, keeping retrieval order");
                let mut docs = documents;
                docs.truncate(self.top_k);
                return docs;
            }
        };

        let reference_vec = &vectors[0];
        let scores: Vec<f64> = vectors[1..]
            .iter()
            .map(|v| cosine_similarity(reference_vec, v))
            .collect();

        let mut docs: Vec<Option<Document>> = documents.into_iter().map(Some).collect();
        top_k_by_score(&scores, self.top_k)
            .into_iter()
            .filter_map(|i| docs[i].take())
            .collect()
    }
}

/// Paragraph-level text extraction: the joined text of `<p>` elements,
/// scripts and styles excluded by construction of the selector.
pub fn extract_paragraphs(html: &str) -> String {
    let doc = scraper::Html::parse_document(html);
    let selector = scraper::Selector::parse("p").expect("static selector");
    doc.select(&selector)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
