use crate::application::generate_queries::QueryGenerator;
use crate::application::retrieve::EvidenceRetriever;
use crate::application::summarize::Summarizer;
use crate::domain::entities::event::Event;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::values::day_stamp::DayStamp;
use crate::domain::values::query::SearchQuery;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

pub struct SnapshotBuilder {
    queries: QueryGenerator,
    retriever: Arc<EvidenceRetriever>,
    summarizer: Arc<Summarizer>,
    query_limiter: Arc<Semaphore>,
}

/// A finished build plus whether any stage had to degrade (fallback
/// queries, dead search, failed summarization). Degraded snapshots are
/// still persisted — a thin snapshot beats none.
#[derive(Debug)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,
    pub degraded: bool,
}

impl SnapshotBuilder {
    pub fn new(
        queries: QueryGenerator,
        retriever: Arc<EvidenceRetriever>,
        summarizer: Arc<Summarizer>,
        query_concurrency: usize,
    ) -> Self {
        Self {
            queries,
            retriever,
            summarizer,
            query_limiter: Arc::new(Semaphore::new(query_concurrency)),
        }
    }

    /// Assemble the full context snapshot for one event: N queries, one
    /// retrieve→summarize chain per query run concurrently, sections
    /// concatenated in query order. The snapshot is completed in memory —
    /// persistence is the caller's single write, so an interruption can
    /// never leave a partial record behind.
    pub async fn build(&self, event: &Event, day: DayStamp) -> Result<BuildOutcome, DomainError> {
        let generated = self.queries.generate(event).await?;
        let mut degraded = generated.degraded;
        let reference = event.market_description();

        let chains = generated
            .queries
            .iter()
            .map(|query| self.run_query_chain(event, query, &reference));
        let sections = futures::future::join_all(chains).await;

        let mut report = String::new();
        let mut source_urls: Vec<String> = Vec::new();
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                report.push_str("\n\n");
            }
            report.push_str(&format!("# Research Report {}\n{}", i + 1, section.text));
            degraded |= section.degraded;
            for url in &section.cited_urls {
                if !source_urls.contains(url) {
                    source_urls.push(url.clone());
                }
            }
        }

        info!(
            event_id = %event.event_id,
            sections = sections.len(),
            sources = source_urls.len(),
            degraded,
            "snapshot built"
        );

        Ok(BuildOutcome {
            snapshot: Snapshot {
                event_id: event.event_id.clone(),
                day,
                captured_at: Utc::now(),
                report_text: report,
                queries_used: generated.queries.into_iter().map(|q| q.text).collect(),
                source_urls,
            },
            degraded,
        })
    }

    /// search → dedupe/rank → summarize for one query. Failure of any stage
    /// degrades this section to empty; the other sections are unaffected.
    async fn run_query_chain(
        &self,
        event: &Event,
        query: &SearchQuery,
        reference: &str,
    ) -> SectionResult {
        let _permit = match self.query_limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => return SectionResult::degraded(),
        };

        let evidence = self.retriever.retrieve(&query.text, reference).await;
        let mut degraded = evidence.degraded;

        let text = match self.summarizer.summarize(event, &evidence.documents).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    event_id = %event.event_id,
                    query = %query.text,
                    error = %e,
                    "summarization failed, section left empty"
                );
                degraded = true;
                String::new()
            }
        };

        // A document counts as cited when its query produced a non-empty
        // section; the summarizer is instructed to close each paragraph
        // with the source URL.
        let cited_urls = if text.is_empty() {
            Vec::new()
        } else {
            evidence.documents.into_iter().map(|d| d.url).collect()
        };

        SectionResult {
            text,
            cited_urls,
            degraded,
        }
    }
}

struct SectionResult {
    text: String,
    cited_urls: Vec<String>,
    degraded: bool,
}

impl SectionResult {
    fn degraded() -> Self {
        Self {
            text: String::new(),
            cited_urls: Vec::new(),
            degraded: true,
        }
    }
}
