pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::build_snapshot::SnapshotBuilder;
use crate::application::generate_queries::QueryGenerator;
use crate::application::process_chunk::{ProcessChunkUseCase, RunReport};
use crate::application::reconcile::{ReconcileReport, ReconcileUseCase};
use crate::application::retrieve::EvidenceRetriever;
use crate::application::sample::SampleUseCase;
use crate::application::summarize::Summarizer;
use crate::config::PipelineConfig;
use crate::domain::entities::sample::Sample;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::market_feed::MarketFeed;
use crate::domain::ports::page_fetcher::PageFetcher;
use crate::domain::ports::search_provider::SearchProvider;
use crate::domain::ports::snapshot_store::SnapshotStore;
use crate::domain::ports::state_repository::StateRepository;
use crate::domain::values::day_stamp::DayStamp;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::feeds::kalshi::KalshiFeed;
use crate::infrastructure::llm::openai_chat::OpenAiChatProvider;
use crate::infrastructure::search::serper::SerperSearch;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::snapshot_repo::SqliteSnapshotStore;
use crate::infrastructure::state::json_state_repo::JsonStateRepository;
use crate::infrastructure::web::page_fetcher::ReqwestPageFetcher;
use rusqlite::Connection;
use std::sync::Arc;

pub struct Foresight {
    reconcile_uc: ReconcileUseCase,
    sample_uc: SampleUseCase,
    chunk_uc: ProcessChunkUseCase,
    store: Arc<dyn SnapshotStore>,
    config: PipelineConfig,
}

impl Foresight {
    /// Wire the pipeline from environment variables. Requires
    /// FORESIGHT_SERPER_API_KEY and FORESIGHT_OPENAI_API_KEY; the embedding
    /// provider is optional and defaults to noop (ranking degrades to
    /// retrieval order).
    pub fn new(config: PipelineConfig) -> Result<Self, DomainError> {
        let serper_key = std::env::var("FORESIGHT_SERPER_API_KEY")
            .map_err(|_| DomainError::InvalidInput("FORESIGHT_SERPER_API_KEY not set".into()))?;
        let openai_key = std::env::var("FORESIGHT_OPENAI_API_KEY")
            .map_err(|_| DomainError::InvalidInput("FORESIGHT_OPENAI_API_KEY not set".into()))?;
        let completion_model = std::env::var("FORESIGHT_COMPLETION_MODEL").ok();

        let provider =
            std::env::var("FORESIGHT_EMBEDDING_PROVIDER").unwrap_or_else(|_| "noop".into());
        let embedding_key = std::env::var("FORESIGHT_EMBEDDING_API_KEY").unwrap_or_default();
        let embedding_model = std::env::var("FORESIGHT_EMBEDDING_MODEL").ok();

        let embedder: Arc<dyn EmbeddingProvider> = match provider.as_str() {
            "voyage" => Arc::new(VoyageProvider::new(embedding_key, embedding_model)),
            "openai" => Arc::new(OpenAiProvider::new(embedding_key, embedding_model)),
            _ => Arc::new(NoopProvider),
        };

        Self::with_providers(
            config,
            Arc::new(KalshiFeed::new()),
            Arc::new(SerperSearch::new(serper_key)),
            Arc::new(ReqwestPageFetcher::new()),
            Arc::new(OpenAiChatProvider::new(openai_key, completion_model)),
            embedder,
        )
    }

    pub fn with_providers(
        config: PipelineConfig,
        feed: Arc<dyn MarketFeed>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        llm: Arc<dyn CompletionProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(&config.db_path)
            .map_err(|e| DomainError::Persistence(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Persistence(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;

        let store: Arc<dyn SnapshotStore> = Arc::new(SqliteSnapshotStore::new(conn));
        let state_repo: Arc<dyn StateRepository> =
            Arc::new(JsonStateRepository::new(config.state_dir.clone())?);

        let query_generator =
            QueryGenerator::new(llm.clone(), config.num_queries, config.max_query_words);
        let retriever = Arc::new(EvidenceRetriever::new(
            search,
            fetcher,
            embedder,
            config.fetch_concurrency,
            config.top_k_urls,
        ));
        let summarizer = Arc::new(Summarizer::new(llm));
        let builder = Arc::new(SnapshotBuilder::new(
            query_generator,
            retriever,
            summarizer,
            config.query_concurrency,
        ));

        Ok(Self {
            reconcile_uc: ReconcileUseCase::new(feed, state_repo.clone()),
            sample_uc: SampleUseCase::new(state_repo.clone()),
            chunk_uc: ProcessChunkUseCase::new(
                state_repo,
                store.clone(),
                builder,
                config.chunk_size,
                config.event_concurrency,
            ),
            store,
            config,
        })
    }

    /// Daily event-state reconciliation against the upstream listing.
    pub async fn reconcile(&self) -> Result<ReconcileReport, DomainError> {
        self.reconcile_uc.execute().await
    }

    /// Draw and persist the day's stratified sample of active events.
    pub fn sample(
        &self,
        day: DayStamp,
        target: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Sample, DomainError> {
        let target = target.unwrap_or(self.config.target_sample_size);
        self.sample_uc.execute(day, target, seed)
    }

    /// Build and persist snapshots for one chunk of the day's sample.
    pub async fn build_chunk(
        &self,
        day: DayStamp,
        chunk_index: usize,
    ) -> Result<RunReport, DomainError> {
        self.chunk_uc.execute(day, chunk_index).await
    }

    pub fn snapshot(
        &self,
        event_id: &str,
        day: DayStamp,
    ) -> Result<Option<Snapshot>, DomainError> {
        self.store.get(event_id, day)
    }

    pub fn snapshot_count(&self, day: DayStamp) -> Result<usize, DomainError> {
        self.store.count_for_day(day)
    }
}
