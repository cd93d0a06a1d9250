use std::path::PathBuf;
use std::time::Duration;

/// Target size of the daily stratified sample.
pub const TARGET_SAMPLE_SIZE: usize = 210;

/// Queries generated per event, and therefore sections per report.
pub const NUM_QUERIES: usize = 6;

/// Word ceiling for a generated search query.
pub const MAX_QUERY_WORDS: usize = 7;

/// Documents kept per query after ranking (K). The search request asks for
/// 2×K urls so dedup and fetch failures still leave enough candidates.
pub const TOP_K_URLS: usize = 5;

/// Events per sharded build run; chunk boundaries are index ranges over the
/// day's sample.
pub const CHUNK_SIZE: usize = 70;

/// Events with this many markets or more are excluded upstream (complexity cap).
pub const MAX_MARKET_COUNT: u32 = 6;

/// Concurrent end-to-end event builds within one chunk run.
pub const EVENT_CONCURRENCY: usize = 4;

/// Concurrent query chains (search → fetch → summarize) within one event.
pub const QUERY_CONCURRENCY: usize = 3;

/// Concurrent page fetches across a run.
pub const FETCH_CONCURRENCY: usize = 10;

/// Per-request timeout for page fetches and market API calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-request timeout for LLM calls.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(90);

/// Extracted article text outside this length range is dropped: too short
/// is a consent wall or a stub, too long is a crawler trap.
pub const MIN_ARTICLE_CHARS: usize = 200;
pub const MAX_ARTICLE_CHARS: usize = 100_000;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding active/resolved/sample JSON files (FORESIGHT_STATE_DIR)
    pub state_dir: PathBuf,
    /// SQLite snapshot store path (FORESIGHT_DB)
    pub db_path: String,
    pub target_sample_size: usize,
    pub num_queries: usize,
    pub max_query_words: usize,
    pub top_k_urls: usize,
    pub chunk_size: usize,
    pub event_concurrency: usize,
    pub query_concurrency: usize,
    pub fetch_concurrency: usize,
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("./state"),
            db_path: "./foresight.db".to_string(),
            target_sample_size: TARGET_SAMPLE_SIZE,
            num_queries: NUM_QUERIES,
            max_query_words: MAX_QUERY_WORDS,
            top_k_urls: TOP_K_URLS,
            chunk_size: CHUNK_SIZE,
            event_concurrency: EVENT_CONCURRENCY,
            query_concurrency: QUERY_CONCURRENCY,
            fetch_concurrency: FETCH_CONCURRENCY,
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            state_dir: std::env::var("FORESIGHT_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            db_path: std::env::var("FORESIGHT_DB").unwrap_or(defaults.db_path),
            target_sample_size: env_usize("FORESIGHT_TARGET_SAMPLE", defaults.target_sample_size),
            num_queries: env_usize("FORESIGHT_NUM_QUERIES", defaults.num_queries),
            max_query_words: env_usize("FORESIGHT_MAX_QUERY_WORDS", defaults.max_query_words),
            top_k_urls: env_usize("FORESIGHT_TOP_K_URLS", defaults.top_k_urls),
            chunk_size: env_usize("FORESIGHT_CHUNK_SIZE", defaults.chunk_size),
            event_concurrency: env_usize("FORESIGHT_EVENT_CONCURRENCY", defaults.event_concurrency),
            query_concurrency: env_usize("FORESIGHT_QUERY_CONCURRENCY", defaults.query_concurrency),
            fetch_concurrency: env_usize("FORESIGHT_FETCH_CONCURRENCY", defaults.fetch_concurrency),
            log_level: std::env::var("FORESIGHT_LOG").unwrap_or(defaults.log_level),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
