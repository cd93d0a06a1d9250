use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One retrieved and scraped web page. `text` is the paragraph-level
/// extraction and is non-empty by construction — empty extractions are
/// dropped before a Document exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    /// Search-result snippet, kept because it often carries the one-line
    /// context the page body buries.
    pub snippet: String,
    pub text: String,
    /// Best-effort publication date as reported by the search provider.
    pub published: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
