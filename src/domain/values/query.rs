use serde::{Deserialize, Serialize};

/// One short web search string derived from an event, bounded in word count.
/// `index` is its position in the per-event query set and fixes the section
/// order of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub index: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Truncate to at most `max_words` words, collapsing whitespace.
    pub fn truncated(&self, max_words: usize) -> Self {
        let text = self
            .text
            .split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            index: self.index,
        }
    }
}
