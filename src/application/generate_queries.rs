use crate::domain::entities::event::Event;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::values::query::SearchQuery;
use std::sync::Arc;
use tracing::warn;

pub struct QueryGenerator {
    llm: Arc<dyn CompletionProvider>,
    num_queries: usize,
    max_words: usize,
}

/// Query set for one event. `degraded` is set when the LLM could not meet
/// the structural contract and truncation/padding filled the gap.
#[derive(Debug, Clone)]
pub struct GeneratedQueries {
    pub queries: Vec<SearchQuery>,
    pub degraded: bool,
}

impl QueryGenerator {
    pub fn new(llm: Arc<dyn CompletionProvider>, num_queries: usize, max_words: usize) -> Self {
        Self {
            llm,
            num_queries,
            max_words,
        }
    }

    /// Generate exactly `num_queries` search queries for an event in one
    /// batch call. A contract violation (wrong count, overlong query) or a
    /// failed call earns one retry with a stricter instruction; after that
    /// the last output is repaired by truncation/padding and the result is
    /// flagged degraded.
    pub async fn generate(&self, event: &Event) -> Result<GeneratedQueries, DomainError> {
        let first = self.attempt(&self.prompt(event, false)).await;
        let violation = match first {
            Ok(queries) => match self.validate(&queries) {
                None => {
                    return Ok(GeneratedQueries {
                        queries,
                        degraded: false,
                    })
                }
                Some(v) => v,
            },
            Err(e) => e,
        };

        warn!(event_id = %event.event_id, error = %violation, "query generation retry");
        let second = self.attempt(&self.prompt(event, true)).await;
        let salvaged = match second {
            Ok(queries) => match self.validate(&queries) {
                None => {
                    return Ok(GeneratedQueries {
                        queries,
                        degraded: false,
                    })
                }
                Some(v) => {
                    warn!(event_id = %event.event_id, error = %v, "query generation degraded");
                    queries
                }
            },
            Err(e) => {
                warn!(event_id = %event.event_id, error = %e, "query generation degraded");
                Vec::new()
            }
        };

        Ok(self.repair(event, salvaged))
    }

    fn prompt(&self, event: &Event, strict: bool) -> String {
        let mut prompt = format!(
            "The following are markets under the event titled \"{}\". \
             The markets can resolve before the scheduled close date.\n{}\n\
             # Instructions\n\
             What are {} short search queries that would meaningfully improve the accuracy \
             and confidence of a forecast regarding the market outcomes described above? \
             Output exactly {} queries, one query per line, without any other text or number. \
             Each query should be less than {} words.",
            event.title,
            event.market_description(),
            self.num_queries,
            self.num_queries,
            self.max_words,
        );
        if strict {
            prompt.push_str(
                "\nDo not include numbers, symbols, or explanations. \
                 Any line longer than the word limit is an error.",
            );
        }
        prompt
    }

    async fn attempt(&self, prompt: &str) -> Result<Vec<SearchQuery>, DomainError> {
        let output = self.llm.complete(prompt).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, l)| SearchQuery::new(l, i))
            .collect())
    }

    fn validate(&self, queries: &[SearchQuery]) -> Option<DomainError> {
        if queries.len() != self.num_queries {
            return Some(DomainError::GenerationContract(format!(
                "expected {} queries, got {}",
                self.num_queries,
                queries.len()
            )));
        }
        queries
            .iter()
            .find(|q| q.word_count() > self.max_words)
            .map(|q| {
                DomainError::GenerationContract(format!(
                    "query \"{}\" exceeds {} words",
                    q.text, self.max_words
                ))
            })
    }

    /// Last-resort repair: keep what the model produced (truncated to the
    /// word ceiling), pad the rest from event metadata so the report still
    /// gets its fixed section count.
    fn repair(&self, event: &Event, salvaged: Vec<SearchQuery>) -> GeneratedQueries {
        let mut queries: Vec<SearchQuery> = salvaged
            .into_iter()
            .take(self.num_queries)
            .map(|q| q.truncated(self.max_words))
            .collect();

        let fallbacks = self.fallback_texts(event);
        let mut next_fallback = 0;
        while queries.len() < self.num_queries {
            let text = fallbacks[next_fallback % fallbacks.len()].clone();
            next_fallback += 1;
            queries.push(SearchQuery::new(text, queries.len()).truncated(self.max_words));
        }

        GeneratedQueries {
            queries,
            degraded: true,
        }
    }

    fn fallback_texts(&self, event: &Event) -> Vec<String> {
        let mut texts = vec![event.title.clone()];
        if !event.subtitle.is_empty() {
            texts.push(format!("{} {}", event.title, event.subtitle));
        }
        texts.push(format!("{} latest news", event.title));
        texts.push(format!("{} forecast", event.title));
        texts
    }
}
