use crate::domain::entities::document::Document;
use crate::domain::entities::event::Event;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use std::sync::Arc;

pub struct Summarizer {
    llm: Arc<dyn CompletionProvider>,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    /// One factual paragraph per relevant document, each ending with its
    /// source date and URL. Zero relevant documents is a valid empty
    /// outcome, not an error; the caller degrades a failed call to an empty
    /// section and keeps building.
    pub async fn summarize(
        &self,
        event: &Event,
        documents: &[Document],
    ) -> Result<String, DomainError> {
        if documents.is_empty() {
            return Ok(String::new());
        }
        let output = self.llm.complete(&self.prompt(event, documents)).await?;
        Ok(output.trim().to_string())
    }

    fn prompt(&self, event: &Event, documents: &[Document]) -> String {
        let mut articles = String::new();
        for (i, doc) in documents.iter().enumerate() {
            articles.push_str(&format!(
                "# Article {}\nTitle: {}\nBody: {}\nSource URL: {}\n",
                i + 1,
                doc.title,
                doc.snippet,
                doc.url,
            ));
            if let Some(published) = &doc.published {
                articles.push_str(&format!("Published: {published}\n"));
            }
            articles.push_str(&format!("Full Content: {}\n\n", doc.text));
        }

        format!(
            "The following are markets under the event titled \"{}\". \
             The markets can resolve before the scheduled close date.\n{}\n\
             {}\n\
             # Instructions\n\
             Carefully read the articles provided above. Your task is to generate a \
             multi-paragraph summary (one paragraph per article) that highlights factual \
             insights or relevant context related to the listed markets. Avoid subjective \
             opinions or speculative statements. Use plain text without markdown syntax, \
             heading, or numbering. Do not add any additional text outside the summary.\n\
             Return blank for an article that does not contain relevant information. \
             Exclude only the articles that are clearly off-topic, entirely unrelated to \
             the markets. If an article is at least broadly related or offers potentially \
             useful context, it should be considered relevant.\n\
             Important note: Include the date and source URL of the article at the end of \
             each paragraph.",
            event.title,
            event.market_description(),
            articles.trim_end(),
        )
    }
}
