//! Text Analysis Engine
//!
//! Builds a prompt from a fixed body of content and a query on it. The query
//! goes after the content by default, or before it on demand.

use super::{GenericEngine, PromptEngine};
use crate::config::Settings;
use crate::prompt::Prompt;
use crate::types::non_empty;

#[derive(Debug, Clone)]
pub struct TextAnalysisEngine {
    base: GenericEngine,
    /// Content to analyze, trimmed once at construction
    content: String,
    query_before_text: bool,
}

impl TextAnalysisEngine {
    pub fn new(content: &str, query_before_text: bool) -> Self {
        Self::with_settings(content, query_before_text, Settings::default())
    }

    /// Content first, query last
    pub fn with_content(content: &str) -> Self {
        Self::new(content, false)
    }

    /// Use custom separators and framing. The description of `settings` is
    /// replaced on every render by the content or the query.
    pub fn with_settings(content: &str, query_before_text: bool, settings: Settings) -> Self {
        Self {
            base: GenericEngine::new(settings),
            content: content.trim().to_string(),
            query_before_text,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn query_before_text(&self) -> bool {
        self.query_before_text
    }

    pub fn settings(&self) -> &Settings {
        self.base.settings()
    }
}

impl PromptEngine for TextAnalysisEngine {
    /// Render the content with `query`. Without a query nothing is rendered.
    fn render(&self, query: Option<&str>) -> Prompt {
        let Some(query) = non_empty(query) else {
            return Prompt::empty();
        };
        let query = query.trim();

        if self.query_before_text {
            self.base.assemble(Some(query), Some(&self.content))
        } else {
            self.base.assemble(Some(&self.content), Some(query))
        }
    }
}
