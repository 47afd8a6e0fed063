//! Analyze Command
//!
//! Ask one or more questions about a body of content with the text analysis
//! engine. All queries share the same content.
//!
//! Usage:
//!   promptengine analyze --content FILE|- --query TEXT [--query TEXT...] [--query-first]

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::ui::print_prompt;
use crate::config::ConfigLoader;
use crate::engine::{PromptEngine, TextAnalysisEngine};
use crate::prompt::Prompt;
use crate::types::{PromptError, Result};

/// Options of the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// File holding the content, `-` for stdin
    pub content: PathBuf,
    /// Queries, rendered one prompt each
    pub queries: Vec<String>,
    /// Put the query before the content
    pub query_first: bool,
    /// Settings file for separators and framing; discovered in the working directory when absent
    pub settings: Option<PathBuf>,
    /// Surround each prompt with rules
    pub framed: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let content = read_content(&options.content)?;
    let prompts = build(&options, &content)?;

    for (index, prompt) in prompts.iter().enumerate() {
        let title = format!("Prompt #{}", index + 1);
        print_prompt(prompt, Some(&title), options.framed)?;
    }
    Ok(())
}

/// Render one prompt per query over the same content
pub fn build(options: &AnalyzeOptions, content: &str) -> Result<Vec<Prompt>> {
    if options.queries.is_empty() {
        return Err(PromptError::config("At least one --query is required"));
    }

    let settings = ConfigLoader::load(options.settings.as_deref())?;
    let engine = TextAnalysisEngine::with_settings(content, options.query_first, settings);
    info!(
        "Analyzing {} bytes of content with {} queries",
        engine.content().len(),
        options.queries.len()
    );

    Ok(options
        .queries
        .iter()
        .map(|query| engine.render(Some(query)))
        .collect())
}

fn read_content(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    if !path.exists() {
        return Err(PromptError::missing_file(path));
    }
    Ok(std::fs::read_to_string(path)?)
}
