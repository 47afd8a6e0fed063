//! Prompt Engines
//!
//! Engines turn [`Settings`](crate::config::Settings) plus an optional user
//! input into a [`Prompt`]:
//!
//! - [`GenericEngine`]: description, examples, dialog and input framing
//! - [`TextAnalysisEngine`]: a fixed body of content plus a query per call

pub mod generic;
pub mod text_analysis;

pub use generic::GenericEngine;
pub use text_analysis::TextAnalysisEngine;

use crate::prompt::Prompt;

/// Common interface of all prompt engines
pub trait PromptEngine: Send + Sync {
    /// Generate a prompt for the given input, ready to be sent to a model.
    ///
    /// Never fails: absent and empty text simply contribute nothing.
    fn render(&self, input: Option<&str>) -> Prompt;
}
