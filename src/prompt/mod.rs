//! Prompt Values
//!
//! The data a prompt is assembled from and the rendered result:
//!
//! - [`Interaction`]: one input/output exchange, used for examples and dialog
//! - [`ExpectedOutput`]: the resolved output of an interaction (text or keyed values)
//! - [`OutputFormatter`]: strategy rendering an expected output as text or JSON
//! - [`Prompt`]: the final string, ready to be sent to a completion API

mod format;
mod interaction;

pub use format::{JsonFormatter, OutputFormatter, TextFormatter, formatter_for};
pub use interaction::{ExpectedOutput, Interaction, OutputValues};

use std::fmt;

/// The prompt generated by an engine's `render` call.
///
/// Immutable; the only thing it offers is the rendered text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// An empty prompt
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
