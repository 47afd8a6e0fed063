//! Interaction Model
//!
//! Describes the expected output for a given input. Also used to track real
//! exchanges, e.g. turns of a chat between a user (input) and a bot (output).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::non_empty;

/// Named output values, kept in insertion order
pub type OutputValues = IndexMap<String, String>;

/// One input/output exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interaction {
    /// Text given in input to generate the output: a user sentence, a long
    /// text to summarize, a comment describing some code, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Text generated for the input: a bot reply, a summary, code, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Multi-field structured answer, used when `output` is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_values: Option<OutputValues>,
}

/// Resolved output of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedOutput<'a> {
    /// Plain text answer
    Text(&'a str),
    /// Keyed answer
    Values(&'a OutputValues),
}

impl Interaction {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            output: Some(output.into()),
            output_values: None,
        }
    }

    /// Interaction answered with named values
    pub fn with_values<K, V>(input: impl Into<String>, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            input: Some(input.into()),
            output: None,
            output_values: Some(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Interaction with an input and no answer yet
    pub fn input_only(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            ..Self::default()
        }
    }

    /// Interaction carrying only output text, e.g. a standalone sample
    pub fn output_only(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// Input text when present and not empty
    pub fn input_text(&self) -> Option<&str> {
        non_empty(self.input.as_deref())
    }

    /// Output text when present and not empty
    pub fn output_text(&self) -> Option<&str> {
        non_empty(self.output.as_deref())
    }

    pub fn has_input(&self) -> bool {
        self.input_text().is_some()
    }

    /// Resolve the expected output. Text output wins over named values.
    pub fn expected(&self) -> Option<ExpectedOutput<'_>> {
        if let Some(text) = self.output_text() {
            return Some(ExpectedOutput::Text(text));
        }
        self.output_values.as_ref().map(ExpectedOutput::Values)
    }

    /// True when the interaction contributes nothing to a prompt
    pub fn is_empty(&self) -> bool {
        self.input_text().is_none() && self.output_text().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_text() {
        let interaction = Interaction::new("Where is Rome?", "In Italy.");
        assert_eq!(interaction.expected(), Some(ExpectedOutput::Text("In Italy.")));
        assert!(interaction.has_input());
    }

    #[test]
    fn test_expected_values_keep_order() {
        let interaction =
            Interaction::with_values("Describe Rome", [("country", "Italy"), ("river", "Tiber")]);
        match interaction.expected() {
            Some(ExpectedOutput::Values(values)) => {
                let keys: Vec<&str> = values.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["country", "river"]);
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_output_wins_over_values() {
        let mut interaction = Interaction::with_values("q", [("a", "b")]);
        interaction.output = Some("text".to_string());
        assert_eq!(interaction.expected(), Some(ExpectedOutput::Text("text")));
    }

    #[test]
    fn test_empty_output_falls_back_to_values() {
        let mut interaction = Interaction::with_values("q", [("a", "b")]);
        interaction.output = Some(String::new());
        assert!(matches!(interaction.expected(), Some(ExpectedOutput::Values(_))));
    }

    #[test]
    fn test_is_empty() {
        assert!(Interaction::default().is_empty());
        let blank = Interaction {
            input: Some(String::new()),
            output: Some(String::new()),
            output_values: None,
        };
        assert!(blank.is_empty());
        assert!(!Interaction::output_only("x").is_empty());
        assert!(!Interaction::input_only("x").is_empty());
    }

    #[test]
    fn test_values_without_input_is_empty() {
        let values_only = Interaction::with_values("", [("answer", "42")]);
        assert!(values_only.expected().is_some());
        assert!(values_only.is_empty());
        assert!(!Interaction::with_values("question", [("answer", "42")]).is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let interaction: Interaction = serde_json::from_str(r#"{"input": "hello"}"#).unwrap();
        assert_eq!(interaction.input_text(), Some("hello"));
        assert_eq!(interaction.expected(), None);
    }
}
