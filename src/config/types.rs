//! Configuration Types
//!
//! `Settings` holds every option controlling how a prompt is assembled:
//! separators, prefixes, postfixes, the output format and the example list.
//! Every text field is optional; an empty string behaves like an absent one.

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::prompt::Interaction;
use crate::types::non_empty;

/// Root settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many tokens (or chars) the selected model can handle.
    /// Carried for callers and never enforced by the engines.
    pub prompt_max_length: usize,

    /// Optional description added at the beginning of the prompt
    pub description: Option<String>,

    /// Added before the description, e.g. to open a code comment (`/*`, `#`)
    pub description_prefix: Option<String>,

    /// Added after the description, e.g. to close a code comment (`*/`)
    pub description_postfix: Option<String>,

    /// Separates description, examples, dialog turns and the final input
    #[serde(with = "unset_as_empty")]
    pub text_blocks_separator: Option<String>,

    /// Inserted before every input, examples and user turns alike.
    /// A user name in a chat, a comment opener for code generation, etc.
    pub input_prefix: Option<String>,

    /// Inserted after every input
    pub input_postfix: Option<String>,

    /// Inserted before every output, e.g. the bot name in a chat.
    /// Also ends the prompt, so the model continues from there.
    pub output_prefix: Option<String>,

    /// Inserted after every example output
    pub output_postfix: Option<String>,

    /// How example outputs are rendered
    pub output_format: OutputFormat,

    /// Separates an input from its output
    #[serde(with = "unset_as_empty")]
    pub input_output_separator: Option<String>,

    /// Separates the name of an output value from the value (text format only)
    #[serde(with = "unset_as_empty")]
    pub multiple_text_key_value_separator: Option<String>,

    /// Separates output values from each other (text format only)
    #[serde(with = "unset_as_empty")]
    pub multiple_text_values_separator: Option<String>,

    /// Input/output examples telling the model what output to generate.
    /// Rendered in order.
    pub examples: Vec<Interaction>,

    /// Marks the end of the examples, e.g. "Forget the earlier conversation",
    /// so the model does not treat them as context for the real dialog.
    pub context_reset_text: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt_max_length: defaults::PROMPT_MAX_LENGTH,
            description: None,
            description_prefix: None,
            description_postfix: None,
            text_blocks_separator: Some(defaults::TEXT_BLOCKS_SEPARATOR.to_string()),
            input_prefix: None,
            input_postfix: None,
            output_prefix: None,
            output_postfix: None,
            output_format: OutputFormat::Text,
            input_output_separator: Some(defaults::INPUT_OUTPUT_SEPARATOR.to_string()),
            multiple_text_key_value_separator: Some(
                defaults::MULTIPLE_TEXT_KEY_VALUE_SEPARATOR.to_string(),
            ),
            multiple_text_values_separator: Some(
                defaults::MULTIPLE_TEXT_VALUES_SEPARATOR.to_string(),
            ),
            examples: Vec::new(),
            context_reset_text: None,
        }
    }
}

impl Settings {
    /// Settings with every field unset: no separators, no examples
    pub fn empty() -> Self {
        Self {
            prompt_max_length: 0,
            description: None,
            description_prefix: None,
            description_postfix: None,
            text_blocks_separator: None,
            input_prefix: None,
            input_postfix: None,
            output_prefix: None,
            output_postfix: None,
            output_format: OutputFormat::Text,
            input_output_separator: None,
            multiple_text_key_value_separator: None,
            multiple_text_values_separator: None,
            examples: Vec::new(),
            context_reset_text: None,
        }
    }

    /// Default settings with the given description
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Separator between text blocks, empty when unset
    pub fn blocks_separator(&self) -> &str {
        self.text_blocks_separator.as_deref().unwrap_or_default()
    }

    /// Separator between an input and its output, empty when unset
    pub fn io_separator(&self) -> &str {
        self.input_output_separator.as_deref().unwrap_or_default()
    }

    /// Reset marker when set and not empty
    pub fn reset_text(&self) -> Option<&str> {
        non_empty(self.context_reset_text.as_deref())
    }
}

/// Separators with non-empty defaults: unset is written as `""`, and `""` or
/// `null` reads back as unset, so a written file loads to the same settings
mod unset_as_empty {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
    }
}

// =============================================================================
// Output Format
// =============================================================================

/// Rendering used for example outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Verbatim text; named values as `key: value` lines
    #[default]
    #[serde(alias = "Text", alias = "TEXT")]
    Text,
    /// JSON string or JSON object
    #[serde(alias = "Json", alias = "JSON")]
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: text, json",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.prompt_max_length, 1024);
        assert_eq!(settings.blocks_separator(), "\n\n");
        assert_eq!(settings.io_separator(), "\n");
        assert_eq!(settings.multiple_text_key_value_separator.as_deref(), Some(": "));
        assert_eq!(settings.multiple_text_values_separator.as_deref(), Some("\n"));
        assert_eq!(settings.output_format, OutputFormat::Text);
        assert!(settings.examples.is_empty());
    }

    #[test]
    fn test_empty_settings() {
        let settings = Settings::empty();
        assert_eq!(settings.prompt_max_length, 0);
        assert_eq!(settings.blocks_separator(), "");
        assert_eq!(settings.io_separator(), "");
        assert!(settings.reset_text().is_none());
    }

    #[test]
    fn test_reset_text_ignores_empty() {
        let settings = Settings {
            context_reset_text: Some(String::new()),
            ..Settings::default()
        };
        assert!(settings.reset_text().is_none());
    }

    #[test]
    fn test_output_format() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_output_format_serde() {
        let format: OutputFormat = serde_json::from_str("\"Json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(serde_json::to_string(&OutputFormat::Text).unwrap(), "\"text\"");
    }

    #[test]
    fn test_serialize_lists_every_field() {
        let json = serde_json::to_value(Settings::empty()).unwrap();
        assert!(json["description"].is_null());
        assert_eq!(json["text_blocks_separator"], "");
        assert_eq!(json["output_format"], "text");
    }

    #[test]
    fn test_unset_separators_survive_serialization() {
        let settings = Settings {
            description: Some("D".to_string()),
            text_blocks_separator: None,
            multiple_text_values_separator: None,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);

        let parsed: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.blocks_separator(), "\n\n");
    }
}
