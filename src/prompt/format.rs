//! Output Formatting
//!
//! Renders the expected output of an example. New formats plug in by
//! implementing [`OutputFormatter`] and extending [`formatter_for`].

use tracing::warn;

use super::interaction::ExpectedOutput;
use crate::config::{OutputFormat, Settings};

/// Strategy writing an expected output into the prompt buffer
pub trait OutputFormatter: Send + Sync {
    fn write_output(&self, output: ExpectedOutput<'_>, buf: &mut String);
}

/// Plain text: text is verbatim, named values become `key: value` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter<'a> {
    pub key_value_separator: &'a str,
    pub values_separator: &'a str,
}

impl<'a> TextFormatter<'a> {
    pub fn new(key_value_separator: &'a str, values_separator: &'a str) -> Self {
        Self {
            key_value_separator,
            values_separator,
        }
    }
}

impl OutputFormatter for TextFormatter<'_> {
    fn write_output(&self, output: ExpectedOutput<'_>, buf: &mut String) {
        match output {
            ExpectedOutput::Text(text) => buf.push_str(text),
            ExpectedOutput::Values(values) => {
                for (key, value) in values {
                    buf.push_str(key);
                    buf.push_str(self.key_value_separator);
                    buf.push_str(value);
                    buf.push_str(self.values_separator);
                }
            }
        }
    }
}

/// JSON: text becomes a quoted JSON string, named values a JSON object
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn write_output(&self, output: ExpectedOutput<'_>, buf: &mut String) {
        let encoded = match output {
            ExpectedOutput::Text(text) => serde_json::to_string(text),
            ExpectedOutput::Values(values) => serde_json::to_string(values),
        };
        match encoded {
            Ok(json) => buf.push_str(&json),
            Err(e) => warn!("Failed to encode example output as JSON: {}", e),
        }
    }
}

/// Select the formatter configured by the settings
pub fn formatter_for(settings: &Settings) -> Box<dyn OutputFormatter + '_> {
    match settings.output_format {
        OutputFormat::Text => Box::new(TextFormatter::new(
            settings.multiple_text_key_value_separator.as_deref().unwrap_or_default(),
            settings.multiple_text_values_separator.as_deref().unwrap_or_default(),
        )),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
