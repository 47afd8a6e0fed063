//! Generic Prompt Engine
//!
//! Composes a prompt from the settings in a fixed order:
//!
//! 1. Description block (prefix, description, postfix, separator)
//! 2. Examples, followed by the context reset text
//! 3. Dialog recorded on the engine
//! 4. The new input, then the output prefix so the model continues from there

use std::path::Path;

use tracing::debug;

use super::PromptEngine;
use crate::config::{ConfigLoader, Settings};
use crate::prompt::{Interaction, OutputFormatter, Prompt, formatter_for};
use crate::types::{Result, non_empty};

/// Engine with all the raw features: description, examples, custom syntax,
/// separators and a running dialog
#[derive(Debug, Clone, Default)]
pub struct GenericEngine {
    settings: Settings,
    /// Input/output turns of a real conversation, rendered after the examples
    /// to give the model memory of the ongoing exchange
    dialog: Vec<Interaction>,
}

impl GenericEngine {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dialog: Vec::new(),
        }
    }

    /// Build an engine from a settings file (YAML, TOML or JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(ConfigLoader::load_from_file(path)?))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dialog(&self) -> &[Interaction] {
        &self.dialog
    }

    /// Append a turn to the dialog
    pub fn record(&mut self, interaction: Interaction) {
        self.dialog.push(interaction);
    }

    /// Append several turns to the dialog, keeping their order
    pub fn extend_dialog(&mut self, interactions: impl IntoIterator<Item = Interaction>) {
        self.dialog.extend(interactions);
    }

    /// Assemble a prompt using `description` in place of the configured one
    pub(crate) fn assemble(&self, description: Option<&str>, input: Option<&str>) -> Prompt {
        let mut buf = String::new();
        let formatter = formatter_for(&self.settings);

        self.write_description(&mut buf, description);
        self.write_interactions(&mut buf, &self.settings.examples, formatter.as_ref());
        if !self.settings.examples.is_empty()
            && let Some(reset) = self.settings.reset_text()
        {
            buf.push_str(reset);
            buf.push_str(self.settings.blocks_separator());
        }
        self.write_interactions(&mut buf, &self.dialog, formatter.as_ref());
        self.write_input(&mut buf, input);

        debug!(
            "Rendered prompt: {} examples, {} dialog turns, {} bytes",
            self.settings.examples.len(),
            self.dialog.len(),
            buf.len()
        );

        Prompt::new(buf)
    }

    fn write_description(&self, buf: &mut String, description: Option<&str>) {
        push_text(buf, self.settings.description_prefix.as_deref());
        push_text(buf, description);
        push_text(buf, self.settings.description_postfix.as_deref());

        if !buf.is_empty() {
            buf.push_str(self.settings.blocks_separator());
        }
    }

    fn write_interactions(
        &self,
        buf: &mut String,
        interactions: &[Interaction],
        formatter: &dyn OutputFormatter,
    ) {
        let separator = self.settings.blocks_separator();

        for interaction in interactions {
            if let Some(input) = interaction.input_text() {
                self.write_framed_input(buf, input);

                if let Some(expected) = interaction.expected() {
                    buf.push_str(self.settings.io_separator());
                    push_text(buf, self.settings.output_prefix.as_deref());
                    formatter.write_output(expected, buf);
                    push_text(buf, self.settings.output_postfix.as_deref());
                }

                buf.push_str(separator);
            } else if let Some(output) = interaction.output_text() {
                buf.push_str(output);
                buf.push_str(separator);
            }
        }
    }

    fn write_input(&self, buf: &mut String, input: Option<&str>) {
        if let Some(input) = non_empty(input) {
            self.write_framed_input(buf, input);
            buf.push_str(self.settings.io_separator());
        }

        push_text(buf, self.settings.output_prefix.as_deref());
    }

    fn write_framed_input(&self, buf: &mut String, input: &str) {
        push_text(buf, self.settings.input_prefix.as_deref());
        buf.push_str(input);
        push_text(buf, self.settings.input_postfix.as_deref());
    }
}

impl PromptEngine for GenericEngine {
    fn render(&self, input: Option<&str>) -> Prompt {
        self.assemble(self.settings.description.as_deref(), input)
    }
}

#[inline]
fn push_text(buf: &mut String, text: Option<&str>) {
    if let Some(text) = non_empty(text) {
        buf.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use proptest::prelude::*;

    const COMEDIAN: &str = "Be a great comedian";
    const JOKE_REQUEST: &str = "Tell a joke";
    const JOKE: &str = "Why couldn't the bicycle stand up by itself? Because it was...two tired!";

    fn render(settings: Settings, input: Option<&str>) -> String {
        GenericEngine::new(settings).render(input).into_string()
    }

    fn joke_example() -> Vec<Interaction> {
        vec![Interaction::new(JOKE_REQUEST, JOKE)]
    }

    #[test]
    fn test_renders_description() {
        let result = render(Settings::with_description("Some description"), None);
        assert_eq!(result, "Some description\n\n");
    }

    #[test]
    fn test_renders_no_description() {
        let result = render(Settings::with_description(""), None);
        assert_eq!(result, "");
    }

    #[test]
    fn test_description_prefix_and_postfix() {
        let cases = [
            (None, None, None, ""),
            (Some(""), Some(""), Some(""), ""),
            (Some(""), Some("desc"), Some(""), "desc\n\n"),
            (Some("/*"), Some("desc"), Some(""), "/*desc\n\n"),
            (Some(""), Some("desc"), Some("*/"), "desc*/\n\n"),
            (Some("/*"), Some("desc"), Some("*/"), "/*desc*/\n\n"),
            (Some("/*"), Some(""), Some("*/"), "/**/\n\n"),
        ];

        for (prefix, description, postfix, expected) in cases {
            let settings = Settings {
                description_prefix: prefix.map(String::from),
                description: description.map(String::from),
                description_postfix: postfix.map(String::from),
                ..Settings::default()
            };
            assert_eq!(
                render(settings, None),
                expected,
                "prefix={:?} description={:?} postfix={:?}",
                prefix,
                description,
                postfix
            );
        }
    }

    #[test]
    fn test_renders_without_examples() {
        let settings = Settings {
            description: Some("Tell a joke".to_string()),
            examples: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "Tell a joke\n\n");
    }

    #[test]
    fn test_renders_examples() {
        let settings = Settings {
            examples: joke_example(),
            ..Settings::default()
        };
        assert_eq!(render(settings, None), format!("{JOKE_REQUEST}\n{JOKE}\n\n"));
    }

    #[test]
    fn test_renders_description_and_examples() {
        let settings = Settings {
            description: Some(COMEDIAN.to_string()),
            examples: joke_example(),
            ..Settings::default()
        };
        assert_eq!(
            render(settings, None),
            format!("{COMEDIAN}\n\n{JOKE_REQUEST}\n{JOKE}\n\n")
        );
    }

    #[test]
    fn test_custom_separators() {
        const BLOCKS: &str = "--------------------------";
        const IO: &str = ": ";
        let settings = Settings {
            description: Some(COMEDIAN.to_string()),
            text_blocks_separator: Some(BLOCKS.to_string()),
            input_output_separator: Some(IO.to_string()),
            examples: joke_example(),
            ..Settings::default()
        };
        assert_eq!(
            render(settings, None),
            format!("{COMEDIAN}{BLOCKS}{JOKE_REQUEST}{IO}{JOKE}{BLOCKS}")
        );
    }

    #[test]
    fn test_uses_all_settings() {
        const DESC: &str = "Some\ndescription";
        const DESC_PRE: &str = "[[";
        const DESC_POST: &str = "]]\n\n";
        const BLOCKS: &str = "\n----\n";
        const IN_PRE: &str = "/** ";
        const IN_POST: &str = " */[foo]\n\n";
        const OUT_PRE: &str = "{{";
        const OUT_POST: &str = "}}\n";
        const IO: &str = "\r\n\r\n";
        const EX_IN_1: &str = "hello";
        const EX_OUT_1: &str = "world";
        const EX_IN_2: &str = "hello!";
        const EX_OUT_2: &str = "world!";
        const RESET: &str = "\r\n\r\n";

        let settings = Settings {
            prompt_max_length: 0,
            description: Some(DESC.to_string()),
            description_prefix: Some(DESC_PRE.to_string()),
            description_postfix: Some(DESC_POST.to_string()),
            text_blocks_separator: Some(BLOCKS.to_string()),
            input_prefix: Some(IN_PRE.to_string()),
            input_postfix: Some(IN_POST.to_string()),
            output_prefix: Some(OUT_PRE.to_string()),
            output_postfix: Some(OUT_POST.to_string()),
            input_output_separator: Some(IO.to_string()),
            examples: vec![
                Interaction::new(EX_IN_1, EX_OUT_1),
                Interaction::new(EX_IN_2, EX_OUT_2),
            ],
            context_reset_text: Some(RESET.to_string()),
            ..Settings::default()
        };
        let user_input = uuid::Uuid::new_v4().to_string();

        let result = render(settings, Some(&user_input));

        let expected = [
            DESC_PRE, DESC, DESC_POST, BLOCKS, // description
            IN_PRE, EX_IN_1, IN_POST, IO, OUT_PRE, EX_OUT_1, OUT_POST, BLOCKS, // example 1
            IN_PRE, EX_IN_2, IN_POST, IO, OUT_PRE, EX_OUT_2, OUT_POST, BLOCKS, // example 2
            RESET, BLOCKS, // reset
            IN_PRE, user_input.as_str(), IN_POST, IO, OUT_PRE, // input
        ]
        .concat();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_chat_prompt() {
        let settings = Settings {
            description: Some("Quark is a friendly bot knowledgeable about geography.".to_string()),
            input_prefix: Some("Devis: ".to_string()),
            output_prefix: Some("Quark: ".to_string()),
            examples: vec![Interaction::new(
                "Where is Rome?",
                "Rome is a beautiful town in Italy, the capital of Italy in fact.",
            )],
            context_reset_text: Some("Forget the earlier conversation and start afresh.".to_string()),
            ..Settings::default()
        };

        let result = render(settings, Some("How many towns are there in the world?"));

        assert_eq!(
            result,
            "Quark is a friendly bot knowledgeable about geography.\n\n\
             Devis: Where is Rome?\n\
             Quark: Rome is a beautiful town in Italy, the capital of Italy in fact.\n\n\
             Forget the earlier conversation and start afresh.\n\n\
             Devis: How many towns are there in the world?\n\
             Quark: "
        );
    }

    #[test]
    fn test_output_prefix_without_input() {
        let settings = Settings {
            output_prefix: Some("Bot: ".to_string()),
            ..Settings::default()
        };
        assert_eq!(render(settings.clone(), None), "Bot: ");
        assert_eq!(render(settings, Some("")), "Bot: ");
    }

    #[test]
    fn test_input_is_not_trimmed() {
        let result = render(Settings::default(), Some("  padded \n"));
        assert_eq!(result, "  padded \n\n");
    }

    #[test]
    fn test_example_without_output() {
        let settings = Settings {
            output_prefix: Some("A: ".to_string()),
            examples: vec![Interaction::input_only("Q1")],
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "Q1\n\nA: ");
    }

    #[test]
    fn test_example_with_output_only_is_raw() {
        let settings = Settings {
            input_prefix: Some("# ".to_string()),
            output_prefix: Some("A: ".to_string()),
            output_format: OutputFormat::Json,
            examples: vec![Interaction::output_only("flowchart LR")],
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "flowchart LR\n\nA: ");
    }

    #[test]
    fn test_empty_examples_are_skipped() {
        let settings = Settings {
            examples: vec![
                Interaction::default(),
                Interaction::with_values("", [("k", "v")]),
                Interaction::new("I", "O"),
            ],
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "I\nO\n\n");
    }

    #[test]
    fn test_reset_text_requires_examples() {
        let settings = Settings {
            context_reset_text: Some("RESET".to_string()),
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "");
    }

    #[test]
    fn test_output_values_as_text() {
        let settings = Settings {
            examples: vec![Interaction::with_values(
                "Describe Rome",
                [("country", "Italy"), ("river", "Tiber")],
            )],
            ..Settings::default()
        };
        assert_eq!(
            render(settings, None),
            "Describe Rome\ncountry: Italy\nriver: Tiber\n\n\n"
        );
    }

    #[test]
    fn test_output_values_as_json() {
        let settings = Settings {
            output_format: OutputFormat::Json,
            examples: vec![Interaction::with_values(
                "Describe Rome",
                [("country", "Italy"), ("river", "Tiber")],
            )],
            ..Settings::default()
        };
        assert_eq!(
            render(settings, None),
            "Describe Rome\n{\"country\":\"Italy\",\"river\":\"Tiber\"}\n\n"
        );
    }

    #[test]
    fn test_json_output_is_escaped() {
        let settings = Settings {
            output_format: OutputFormat::Json,
            examples: vec![Interaction::new("quote", "a\"b")],
            ..Settings::default()
        };
        assert_eq!(render(settings, None), "quote\n\"a\\\"b\"\n\n");
    }

    #[test]
    fn test_dialog_after_examples() {
        let settings = Settings {
            input_prefix: Some("User: ".to_string()),
            output_prefix: Some("Bot: ".to_string()),
            examples: vec![Interaction::new("hi", "hello")],
            context_reset_text: Some("---".to_string()),
            ..Settings::default()
        };
        let mut engine = GenericEngine::new(settings);
        engine.record(Interaction::new("what's up?", "not much"));
        engine.extend_dialog([Interaction::new("bye", "see you")]);

        assert_eq!(engine.dialog().len(), 2);
        assert_eq!(
            engine.render(Some("wait")).as_str(),
            "User: hi\nBot: hello\n\n---\n\n\
             User: what's up?\nBot: not much\n\n\
             User: bye\nBot: see you\n\n\
             User: wait\nBot: "
        );
    }

    #[test]
    fn test_dialog_never_gets_reset_text() {
        let settings = Settings {
            context_reset_text: Some("RESET".to_string()),
            ..Settings::default()
        };
        let mut engine = GenericEngine::new(settings);
        engine.record(Interaction::new("a", "b"));
        assert_eq!(engine.render(None).as_str(), "a\nb\n\n");
    }

    #[test]
    fn test_empty_settings() {
        let settings = Settings {
            description: Some("D".to_string()),
            examples: vec![Interaction::new("I", "O")],
            ..Settings::empty()
        };
        assert_eq!(render(settings, Some("X")), "DIOX");
    }

    #[test]
    fn test_render_is_repeatable() {
        let engine = GenericEngine::new(Settings {
            description: Some("D".to_string()),
            examples: joke_example(),
            ..Settings::default()
        });
        let first = engine.render(Some("again"));
        let second = engine.render(Some("again"));
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_empty_settings_render_empty(
            sep in ".*",
            io in ".*",
        ) {
            let settings = Settings {
                text_blocks_separator: Some(sep),
                input_output_separator: Some(io),
                ..Settings::default()
            };
            prop_assert_eq!(render(settings, None), "");
        }

        #[test]
        fn prop_description_framing(
            prefix in "[a-z/*#]{0,4}",
            description in "[A-Za-z ]{1,20}",
            postfix in "[a-z/*#]{0,4}",
        ) {
            let settings = Settings {
                description_prefix: Some(prefix.clone()),
                description: Some(description.clone()),
                description_postfix: Some(postfix.clone()),
                ..Settings::default()
            };
            prop_assert_eq!(
                render(settings, None),
                format!("{prefix}{description}{postfix}\n\n")
            );
        }

        #[test]
        fn prop_separators_only_change_separators(
            blocks in "[-=~]{1,10}",
            io in "[:>|]{1,3}",
        ) {
            let settings = Settings {
                description: Some("D".to_string()),
                text_blocks_separator: Some(blocks.clone()),
                input_output_separator: Some(io.clone()),
                examples: vec![Interaction::new("I", "O")],
                ..Settings::default()
            };
            prop_assert_eq!(
                render(settings, Some("U")),
                format!("D{blocks}I{io}O{blocks}U{io}")
            );
        }
    }
}
