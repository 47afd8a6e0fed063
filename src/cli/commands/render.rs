//! Render Command
//!
//! Render a prompt from a settings file with the generic engine.
//!
//! Usage:
//!   promptengine render [--settings FILE] [--input TEXT | --stdin] [--dialog FILE] [--framed]

use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::cli::ui::print_prompt;
use crate::config::ConfigLoader;
use crate::engine::{GenericEngine, PromptEngine};
use crate::prompt::Prompt;
use crate::types::{PromptError, Result};

/// Options of the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Settings file; discovered in the working directory when absent
    pub settings: Option<PathBuf>,
    /// User input appended at the end of the prompt
    pub input: Option<String>,
    /// Read the user input from stdin
    pub stdin: bool,
    /// Dialog transcript rendered after the examples
    pub dialog: Option<PathBuf>,
    /// Surround the prompt with rules
    pub framed: bool,
}

pub fn run(options: RenderOptions) -> Result<()> {
    let input = resolve_input(&options)?;
    let prompt = build(&options, input.as_deref())?;
    print_prompt(&prompt, None, options.framed)
}

/// Load the settings and dialog, then render the prompt
pub fn build(options: &RenderOptions, input: Option<&str>) -> Result<Prompt> {
    let settings = ConfigLoader::load(options.settings.as_deref())?;
    let mut engine = GenericEngine::new(settings);

    if let Some(dialog) = &options.dialog {
        engine.extend_dialog(ConfigLoader::load_interactions(dialog)?);
    }

    debug!(
        "Rendering with {} examples and {} dialog turns",
        engine.settings().examples.len(),
        engine.dialog().len()
    );
    Ok(engine.render(input))
}

fn resolve_input(options: &RenderOptions) -> Result<Option<String>> {
    if options.stdin {
        if options.input.is_some() {
            return Err(PromptError::config("Use either --input or --stdin, not both"));
        }
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(Some(input));
    }
    Ok(options.input.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_with_dialog() {
        let dir = TempDir::new().unwrap();
        let settings = dir.path().join("chat.yaml");
        fs::write(
            &settings,
            r#"
Description: "Quark is a friendly bot knowledgeable about geography."
InputPrefix: "Devis: "
OutputPrefix: "Quark: "
Examples:
  - Input: "Where is Rome?"
    Output: "In Italy."
ContextResetText: "Forget the earlier conversation and start afresh."
"#,
        )
        .unwrap();
        let dialog = dir.path().join("dialog.json");
        fs::write(&dialog, r#"[{"input": "Hi", "output": "Hello!"}]"#).unwrap();

        let options = RenderOptions {
            settings: Some(settings),
            dialog: Some(dialog),
            ..RenderOptions::default()
        };
        let prompt = build(&options, Some("How long is the Nile?")).unwrap();

        assert_eq!(
            prompt.as_str(),
            "Quark is a friendly bot knowledgeable about geography.\n\n\
             Devis: Where is Rome?\nQuark: In Italy.\n\n\
             Forget the earlier conversation and start afresh.\n\n\
             Devis: Hi\nQuark: Hello!\n\n\
             Devis: How long is the Nile?\nQuark: "
        );
    }

    #[test]
    fn test_build_missing_settings() {
        let options = RenderOptions {
            settings: Some(PathBuf::from("/nonexistent/promptengine.yaml")),
            ..RenderOptions::default()
        };
        assert!(matches!(
            build(&options, None),
            Err(PromptError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_input_and_stdin_conflict() {
        let options = RenderOptions {
            input: Some("x".to_string()),
            stdin: true,
            ..RenderOptions::default()
        };
        assert!(resolve_input(&options).is_err());
    }
}
