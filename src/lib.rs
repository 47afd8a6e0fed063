//! promptengine - Few-Shot Prompt Assembly
//!
//! Builds the text prompt sent to a large language model from declarative
//! settings: a description, worked input/output examples, an optional
//! conversation history and the new user input.
//!
//! ## Quick Start
//!
//! ```
//! use promptengine::{GenericEngine, Interaction, PromptEngine, Settings};
//!
//! let settings = Settings {
//!     description: Some("Translate English to French.".to_string()),
//!     input_prefix: Some("English: ".to_string()),
//!     output_prefix: Some("French: ".to_string()),
//!     examples: vec![Interaction::new("Hello", "Bonjour")],
//!     ..Settings::default()
//! };
//!
//! let engine = GenericEngine::new(settings);
//! let prompt = engine.render(Some("Thank you"));
//! assert_eq!(
//!     prompt.as_str(),
//!     "Translate English to French.\n\nEnglish: Hello\nFrench: Bonjour\n\nEnglish: Thank you\nFrench: "
//! );
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: generic and text analysis engines
//! - [`prompt`]: interactions, expected outputs and their formatters
//! - [`config`]: settings and the YAML/TOML/JSON loader
//! - [`cli`]: command implementations of the `promptengine` binary

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod prompt;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{ConfigLoader, FileFormat, OutputFormat, Settings};
pub use engine::{GenericEngine, PromptEngine, TextAnalysisEngine};
pub use prompt::{ExpectedOutput, Interaction, OutputValues, Prompt};
pub use types::error::{PromptError, Result, ResultExt};
