//! Global Constants
//!
//! Centralized constants for settings defaults and file discovery.

/// Settings defaults
pub mod defaults {
    /// Declared prompt budget (tokens or chars), never enforced
    pub const PROMPT_MAX_LENGTH: usize = 1024;

    /// Blank line between text blocks
    pub const TEXT_BLOCKS_SEPARATOR: &str = "\n\n";

    /// Newline between an input and its output
    pub const INPUT_OUTPUT_SEPARATOR: &str = "\n";

    /// Between the name and the value of a named output
    pub const MULTIPLE_TEXT_KEY_VALUE_SEPARATOR: &str = ": ";

    /// After each named output value
    pub const MULTIPLE_TEXT_VALUES_SEPARATOR: &str = "\n";
}

/// Settings file discovery and loading
pub mod settings {
    /// Prefix of environment variables overriding settings fields
    pub const ENV_PREFIX: &str = "PROMPTENGINE_";

    /// Base name of the settings file looked up in the working directory
    pub const FILE_STEM: &str = "promptengine";

    /// Extensions tried, in order, when no settings file is given
    pub const FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "toml", "json"];

    /// Example key naming a side file holding the output
    pub const OUTPUT_FILE_KEY: &str = "output_file";

    /// Top-level key of a TOML dialog transcript
    pub const INTERACTIONS_KEY: &str = "interactions";
}

/// CLI presentation
pub mod cli {
    /// Rule printed around framed prompts
    pub const FRAME_RULE: &str = "===========================";
}
