//! Settings Loader
//!
//! Builds [`Settings`] from multiple sources:
//! 1. Built-in defaults
//! 2. Settings file (YAML, TOML or JSON), given explicitly or discovered as
//!    `promptengine.{yaml,yml,toml,json}` in the working directory
//! 3. Environment variables (PROMPTENGINE_* prefix, e.g. PROMPTENGINE_INPUT_PREFIX)
//!
//! Keys are case-insensitive: `InputPrefix`, `inputPrefix`, `input-prefix`
//! and `input_prefix` are the same setting. The names of output values are
//! user data and are kept as written.

use figment::providers::Env;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::Settings;
use crate::constants::settings::{
    ENV_PREFIX, FILE_EXTENSIONS, FILE_STEM, INTERACTIONS_KEY, OUTPUT_FILE_KEY,
};
use crate::prompt::Interaction;
use crate::types::{PromptError, Result, ResultExt, normalize_key};

/// Serialization format of a settings or dialog file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(FileFormat::Yaml),
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(PromptError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "toml" => Ok(FileFormat::Toml),
            "json" => Ok(FileFormat::Json),
            _ => Err(format!(
                "Unknown format '{}'. Valid values: yaml, toml, json",
                s
            )),
        }
    }
}

/// Settings loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings with the full resolution chain:
    /// defaults → settings file → env vars
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let file = path.map(Path::to_path_buf).or_else(Self::discover);

        let mut settings = match file {
            Some(file) => {
                debug!("Loading settings from: {}", file.display());
                Self::load_from_file(&file)?
            }
            None => {
                debug!("No settings file found, using defaults");
                Settings::default()
            }
        };

        Self::apply_env(&mut settings)?;

        Ok(settings)
    }

    /// Load settings from a specific file only (no environment overrides)
    pub fn load_from_file(path: &Path) -> Result<Settings> {
        let (text, format) = Self::read_file(path)?;
        Self::parse(&text, format, path.parent())
    }

    /// Parse settings text. Side files named by examples resolve against the
    /// working directory.
    pub fn parse_str(text: &str, format: FileFormat) -> Result<Settings> {
        Self::parse(text, format, None)
    }

    /// Load a dialog transcript: a list of interactions, or a mapping with an
    /// `interactions` list (the only shape TOML allows)
    pub fn load_interactions(path: &Path) -> Result<Vec<Interaction>> {
        let (text, format) = Self::read_file(path)?;
        let items = match Self::read_value(&text, format)? {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            Value::Object(map) => {
                let mut map = Self::normalize_keys(map)?;
                match map.remove(INTERACTIONS_KEY) {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => Vec::new(),
                    Some(_) => {
                        return Err(PromptError::config(format!(
                            "'{}' must be a list of interactions",
                            INTERACTIONS_KEY
                        )));
                    }
                }
            }
            _ => {
                return Err(PromptError::config(
                    "Dialog file must contain a list of interactions",
                ));
            }
        };

        let interactions = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let item = Self::normalize_interaction(item, index, path.parent())?;
                Ok(serde_json::from_value(item)?)
            })
            .collect::<Result<Vec<Interaction>>>()?;

        debug!(
            "Loaded {} dialog interactions from {}",
            interactions.len(),
            path.display()
        );
        Ok(interactions)
    }

    /// Read a JSON document and re-serialize it without whitespace
    pub fn minify_json(text: &str) -> Result<String> {
        let value: Value = serde_json::from_str(text)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Serialize settings for display
    pub fn serialize(settings: &Settings, format: FileFormat) -> Result<String> {
        Ok(match format {
            FileFormat::Yaml => serde_yaml::to_string(settings)?,
            FileFormat::Toml => toml::to_string_pretty(settings)?,
            FileFormat::Json => serde_json::to_string_pretty(settings)?,
        })
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Settings files looked up in the working directory, in priority order
    pub fn candidate_paths() -> Vec<PathBuf> {
        FILE_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", FILE_STEM, ext)))
            .collect()
    }

    /// First existing settings file in the working directory
    pub fn discover() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a starter settings file
    pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{}.yaml", FILE_STEM)));

        if path.exists() && !force {
            return Err(PromptError::config(format!(
                "Settings file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        let content = match FileFormat::from_path(&path)? {
            FileFormat::Yaml => Self::default_settings_template(),
            format => Self::serialize(&Self::starter_settings(), format)?,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        info!("Created settings file: {}", path.display());

        Ok(path)
    }

    /// Commented YAML starter settings
    pub fn default_settings_template() -> String {
        r#"# Prompt Engine Settings
# Keys are case-insensitive: InputPrefix, inputPrefix and input_prefix are the same.
# Any setting can be overridden with PROMPTENGINE_<KEY>, e.g. PROMPTENGINE_INPUT_PREFIX.

# Declared budget for the selected model; not enforced.
prompt_max_length: 1024

description: "Quark is a friendly bot knowledgeable about geography."
# description_prefix: "/*"
# description_postfix: "*/"

text_blocks_separator: "\n\n"
input_output_separator: "\n"

input_prefix: "Devis: "
# input_postfix: ""
output_prefix: "Quark: "
# output_postfix: ""

# text or json
output_format: text
multiple_text_key_value_separator: ": "
multiple_text_values_separator: "\n"

examples:
  - input: "Where is Rome?"
    output: "Rome is a beautiful town in Italy, the capital of Italy in fact."
  - input: "How long is the Nile river?"
    output: "The Nile River flows over 6600 kilometers (4100 miles) into the Mediterranean Sea."
  # Outputs can be read from side files; JSON files are minified.
  # - input: "Create an empty template"
  #   output_file: "examples/basic.json"

context_reset_text: "Forget the earlier conversation and start afresh."
"#
        .to_string()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Settings matching the YAML starter template
    fn starter_settings() -> Settings {
        Settings {
            description: Some("Quark is a friendly bot knowledgeable about geography.".to_string()),
            input_prefix: Some("Devis: ".to_string()),
            output_prefix: Some("Quark: ".to_string()),
            examples: vec![
                Interaction::new(
                    "Where is Rome?",
                    "Rome is a beautiful town in Italy, the capital of Italy in fact.",
                ),
                Interaction::new(
                    "How long is the Nile river?",
                    "The Nile River flows over 6600 kilometers (4100 miles) into the Mediterranean Sea.",
                ),
            ],
            context_reset_text: Some(
                "Forget the earlier conversation and start afresh.".to_string(),
            ),
            ..Settings::default()
        }
    }

    fn read_file(path: &Path) -> Result<(String, FileFormat)> {
        if !path.exists() {
            return Err(PromptError::missing_file(path));
        }
        let format = FileFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        Ok((text, format))
    }

    fn read_value(text: &str, format: FileFormat) -> Result<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(match format {
            FileFormat::Yaml => serde_yaml::from_str(text)?,
            FileFormat::Toml => toml::from_str(text)?,
            FileFormat::Json => serde_json::from_str(text)?,
        })
    }

    fn parse(text: &str, format: FileFormat, base_dir: Option<&Path>) -> Result<Settings> {
        let map = match Self::read_value(text, format)? {
            Value::Null => return Ok(Settings::default()),
            Value::Object(map) => map,
            _ => return Err(PromptError::config("Settings must be a mapping of keys")),
        };

        let mut map = Self::normalize_keys(map)?;

        if let Some(examples) = map.remove("examples") {
            let examples = match examples {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| Self::normalize_interaction(item, index, base_dir))
                    .collect::<Result<Vec<Value>>>()?,
                Value::Null => Vec::new(),
                _ => return Err(PromptError::config("'examples' must be a list")),
            };
            map.insert("examples".to_string(), Value::Array(examples));
        }

        let settings: Settings = serde_json::from_value(Value::Object(map))?;
        debug!("Parsed settings with {} examples", settings.examples.len());
        Ok(settings)
    }

    /// Rewrite the keys of a mapping to snake_case, rejecting collisions
    fn normalize_keys(map: Map<String, Value>) -> Result<Map<String, Value>> {
        let mut normalized = Map::with_capacity(map.len());
        for (key, value) in map {
            let name = normalize_key(&key);
            if normalized.contains_key(&name) {
                return Err(PromptError::config(format!(
                    "Duplicate setting '{}' (from key '{}')",
                    name, key
                )));
            }
            normalized.insert(name, value);
        }
        Ok(normalized)
    }

    /// Normalize one example: keys to snake_case, `output_file` resolved into `output`
    fn normalize_interaction(value: Value, index: usize, base_dir: Option<&Path>) -> Result<Value> {
        let Value::Object(map) = value else {
            return Err(PromptError::config(format!(
                "Example #{} must be a mapping with input/output keys",
                index + 1
            )));
        };

        let mut map = Self::normalize_keys(map)?;

        if let Some(file) = map.remove(OUTPUT_FILE_KEY) {
            if map.get("output").is_some_and(|v| !v.is_null()) {
                return Err(PromptError::config(format!(
                    "Example #{} sets both 'output' and '{}'",
                    index + 1,
                    OUTPUT_FILE_KEY
                )));
            }
            let Value::String(file) = file else {
                return Err(PromptError::config(format!(
                    "Example #{}: '{}' must be a path",
                    index + 1,
                    OUTPUT_FILE_KEY
                )));
            };
            let output = Self::read_output_file(&file, base_dir)?;
            map.insert("output".to_string(), Value::String(output));
        }

        Ok(Value::Object(map))
    }

    /// Read an example output from a side file; JSON content is minified
    fn read_output_file(file: &str, base_dir: Option<&Path>) -> Result<String> {
        let path = match base_dir {
            Some(dir) if Path::new(file).is_relative() => dir.join(file),
            _ => PathBuf::from(file),
        };

        if !path.exists() {
            return Err(PromptError::missing_file(path));
        }

        let content = fs::read_to_string(&path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            debug!("Minifying example output: {}", path.display());
            Self::minify_json(&content)
                .with_context_fn(|| format!("Invalid JSON in {}", path.display()))
        } else {
            Ok(content)
        }
    }

    /// Apply PROMPTENGINE_* environment variables on top of the settings.
    /// Values are taken verbatim; examples can not be set from the environment.
    fn apply_env(settings: &mut Settings) -> Result<()> {
        let env = Env::prefixed(ENV_PREFIX);
        Self::apply_overrides(
            settings,
            env.iter().map(|(key, value)| (key.as_str().to_string(), value)),
        )
    }

    /// Apply `(key, value)` overrides; keys are matched case-insensitively.
    /// Text fields take the value verbatim, numeric fields parse it. List
    /// fields and unknown keys are skipped with a warning.
    fn apply_overrides(
        settings: &mut Settings,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Result<()> {
        let mut map = match serde_json::to_value(&*settings)? {
            Value::Object(map) => map,
            _ => return Err(PromptError::config("Settings must serialize to a mapping")),
        };

        let mut changed = false;
        for (key, value) in overrides {
            let name = normalize_key(&key);
            let replacement = match map.get(&name) {
                Some(Value::Number(_)) => {
                    let number: u64 = value.trim().parse().map_err(|_| {
                        PromptError::config(format!(
                            "{}{} must be a number, got '{}'",
                            ENV_PREFIX,
                            name.to_uppercase(),
                            value
                        ))
                    })?;
                    Value::from(number)
                }
                Some(Value::String(_) | Value::Null) => Value::String(value),
                Some(_) | None => {
                    warn!(
                        "Ignoring unsupported environment override {}{}",
                        ENV_PREFIX,
                        name.to_uppercase()
                    );
                    continue;
                }
            };
            debug!("Environment override: {}", name);
            map.insert(name, replacement);
            changed = true;
        }

        if changed {
            *settings = serde_json::from_value(Value::Object(map))
                .with_context("Invalid environment override")?;
        }
        Ok(())
    }
}
