//! Config Command
//!
//! Inspect and create settings files.
//!
//! Usage:
//!   promptengine config show [--settings FILE] [-f yaml|toml|json]
//!   promptengine config path
//!   promptengine config init [PATH] [--force]

use std::path::Path;

use crate::cli::Output;
use crate::config::{ConfigLoader, FileFormat};
use crate::types::Result;

/// Show the effective settings (defaults, file and environment merged)
pub fn show(settings: Option<&Path>, format: FileFormat) -> Result<()> {
    let settings = ConfigLoader::load(settings)?;
    print!("{}", with_trailing_newline(&ConfigLoader::serialize(&settings, format)?));
    Ok(())
}

/// Show the settings file lookup order
pub fn path() -> Result<()> {
    let output = Output::new();
    output.header("Settings files (first match wins)");

    for candidate in ConfigLoader::candidate_paths() {
        if candidate.exists() {
            output.success(&candidate.display().to_string());
        } else {
            output.error(&candidate.display().to_string());
        }
    }
    Ok(())
}

/// Write a starter settings file
pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let written = ConfigLoader::init(path, force)?;
    Output::new().success(&format!("Created {}", written.display()));
    Ok(())
}

fn with_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}
