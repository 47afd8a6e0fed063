//! Settings Management
//!
//! Prompt settings with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Settings file (promptengine.yaml, or any YAML/TOML/JSON file given)
//! 3. Environment variables (PROMPTENGINE_*)
//! 4. CLI arguments (highest priority, for the input itself)

mod loader;
mod types;

pub use loader::{ConfigLoader, FileFormat};
pub use types::*;
