pub mod error;
pub mod utils;

pub use error::{PromptError, Result, ResultExt};
pub use utils::{non_empty, normalize_key};
