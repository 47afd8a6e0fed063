mod output;

pub use output::{Output, print_prompt};
