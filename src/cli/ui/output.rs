use console::style;
use std::io::{self, Write};

use crate::constants::cli::FRAME_RULE;
use crate::prompt::Prompt;
use crate::types::Result;

/// Status messages for humans. Prompts go through [`print_prompt`].
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn header(&self, message: &str) {
        eprintln!("\n{}", style(message).bold().underlined());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a prompt to stdout.
///
/// Unframed output is the exact prompt text, byte for byte, so it can be
/// piped to a model. Framed output adds a rule above and below.
pub fn print_prompt(prompt: &Prompt, title: Option<&str>, framed: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_prompt(&mut out, prompt, title, framed)?;
    out.flush()?;
    Ok(())
}

fn write_prompt(
    out: &mut impl Write,
    prompt: &Prompt,
    title: Option<&str>,
    framed: bool,
) -> io::Result<()> {
    if !framed {
        return write!(out, "{}", prompt);
    }

    if let Some(title) = title {
        writeln!(out, "=== {}", title)?;
    } else {
        writeln!(out, "{}", FRAME_RULE)?;
    }
    writeln!(out, "{}", prompt)?;
    writeln!(out, "{}", FRAME_RULE)
}
