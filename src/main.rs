use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptengine::cli::commands::{analyze, config, render};
use promptengine::config::FileFormat;

#[derive(Parser)]
#[command(name = "promptengine")]
#[command(
    version,
    about = "Assemble few-shot prompts for large language models from declarative settings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a prompt from a settings file
    Render {
        #[arg(long, short, help = "Settings file (default: ./promptengine.{yaml,yml,toml,json})")]
        settings: Option<PathBuf>,
        #[arg(long, short, conflicts_with = "stdin", help = "User input to end the prompt with")]
        input: Option<String>,
        #[arg(long, help = "Read the user input from stdin")]
        stdin: bool,
        #[arg(long, short, help = "Dialog transcript rendered after the examples")]
        dialog: Option<PathBuf>,
        #[arg(long, help = "Surround the prompt with rules")]
        framed: bool,
    },

    /// Render analysis prompts over a body of text
    Analyze {
        #[arg(long, short, help = "File with the text to analyze, '-' for stdin")]
        content: PathBuf,
        #[arg(long, required = true, help = "Query about the text (repeatable)")]
        query: Vec<String>,
        #[arg(long, help = "Put the query before the text")]
        query_first: bool,
        #[arg(long, short, help = "Settings file for separators and framing (default: discovered)")]
        settings: Option<PathBuf>,
        #[arg(long, help = "Surround each prompt with rules")]
        framed: bool,
    },

    /// Manage settings files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective settings (merged from all sources)
    Show {
        #[arg(long, short, help = "Settings file (default: discovered)")]
        settings: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "yaml",
            help = "Output format: yaml, toml, json"
        )]
        format: FileFormat,
    },
    /// Show settings file lookup paths
    Path,
    /// Write a starter settings file
    Init {
        #[arg(help = "Target file (default: ./promptengine.yaml)")]
        path: Option<PathBuf>,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mpromptengine encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Prompts own stdout, so logs stay quiet on stderr unless asked for
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            settings,
            input,
            stdin,
            dialog,
            framed,
        } => {
            render::run(render::RenderOptions {
                settings,
                input,
                stdin,
                dialog,
                framed,
            })?;
        }
        Commands::Analyze {
            content,
            query,
            query_first,
            settings,
            framed,
        } => {
            analyze::run(analyze::AnalyzeOptions {
                content,
                queries: query,
                query_first,
                settings,
                framed,
            })?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { settings, format } => {
                config::show(settings.as_deref(), format)?;
            }
            ConfigAction::Path => {
                config::path()?;
            }
            ConfigAction::Init { path, force } => {
                config::init(path.as_deref(), force)?;
            }
        },
    }

    Ok(())
}
