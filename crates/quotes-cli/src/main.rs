//! Quotes CLI
//!
//! Command-line interface for Quotes - a quote list with likes kept on a
//! REST backend. Runs the TUI when no command is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quotes_core::{ApiError, Config, QuoteId};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Quotes - browse, add, edit and like quotes")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List all quotes
    #[command(alias = "ls")]
    List {
        /// Sort by author instead of ID
        #[arg(short = 'a', long)]
        by_author: bool,
    },
    /// Create a new quote
    #[command(alias = "create")]
    Add {
        /// Quote text
        text: String,
        /// Who said it
        #[arg(short, long)]
        author: String,
    },
    /// Replace a quote's text and author
    Edit {
        /// Quote ID
        id: QuoteId,
        /// New quote text
        #[arg(short, long)]
        text: String,
        /// New author
        #[arg(short, long)]
        author: String,
    },
    /// Like a quote
    Like {
        /// Quote ID
        id: QuoteId,
    },
    /// Delete a quote
    #[command(alias = "rm")]
    Delete {
        /// Quote ID
        id: QuoteId,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, timeout_secs, sort_by_author, embed_likes, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    if let Err(e) = run(cli, &output).await {
        match e.downcast_ref::<ApiError>() {
            Some(api_error) => output.failure(api_error),
            None if output.is_quiet() => {}
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config_file.as_ref();

    // Commands that don't talk to the backend
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    let command = match cli.command {
        // TUI is the default when no command given
        None | Some(Commands::Tui) => return tui::run(config).await,
        Some(command) => command,
    };

    init_cli_logging();

    match command {
        Commands::List { by_author } => commands::quote::list(&config, by_author, output).await,
        Commands::Add { text, author } => {
            commands::quote::create(&config, text, author, output).await
        }
        Commands::Edit { id, text, author } => {
            commands::quote::edit(&config, id, text, author, output).await
        }
        Commands::Like { id } => commands::quote::like(&config, id, output).await,
        Commands::Delete { id } => commands::quote::delete(&config, id, output).await,
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging for CLI commands
///
/// Only initializes if QUOTES_LOG environment variable is set. Logs to stderr.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("QUOTES_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "quotes_core={},quotes_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["quotes", "add", "Hello", "--author", "Ada"]).unwrap();
        match cli.command {
            Some(Commands::Add { text, author }) => {
                assert_eq!(text, "Hello");
                assert_eq!(author, "Ada");
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_edit_requires_both_fields() {
        assert!(Cli::try_parse_from(["quotes", "edit", "3", "--text", "New"]).is_err());

        let cli = Cli::try_parse_from(["quotes", "edit", "3", "-t", "New", "-a", "Someone"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Edit { id: 3, .. })));
    }

    #[test]
    fn test_parse_defaults_to_tui() {
        let cli = Cli::try_parse_from(["quotes"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["quotes", "list", "--by-author", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::List { by_author: true })));
    }
}
