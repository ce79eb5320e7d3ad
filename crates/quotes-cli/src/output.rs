//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use quotes_core::{ApiError, QuoteCard};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single quote card
    pub fn print_card(&self, card: &QuoteCard) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:     {}", card.id);
                println!("Quote:  {}", card.text);
                println!("Author: {}", card.author);
                println!("Likes:  {}", card.likes);
            }
            OutputFormat::Json => {
                print_json(card);
            }
            OutputFormat::Quiet => {
                println!("{}", card.id);
            }
        }
    }

    /// Print a list of cards in display order
    pub fn print_cards<'a>(&self, cards: impl IntoIterator<Item = &'a QuoteCard>, sort_label: &str) {
        let cards: Vec<&QuoteCard> = cards.into_iter().collect();
        match self.format {
            OutputFormat::Human => {
                if cards.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for card in &cards {
                    println!(
                        "{:>4} | {} | {} | {}",
                        card.id,
                        truncate(&card.text, 50),
                        truncate(&card.author, 20),
                        card.likes_label()
                    );
                }
                println!("\n{} quote(s), {}", cards.len(), sort_label);
            }
            OutputFormat::Json => {
                print_json(&cards);
            }
            OutputFormat::Quiet => {
                for card in &cards {
                    println!("{}", card.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a failure from the backend
    pub fn failure(&self, error: &ApiError) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("✗ {}", error.user_message());
                eprintln!("  {}", error);
            }
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "status": "error",
                        "message": error.user_message(),
                        "details": error.to_string(),
                        "recoverable": error.is_recoverable()
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Pretty-print a value as JSON
fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: could not serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
