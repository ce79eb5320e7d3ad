//! Quote command handlers

use anyhow::{Context, Result};

use quotes_core::{Config, QuoteCard, QuoteId, SortMode};

use super::open_session;
use crate::output::Output;
use crate::prompt::confirm;

/// List all quotes
pub async fn list(config: &Config, by_author: bool, output: &Output) -> Result<()> {
    let sort = if by_author {
        SortMode::ByAuthor
    } else {
        SortMode::from_config(config)
    };
    let sync = open_session(config, sort).await?;

    output.print_cards(sync.cards().iter(), sort.label());
    Ok(())
}

/// Create a new quote
pub async fn create(config: &Config, text: String, author: String, output: &Output) -> Result<()> {
    let mut sync = open_session(config, SortMode::from_config(config)).await?;

    let quote = sync
        .create(&text, &author)
        .await
        .context("Failed to create quote")?;
    let card = QuoteCard::from_quote(quote);

    output.success(&format!("Created quote: {}", card.id));
    output.print_card(&card);
    Ok(())
}

/// Replace a quote's text and author
pub async fn edit(
    config: &Config,
    id: QuoteId,
    text: String,
    author: String,
    output: &Output,
) -> Result<()> {
    let mut sync = open_session(config, SortMode::from_config(config)).await?;

    let quote = sync
        .update(id, &text, &author)
        .await
        .with_context(|| format!("Failed to update quote {}", id))?;
    let card = QuoteCard::from_quote(quote);

    output.success("Quote updated");
    output.print_card(&card);
    Ok(())
}

/// Like a quote
pub async fn like(config: &Config, id: QuoteId, output: &Output) -> Result<()> {
    let mut sync = open_session(config, SortMode::from_config(config)).await?;

    let count = sync
        .like(id)
        .await
        .with_context(|| format!("Failed to like quote {}", id))?;

    output.success(&format!("Liked quote {} (Likes: {})", id, count));
    Ok(())
}

/// Delete a quote
pub async fn delete(config: &Config, id: QuoteId, output: &Output) -> Result<()> {
    let mut sync = open_session(config, SortMode::from_config(config)).await?;

    let quote = sync
        .store()
        .get(id)
        .ok_or(quotes_core::ApiError::UnknownQuote(id))?;

    // Confirm deletion
    if output.should_prompt() {
        output.message(&format!(
            "Delete quote: {} - \"{}\" ({})",
            quote.id, quote.text, quote.author
        ));
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    sync.delete(id)
        .await
        .with_context(|| format!("Failed to delete quote {}", id))?;

    output.success(&format!("Deleted quote: {}", id));
    Ok(())
}
