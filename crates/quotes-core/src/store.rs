//! In-memory quote store
//!
//! The `QuoteStore` mirrors the backend's quote list in server order and
//! carries the derived like count of every quote. It is replaced wholesale
//! on load and patched in place after each successful mutation; the
//! rendered cards are always derived from it.

use crate::models::{Quote, QuoteId};
use crate::sort::SortMode;

/// Ordered collection of quotes
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every quote (initial load / reload)
    pub fn replace(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    /// Append a quote
    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Get a quote by ID
    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Check if a quote is present
    pub fn contains(&self, id: QuoteId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a quote by ID, returning it
    pub fn remove(&mut self, id: QuoteId) -> Option<Quote> {
        let pos = self.quotes.iter().position(|q| q.id == id)?;
        Some(self.quotes.remove(pos))
    }

    /// Increment the like count of a quote, returning the new count
    pub fn increment_likes(&mut self, id: QuoteId) -> Option<usize> {
        let quote = self.get_mut(id)?;
        quote.like_count += 1;
        Some(quote.like_count)
    }

    /// Replace the text and author of a quote
    pub fn apply_update(
        &mut self,
        id: QuoteId,
        text: impl Into<String>,
        author: impl Into<String>,
    ) -> Option<&Quote> {
        let quote = self.get_mut(id)?;
        quote.text = text.into();
        quote.author = author.into();
        Some(&*quote)
    }

    /// Quotes in store order
    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }

    /// Quotes ordered for display
    pub fn sorted(&self, mode: SortMode) -> Vec<&Quote> {
        let mut quotes: Vec<&Quote> = self.quotes.iter().collect();
        mode.sort(&mut quotes);
        quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    fn get_mut(&mut self, id: QuoteId) -> Option<&mut Quote> {
        self.quotes.iter_mut().find(|q| q.id == id)
    }
}
