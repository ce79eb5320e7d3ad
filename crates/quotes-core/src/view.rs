//! Card rendering
//!
//! Projects quotes into `QuoteCard`s, the unit the UI draws. A full render
//! builds a fresh `CardList` and throws the old one away; the incremental
//! operations each touch at most one card.

use serde::Serialize;

use crate::models::{Quote, QuoteId};

/// Rendered projection of one quote
///
/// Serializes with the backend's field names plus `likesCount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteCard {
    pub id: QuoteId,
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
    /// Displayed like count
    #[serde(rename = "likesCount")]
    pub likes: usize,
    /// Edit form open (and the edit button hidden)
    #[serde(skip)]
    pub editing: bool,
}

impl QuoteCard {
    /// Build a card from a quote
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: quote.id,
            text: quote.text.clone(),
            author: quote.author.clone(),
            likes: quote.like_count,
            editing: false,
        }
    }

    /// Text of the like button
    pub fn likes_label(&self) -> String {
        format!("Likes: {}", self.likes)
    }

    /// Whether the edit button is visible
    pub fn shows_edit_button(&self) -> bool {
        !self.editing
    }
}

/// Ordered list of rendered cards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardList {
    cards: Vec<QuoteCard>,
}

impl CardList {
    /// Render a fresh list from quotes in display order
    pub fn render<'a>(quotes: impl IntoIterator<Item = &'a Quote>) -> Self {
        Self {
            cards: quotes.into_iter().map(QuoteCard::from_quote).collect(),
        }
    }

    /// Append a single card
    pub fn append(&mut self, card: QuoteCard) {
        self.cards.push(card);
    }

    /// Remove the card for `id`; returns whether one was removed
    pub fn remove(&mut self, id: QuoteId) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Set the displayed like count of one card
    pub fn set_likes(&mut self, id: QuoteId, likes: usize) -> bool {
        self.with_card(id, |card| card.likes = likes)
    }

    /// Set the text and author of one card
    pub fn set_text(&mut self, id: QuoteId, text: &str, author: &str) -> bool {
        self.with_card(id, |card| {
            card.text = text.to_string();
            card.author = author.to_string();
        })
    }

    /// Open the edit form of one card
    pub fn begin_edit(&mut self, id: QuoteId) -> bool {
        self.with_card(id, |card| card.editing = true)
    }

    /// Collapse the edit form of one card
    pub fn end_edit(&mut self, id: QuoteId) -> bool {
        self.with_card(id, |card| card.editing = false)
    }

    pub fn get(&self, id: QuoteId) -> Option<&QuoteCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Index of the card for `id`
    pub fn position(&self, id: QuoteId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Card at a display index
    pub fn at(&self, index: usize) -> Option<&QuoteCard> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuoteCard> {
        self.cards.iter()
    }

    /// IDs in display order
    pub fn ids(&self) -> Vec<QuoteId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn with_card(&mut self, id: QuoteId, f: impl FnOnce(&mut QuoteCard)) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(card) => {
                f(card);
                true
            }
            None => false,
        }
    }
}
