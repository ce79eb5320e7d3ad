//! Data models for Quotes
//!
//! Defines the core data structures: Quote and Like, plus the request
//! bodies sent to the backend. Field names on the wire follow the
//! backend's JSON (`quote`, `quoteId`, `createdAt`).

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Server-assigned quote identifier
pub type QuoteId = u64;

/// A quote as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Unique identifier (assigned by the server)
    pub id: QuoteId,
    /// Quote text
    pub text: String,
    /// Who said it
    pub author: String,
    /// Number of likes, derived from the likes endpoint
    pub like_count: usize,
}

impl Quote {
    /// Create a quote with no likes
    pub fn new(id: QuoteId, text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            author: author.into(),
            like_count: 0,
        }
    }

    /// Set the like count
    pub fn with_likes(mut self, like_count: usize) -> Self {
        self.like_count = like_count;
        self
    }
}

/// A quote as returned by the backend
///
/// `likes` is only present when the list was fetched with `_embed=likes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub quote: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<Like>>,
}

impl QuoteRecord {
    /// Convert into a [`Quote`] with the given like count
    pub fn into_quote(self, like_count: usize) -> Quote {
        Quote {
            id: self.id,
            text: self.quote,
            author: self.author,
            like_count,
        }
    }

    /// Number of embedded likes, if the record carries them
    pub fn embedded_like_count(&self) -> Option<usize> {
        self.likes.as_ref().map(Vec::len)
    }
}

/// A like on a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: u64,
    pub quote_id: QuoteId,
    /// Unix timestamp in seconds
    pub created_at: i64,
}

/// Body of `POST /quotes`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewQuote {
    pub quote: String,
    pub author: String,
}

impl NewQuote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            quote: text.into(),
            author: author.into(),
        }
    }
}

/// Body of `PATCH /quotes/{id}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuotePatch {
    pub quote: String,
    pub author: String,
}

impl QuotePatch {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            quote: text.into(),
            author: author.into(),
        }
    }
}

/// Body of `POST /likes`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewLike {
    pub quote_id: QuoteId,
    pub created_at: i64,
}

impl NewLike {
    /// A like on `quote_id` stamped with the current time
    pub fn now(quote_id: QuoteId) -> Self {
        Self {
            quote_id,
            created_at: Utc::now().timestamp(),
        }
    }
}
