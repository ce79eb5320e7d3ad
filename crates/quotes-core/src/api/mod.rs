//! REST client for the quotes backend
//!
//! The backend exposes two collections in json-server style:
//!
//! - `/quotes`: `{ id, quote, author }`, optionally with `?_embed=likes`
//! - `/likes`: `{ id, quoteId, createdAt }`, filterable with `?quoteId=`
//!
//! [`QuoteApi`] is the seam the sync layer talks through; [`HttpApi`] is
//! the reqwest implementation.

mod http;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{Like, NewLike, NewQuote, QuoteId, QuotePatch, QuoteRecord};

pub use http::HttpApi;

/// Operations the backend supports
#[async_trait]
pub trait QuoteApi: Send + Sync {
    /// `GET /quotes`
    async fn list_quotes(&self) -> ApiResult<Vec<QuoteRecord>>;

    /// `GET /quotes?_embed=likes`
    async fn list_quotes_with_likes(&self) -> ApiResult<Vec<QuoteRecord>>;

    /// `POST /quotes`
    async fn create_quote(&self, quote: &NewQuote) -> ApiResult<QuoteRecord>;

    /// `PATCH /quotes/{id}`
    async fn update_quote(&self, id: QuoteId, patch: &QuotePatch) -> ApiResult<QuoteRecord>;

    /// `DELETE /quotes/{id}`
    async fn delete_quote(&self, id: QuoteId) -> ApiResult<()>;

    /// `GET /likes?quoteId={id}`
    async fn list_likes(&self, quote_id: QuoteId) -> ApiResult<Vec<Like>>;

    /// `POST /likes`
    async fn create_like(&self, like: &NewLike) -> ApiResult<Like>;
}
