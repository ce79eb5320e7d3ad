//! Quotes Core Library
//!
//! This crate provides the core functionality for Quotes, a client for a
//! list of quotes and their likes kept on a REST backend.
//!
//! # Architecture
//!
//! - **Backend**: source of truth for data, reached through [`QuoteApi`]
//! - **Store**: in-memory mirror of the backend's quote list
//! - **Cards**: rendered projection of the store, patched in place
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut sync = QuoteSync::new(HttpApi::new(&config)?, SortMode::from_config(&config));
//!
//! sync.load().await?;
//! let quote_id = sync.create("Hello", "Ada").await?.id;
//! sync.like(quote_id).await?;
//!
//! for card in sync.cards().iter() {
//!     println!("{} - {} ({})", card.text, card.author, card.likes);
//! }
//! ```
//!
//! # Modules
//!
//! - `sync`: Session tying the API, store and cards together (main entry point)
//! - `api`: REST client for the quotes and likes endpoints
//! - `store`: In-memory ordered quote collection
//! - `sort`: Display ordering toggle
//! - `view`: Card rendering
//! - `models`: Data structures for quotes and likes
//! - `error`: Typed API errors
//! - `config`: Application configuration

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod sort;
pub mod store;
pub mod sync;
pub mod view;

pub use api::{HttpApi, QuoteApi};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use models::{Like, NewLike, NewQuote, Quote, QuoteId, QuotePatch, QuoteRecord};
pub use sort::SortMode;
pub use store::QuoteStore;
pub use sync::{LoadStrategy, QuoteSync};
pub use view::{CardList, QuoteCard};
