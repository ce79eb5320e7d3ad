//! Quote synchronization
//!
//! `QuoteSync` is the session object the UI drives. It owns:
//! - the API client (source of truth)
//! - the `QuoteStore` (in-memory mirror)
//! - the `CardList` (what is on screen)
//! - the current `SortMode`
//!
//! Every mutation goes to the backend first. Only when the request
//! succeeds is the store patched, and the cards are then re-rendered or
//! patched from the store. A failed request returns an [`ApiError`] and
//! leaves store and cards untouched.
//!
//! ## Usage
//!
//! ```ignore
//! let mut sync = QuoteSync::new(HttpApi::new(&config)?, SortMode::ById);
//! sync.load().await?;
//! sync.like(3).await?;
//! sync.toggle_sort();
//! ```

use tracing::{debug, info, warn};

use crate::api::QuoteApi;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewLike, NewQuote, Quote, QuoteId, QuotePatch};
use crate::sort::SortMode;
use crate::store::QuoteStore;
use crate::view::{CardList, QuoteCard};

/// How like counts are fetched on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// One `GET /likes?quoteId=` per quote
    #[default]
    PerQuote,
    /// One `GET /quotes?_embed=likes`
    Embedded,
}

impl LoadStrategy {
    /// Strategy selected by configuration
    pub fn from_config(config: &Config) -> Self {
        if config.embed_likes {
            LoadStrategy::Embedded
        } else {
            LoadStrategy::PerQuote
        }
    }
}

/// Session tying the backend, store and rendered cards together
pub struct QuoteSync<A: QuoteApi> {
    api: A,
    store: QuoteStore,
    cards: CardList,
    sort: SortMode,
    strategy: LoadStrategy,
}

impl<A: QuoteApi> QuoteSync<A> {
    /// Create an empty session; call [`load`](Self::load) to populate it
    pub fn new(api: A, sort: SortMode) -> Self {
        Self {
            api,
            store: QuoteStore::new(),
            cards: CardList::default(),
            sort,
            strategy: LoadStrategy::default(),
        }
    }

    /// Set how like counts are fetched
    pub fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn cards(&self) -> &CardList {
        &self.cards
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ==================== Network operations ====================

    /// Fetch every quote and its like count, replacing the store
    pub async fn load(&mut self) -> ApiResult<usize> {
        let quotes = match self.strategy {
            LoadStrategy::PerQuote => self.fetch_per_quote().await,
            LoadStrategy::Embedded => self.fetch_embedded().await,
        }
        .inspect_err(|e| warn!("Failed to load quotes: {}", e))?;

        info!("Loaded {} quotes", quotes.len());
        self.store.replace(quotes);
        self.render();
        Ok(self.store.len())
    }

    /// Reload everything from the backend
    pub async fn refresh(&mut self) -> ApiResult<usize> {
        self.load().await
    }

    /// Create a quote and show it
    pub async fn create(&mut self, text: &str, author: &str) -> ApiResult<&Quote> {
        let body = NewQuote::new(require("Quote text", text)?, require("Author", author)?);

        let record = self
            .api
            .create_quote(&body)
            .await
            .inspect_err(|e| warn!("Failed to create quote: {}", e))?;

        let quote = record.into_quote(0);
        let id = quote.id;
        info!("Created quote {}", id);

        if self.sort.is_by_author() {
            self.store.push(quote);
            self.render();
        } else {
            self.cards.append(QuoteCard::from_quote(&quote));
            self.store.push(quote);
        }

        self.store.get(id).ok_or(ApiError::UnknownQuote(id))
    }

    /// Change a quote's text and author
    pub async fn update(&mut self, id: QuoteId, text: &str, author: &str) -> ApiResult<&Quote> {
        self.ensure_known(id)?;
        let patch = QuotePatch::new(require("Quote text", text)?, require("Author", author)?);

        let record = self
            .api
            .update_quote(id, &patch)
            .await
            .inspect_err(|e| warn!("Failed to update quote {}: {}", id, e))?;

        info!("Updated quote {}", id);
        let quote = self
            .store
            .apply_update(id, record.quote, record.author)
            .ok_or(ApiError::UnknownQuote(id))?;
        self.cards.set_text(id, &quote.text, &quote.author);
        self.cards.end_edit(id);
        Ok(quote)
    }

    /// Like a quote, returning its new like count
    pub async fn like(&mut self, id: QuoteId) -> ApiResult<usize> {
        self.ensure_known(id)?;

        let like = self
            .api
            .create_like(&NewLike::now(id))
            .await
            .inspect_err(|e| warn!("Failed to like quote {}: {}", id, e))?;

        debug!("Created like {} on quote {}", like.id, id);
        let count = self
            .store
            .increment_likes(id)
            .ok_or(ApiError::UnknownQuote(id))?;
        self.cards.set_likes(id, count);
        Ok(count)
    }

    /// Delete a quote, returning it
    pub async fn delete(&mut self, id: QuoteId) -> ApiResult<Quote> {
        self.ensure_known(id)?;

        self.api
            .delete_quote(id)
            .await
            .inspect_err(|e| warn!("Failed to delete quote {}: {}", id, e))?;

        info!("Deleted quote {}", id);
        self.cards.remove(id);
        self.store.remove(id).ok_or(ApiError::UnknownQuote(id))
    }

    // ==================== Local operations ====================

    /// Flip the sort mode and re-render from the store
    pub fn toggle_sort(&mut self) -> SortMode {
        self.sort = self.sort.toggled();
        debug!("Sort mode: {:?}", self.sort);
        self.render();
        self.sort
    }

    /// Open a card's edit form
    pub fn begin_edit(&mut self, id: QuoteId) -> bool {
        self.cards.begin_edit(id)
    }

    /// Close a card's edit form without saving
    pub fn cancel_edit(&mut self, id: QuoteId) -> bool {
        self.cards.end_edit(id)
    }

    /// Rebuild every card from the store in the current sort order
    pub fn render(&mut self) {
        self.cards = CardList::render(self.store.sorted(self.sort));
    }

    fn ensure_known(&self, id: QuoteId) -> ApiResult<()> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(ApiError::UnknownQuote(id))
        }
    }

    async fn fetch_per_quote(&self) -> ApiResult<Vec<Quote>> {
        let records = self.api.list_quotes().await?;

        let mut quotes = Vec::with_capacity(records.len());
        for record in records {
            let likes = self.api.list_likes(record.id).await?;
            quotes.push(record.into_quote(likes.len()));
        }
        Ok(quotes)
    }

    async fn fetch_embedded(&self) -> ApiResult<Vec<Quote>> {
        let records = self.api.list_quotes_with_likes().await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let likes = record.embedded_like_count().unwrap_or(0);
                record.into_quote(likes)
            })
            .collect())
    }
}

/// Reject empty required fields; the value is sent as typed
fn require<'a>(field: &str, value: &'a str) -> ApiResult<&'a str> {
    if value.is_empty() {
        Err(ApiError::InvalidInput(format!("{} is required", field)))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Like, QuoteRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory backend with json-server semantics
    #[derive(Default)]
    struct FakeApi {
        state: Mutex<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        quotes: Vec<QuoteRecord>,
        likes: Vec<Like>,
        next_id: u64,
        fail_with: Option<u16>,
        requests: usize,
    }

    impl FakeApi {
        fn with_quotes(quotes: &[(u64, &str, &str)], likes: &[(u64, usize)]) -> Self {
            let api = FakeApi::default();
            {
                let mut state = api.state.lock().unwrap();
                for &(id, text, author) in quotes {
                    state.quotes.push(QuoteRecord {
                        id,
                        quote: text.to_string(),
                        author: author.to_string(),
                        likes: None,
                    });
                    state.next_id = state.next_id.max(id);
                }
                let mut like_id = 0;
                for &(quote_id, count) in likes {
                    for _ in 0..count {
                        like_id += 1;
                        state.likes.push(Like {
                            id: like_id,
                            quote_id,
                            created_at: 1_558_524_356,
                        });
                    }
                }
            }
            api
        }

        fn fail_with(&self, status: Option<u16>) {
            self.state.lock().unwrap().fail_with = status;
        }

        fn requests(&self) -> usize {
            self.state.lock().unwrap().requests
        }

        fn like_count(&self, quote_id: u64) -> usize {
            let state = self.state.lock().unwrap();
            state.likes.iter().filter(|l| l.quote_id == quote_id).count()
        }

        fn begin(&self) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
            let mut state = self.state.lock().unwrap();
            state.requests += 1;
            match state.fail_with {
                Some(status) => Err(ApiError::Status {
                    url: "http://fake/quotes".to_string(),
                    status,
                }),
                None => Ok(state),
            }
        }
    }

    #[async_trait]
    impl QuoteApi for FakeApi {
        async fn list_quotes(&self) -> ApiResult<Vec<QuoteRecord>> {
            Ok(self.begin()?.quotes.clone())
        }

        async fn list_quotes_with_likes(&self) -> ApiResult<Vec<QuoteRecord>> {
            let state = self.begin()?;
            Ok(state
                .quotes
                .iter()
                .cloned()
                .map(|mut q| {
                    q.likes = Some(
                        state
                            .likes
                            .iter()
                            .filter(|l| l.quote_id == q.id)
                            .cloned()
                            .collect(),
                    );
                    q
                })
                .collect())
        }

        async fn create_quote(&self, quote: &NewQuote) -> ApiResult<QuoteRecord> {
            let mut state = self.begin()?;
            state.next_id += 1;
            let record = QuoteRecord {
                id: state.next_id,
                quote: quote.quote.clone(),
                author: quote.author.clone(),
                likes: None,
            };
            state.quotes.push(record.clone());
            Ok(record)
        }

        async fn update_quote(&self, id: QuoteId, patch: &QuotePatch) -> ApiResult<QuoteRecord> {
            let mut state = self.begin()?;
            let record = state
                .quotes
                .iter_mut()
                .find(|q| q.id == id)
                .ok_or(ApiError::Status {
                    url: format!("http://fake/quotes/{}", id),
                    status: 404,
                })?;
            record.quote = patch.quote.clone();
            record.author = patch.author.clone();
            Ok(record.clone())
        }

        async fn delete_quote(&self, id: QuoteId) -> ApiResult<()> {
            let mut state = self.begin()?;
            state.quotes.retain(|q| q.id != id);
            Ok(())
        }

        async fn list_likes(&self, quote_id: QuoteId) -> ApiResult<Vec<Like>> {
            let state = self.begin()?;
            Ok(state
                .likes
                .iter()
                .filter(|l| l.quote_id == quote_id)
                .cloned()
                .collect())
        }

        async fn create_like(&self, like: &NewLike) -> ApiResult<Like> {
            let mut state = self.begin()?;
            let created = Like {
                id: state.likes.len() as u64 + 1,
                quote_id: like.quote_id,
                created_at: like.created_at,
            };
            state.likes.push(created.clone());
            Ok(created)
        }
    }

    fn sample_api() -> FakeApi {
        FakeApi::with_quotes(
            &[
                (1, "Test the code", "Mark"),
                (2, "Stay curious", "ada"),
                (3, "Keep it simple", "Brian"),
            ],
            &[(1, 2), (3, 4)],
        )
    }

    async fn loaded() -> QuoteSync<FakeApi> {
        let mut sync = QuoteSync::new(sample_api(), SortMode::ById);
        sync.load().await.unwrap();
        sync
    }

    #[tokio::test]
    async fn test_load_counts_likes_per_quote() {
        let mut sync = QuoteSync::new(sample_api(), SortMode::ById);
        let count = sync.load().await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(sync.store().len(), 3);
        assert_eq!(sync.store().get(1).unwrap().like_count, 2);
        assert_eq!(sync.store().get(2).unwrap().like_count, 0);
        assert_eq!(sync.store().get(3).unwrap().like_count, 4);
        // One list request plus one likes request per quote
        assert_eq!(sync.api().requests(), 4);
        assert_eq!(sync.cards().ids(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_embedded() {
        let mut sync =
            QuoteSync::new(sample_api(), SortMode::ById).with_strategy(LoadStrategy::Embedded);
        sync.load().await.unwrap();

        assert_eq!(sync.store().get(1).unwrap().like_count, 2);
        assert_eq!(sync.store().get(3).unwrap().like_count, 4);
        assert_eq!(sync.api().requests(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_store() {
        let mut sync = loaded().await;
        sync.api().fail_with(Some(500));

        let err = sync.load().await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(sync.store().len(), 3);
        assert_eq!(sync.cards().len(), 3);
    }

    #[tokio::test]
    async fn test_create_appends_one_card() {
        let mut sync = loaded().await;

        let quote = sync.create("Hello", "Ada").await.unwrap().clone();
        assert_eq!(quote.like_count, 0);
        assert_eq!(sync.store().len(), 4);
        assert_eq!(sync.cards().len(), 4);

        let card = sync.cards().at(3).unwrap();
        assert_eq!(card.id, quote.id);
        assert_eq!(card.text, "Hello");
        assert_eq!(card.author, "Ada");
    }

    #[tokio::test]
    async fn test_create_resorts_when_sorting_by_author() {
        let mut sync = loaded().await;
        sync.toggle_sort();

        let id = sync.create("Hello", "Alan").await.unwrap().id;
        let authors: Vec<String> = sync.cards().iter().map(|c| c.author.clone()).collect();
        assert_eq!(authors, vec!["ada", "Alan", "Brian", "Mark"]);
        assert_eq!(sync.cards().position(id), Some(1));
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let mut sync = loaded().await;
        let before = sync.api().requests();

        let err = sync.create("", "Ada").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(sync.create("Hello", "").await.is_err());
        assert_eq!(sync.api().requests(), before);
        assert_eq!(sync.store().len(), 3);
    }

    #[tokio::test]
    async fn test_create_sends_text_as_typed() {
        let mut sync = loaded().await;

        let id = sync.create("  Hello ", " ").await.unwrap().id;
        assert_eq!(sync.store().get(id).unwrap().text, "  Hello ");

        let state = sync.api().state.lock().unwrap();
        let sent = state.quotes.iter().find(|q| q.id == id).unwrap();
        assert_eq!(sent.quote, "  Hello ");
        assert_eq!(sent.author, " ");
    }

    #[tokio::test]
    async fn test_like_increments_only_target() {
        let mut sync = loaded().await;

        let count = sync.like(1).await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(sync.cards().get(1).unwrap().likes, 3);
        assert_eq!(sync.cards().get(2).unwrap().likes, 0);
        assert_eq!(sync.cards().get(3).unwrap().likes, 4);
        assert_eq!(sync.api().like_count(1), 3);
    }

    #[tokio::test]
    async fn test_like_survives_resort() {
        let mut sync = loaded().await;
        sync.like(2).await.unwrap();
        sync.toggle_sort();

        assert_eq!(sync.store().get(2).unwrap().like_count, 1);
        assert_eq!(sync.cards().get(2).unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_like_failure_changes_nothing() {
        let mut sync = loaded().await;
        sync.api().fail_with(Some(503));

        assert!(sync.like(1).await.is_err());
        assert_eq!(sync.cards().get(1).unwrap().likes, 2);
        assert_eq!(sync.store().get(1).unwrap().like_count, 2);
    }

    #[tokio::test]
    async fn test_delete_removes_one_card_and_entry() {
        let mut sync = loaded().await;

        let removed = sync.delete(2).await.unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(sync.cards().ids(), vec![1, 3]);
        assert_eq!(sync.store().len(), 2);

        sync.toggle_sort();
        sync.toggle_sort();
        assert!(sync.cards().get(2).is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_fails_without_request() {
        let mut sync = loaded().await;
        let before = sync.api().requests();

        assert!(matches!(sync.like(99).await, Err(ApiError::UnknownQuote(99))));
        assert!(matches!(sync.delete(99).await, Err(ApiError::UnknownQuote(99))));
        assert!(sync.update(99, "x", "y").await.is_err());
        assert_eq!(sync.api().requests(), before);
    }

    #[tokio::test]
    async fn test_update_patches_target_and_collapses_form() {
        let mut sync = loaded().await;
        assert!(sync.begin_edit(3));
        assert!(sync.cards().get(3).unwrap().editing);

        sync.update(3, "New text", "New author").await.unwrap();

        let card = sync.cards().get(3).unwrap();
        assert_eq!(card.text, "New text");
        assert_eq!(card.author, "New author");
        assert!(!card.editing);
        assert!(card.shows_edit_button());
        assert_eq!(sync.cards().get(1).unwrap().text, "Test the code");
        assert_eq!(sync.store().get(3).unwrap().author, "New author");
    }

    #[tokio::test]
    async fn test_update_failure_keeps_form_open() {
        let mut sync = loaded().await;
        sync.begin_edit(1);
        sync.api().fail_with(Some(500));

        assert!(sync.update(1, "Changed", "Someone").await.is_err());
        let card = sync.cards().get(1).unwrap();
        assert!(card.editing);
        assert_eq!(card.text, "Test the code");
    }

    #[tokio::test]
    async fn test_cancel_edit() {
        let mut sync = loaded().await;
        sync.begin_edit(2);
        assert!(sync.cancel_edit(2));
        assert!(!sync.cards().get(2).unwrap().editing);
    }

    #[tokio::test]
    async fn test_toggle_sort_orders_and_restores() {
        let mut sync = loaded().await;
        let before = sync.cards().ids();
        let requests = sync.api().requests();

        assert_eq!(sync.toggle_sort(), SortMode::ByAuthor);
        let authors: Vec<String> = sync.cards().iter().map(|c| c.author.clone()).collect();
        assert_eq!(authors, vec!["ada", "Brian", "Mark"]);

        assert_eq!(sync.toggle_sort(), SortMode::ById);
        assert_eq!(sync.cards().ids(), before);
        assert_eq!(sync.api().requests(), requests);
    }
}
