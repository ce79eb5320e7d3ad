//! Application state and logic
//!
//! Holds UI-only state (selection, input form, messages). Quote data lives
//! in the `QuoteSync` session, which is passed in where needed.

use quotes_core::{CardList, QuoteCard, QuoteId};

/// How long status messages stay visible
const STATUS_TIMEOUT_SECS: u64 = 3;

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Typing into the quote form
    Form,
}

/// What the form will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Create a new quote
    Create,
    /// Edit an existing quote
    Edit(QuoteId),
}

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Quote,
    Author,
}

impl FormField {
    pub fn other(self) -> Self {
        match self {
            FormField::Quote => FormField::Author,
            FormField::Author => FormField::Quote,
        }
    }
}

/// Two-field quote form, used for both create and edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteForm {
    pub kind: FormKind,
    pub quote: String,
    pub author: String,
    pub focus: FormField,
    /// Cursor position in the focused field, in characters
    pub cursor: usize,
}

impl QuoteForm {
    /// Empty form for a new quote
    pub fn create() -> Self {
        Self {
            kind: FormKind::Create,
            quote: String::new(),
            author: String::new(),
            focus: FormField::Quote,
            cursor: 0,
        }
    }

    /// Form pre-filled from a card
    pub fn edit(card: &QuoteCard) -> Self {
        Self {
            kind: FormKind::Edit(card.id),
            quote: card.text.clone(),
            author: card.author.clone(),
            focus: FormField::Quote,
            cursor: card.text.chars().count(),
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            FormKind::Create => " New Quote ".to_string(),
            FormKind::Edit(id) => format!(" Edit Quote {} ", id),
        }
    }

    /// Text of the focused field
    pub fn focused(&self) -> &str {
        match self.focus {
            FormField::Quote => &self.quote,
            FormField::Author => &self.author,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Quote => &mut self.quote,
            FormField::Author => &mut self.author,
        }
    }

    /// Move focus to the other field, cursor at its end
    pub fn switch_field(&mut self) {
        self.focus = self.focus.other();
        self.cursor = self.focused().chars().count();
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        let field = self.focused_mut();
        let at = byte_offset(field, cursor);
        field.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let cursor = self.cursor;
        let field = self.focused_mut();
        let at = byte_offset(field, cursor);
        field.remove(at);
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.cursor < self.focused().chars().count() {
            self.cursor += 1;
        }
    }

    /// Check both fields are filled in
    pub fn validate(&self) -> Result<(), String> {
        if self.quote.is_empty() {
            return Err("Quote text is required".to_string());
        }
        if self.author.is_empty() {
            return Err("Author is required".to_string());
        }
        Ok(())
    }
}

/// Byte index of the `chars`-th character
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Open quote form
    pub form: Option<QuoteForm>,
    /// Currently selected card index
    pub selected: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<std::time::Instant>,
    /// Error shown in a modal until a key is pressed
    pub error_message: Option<String>,
    /// Message shown while a request is in flight
    pub loading: Option<&'static str>,
    /// Quote waiting for delete confirmation
    pub pending_delete: Option<QuoteId>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            form: None,
            selected: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            loading: None,
            pending_delete: None,
            show_help: false,
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(std::time::Instant::now());
    }

    /// Check and clear expired status message
    ///
    /// A delete confirmation expires together with its prompt.
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > std::time::Duration::from_secs(STATUS_TIMEOUT_SECS) {
                self.status_message = None;
                self.status_message_time = None;
                self.pending_delete = None;
            }
        }
    }

    /// Show an error modal
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Get the currently selected card
    pub fn current_card<'a>(&self, cards: &'a CardList) -> Option<&'a QuoteCard> {
        cards.at(self.selected)
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn move_down(&mut self, len: usize) {
        if self.selected < len.saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Move selection to first card
    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    /// Move selection to last card
    pub fn move_to_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the selection inside the list after it changed size
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }

    /// Select the card for `id`, if it is shown
    pub fn select_id(&mut self, id: QuoteId, cards: &CardList) {
        if let Some(pos) = cards.position(id) {
            self.selected = pos;
        }
    }

    /// Open the form for a new quote
    pub fn open_create_form(&mut self) {
        self.form = Some(QuoteForm::create());
        self.input_mode = InputMode::Form;
    }

    /// Open the form pre-filled from a card
    pub fn open_edit_form(&mut self, card: &QuoteCard) {
        self.form = Some(QuoteForm::edit(card));
        self.input_mode = InputMode::Form;
    }

    /// Close the form, returning it
    pub fn close_form(&mut self) -> Option<QuoteForm> {
        self.input_mode = InputMode::Normal;
        self.form.take()
    }

    /// Ask for delete confirmation
    pub fn request_delete(&mut self, card: &QuoteCard) {
        self.pending_delete = Some(card.id);
        self.set_status(format!("Delete quote by {}? y/n", card.author));
    }
}
