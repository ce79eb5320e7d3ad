//! Quotes TUI
//!
//! Terminal user interface for browsing and editing quotes on the backend.
//!
//! ## Layout
//!
//! - Top: title, sort toggle and quote count
//! - Middle: quote cards (text, author, likes)
//! - Bottom: status bar
//!
//! ## Keys
//!
//! - j/k or ↑/↓: Move selection up/down
//! - g/G: Jump to first/last quote
//! - a: Add quote
//! - e: Edit selected quote
//! - l: Like selected quote
//! - d: Delete selected quote (asks y/n)
//! - s: Toggle sort by author
//! - r: Reload from the backend
//! - ?: Help
//! - q: Quit
//!
//! In the form, Tab switches fields, Enter submits and Esc cancels.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quotes_core::{Config, HttpApi, LoadStrategy, QuoteSync, SortMode};

use app::{App, FormKind, InputMode};

type Session = QuoteSync<HttpApi>;

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if QUOTES_LOG is set)
    init_tui_logging(&config);

    let api = HttpApi::new(&config).context("Failed to create API client")?;
    let mut sync = QuoteSync::new(api, SortMode::from_config(&config))
        .with_strategy(LoadStrategy::from_config(&config));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();

    // Initial load; a failure leaves an empty list and an error modal
    app.loading = Some("Loading quotes...");
    terminal.draw(|frame| ui::draw(frame, &app, sync.cards(), sync.sort_mode()))?;
    match sync.load().await {
        Ok(count) => app.set_status(format!("Loaded {} quotes from {}", count, config.base_url())),
        Err(e) => app.set_error(e.user_message()),
    }
    app.loading = None;

    let result = run_app(&mut terminal, &mut app, &mut sync).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    sync: &mut Session,
) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app, sync.cards(), sync.sort_mode()))?;

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // Check for terminal events (non-blocking)
        if !event::poll(std::time::Duration::from_millis(0))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // If error modal is showing, any key dismisses it
        if app.has_error() {
            app.clear_error();
            continue;
        }

        // If help is showing, any key dismisses it
        if app.show_help {
            app.show_help = false;
            continue;
        }

        match app.input_mode {
            InputMode::Normal => handle_normal_mode(terminal, app, sync, key.code, key.modifiers).await?,
            InputMode::Form => handle_form_mode(terminal, app, sync, key.code).await?,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Redraw with a loading message before a request goes out
fn show_loading<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    sync: &Session,
    message: &'static str,
) -> Result<()> {
    app.loading = Some(message);
    terminal.draw(|frame| ui::draw(frame, app, sync.cards(), sync.sort_mode()))?;
    Ok(())
}

/// Handle key events in normal mode
async fn handle_normal_mode<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    sync: &mut Session,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    // Answer to a pending delete confirmation
    if let Some(id) = app.pending_delete.take() {
        if code == KeyCode::Char('y') {
            show_loading(terminal, app, sync, "Deleting...")?;
            match sync.delete(id).await {
                Ok(quote) => app.set_status(format!("Deleted quote by {}", quote.author)),
                Err(e) => app.set_error(e.user_message()),
            }
            app.loading = None;
            app.clamp_selection(sync.cards().len());
        } else {
            app.set_status("Delete cancelled");
        }
        return Ok(());
    }

    let len = sync.cards().len();

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.move_down(len),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_first(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_last(len),

        // Add quote
        KeyCode::Char('a') => app.open_create_form(),

        // Edit quote
        KeyCode::Char('e') => {
            if let Some(card) = app.current_card(sync.cards()).cloned() {
                sync.begin_edit(card.id);
                app.open_edit_form(&card);
            }
        }

        // Like quote
        KeyCode::Char('l') => {
            if let Some(id) = app.current_card(sync.cards()).map(|c| c.id) {
                show_loading(terminal, app, sync, "Liking...")?;
                match sync.like(id).await {
                    Ok(count) => app.set_status(format!("Likes: {}", count)),
                    Err(e) => app.set_error(e.user_message()),
                }
                app.loading = None;
            }
        }

        // Delete quote
        KeyCode::Char('d') => {
            if let Some(card) = app.current_card(sync.cards()).cloned() {
                app.request_delete(&card);
            }
        }

        // Toggle sort
        KeyCode::Char('s') => {
            let selected = app.current_card(sync.cards()).map(|c| c.id);
            let mode = sync.toggle_sort();
            if let Some(id) = selected {
                app.select_id(id, sync.cards());
            }
            app.set_status(mode.label());
        }

        // Reload
        KeyCode::Char('r') => {
            show_loading(terminal, app, sync, "Reloading...")?;
            match sync.refresh().await {
                Ok(count) => app.set_status(format!("Loaded {} quotes", count)),
                Err(e) => app.set_error(e.user_message()),
            }
            app.loading = None;
            app.clamp_selection(sync.cards().len());
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }

    Ok(())
}

/// Handle key events while the quote form is open
async fn handle_form_mode<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    sync: &mut Session,
    code: KeyCode,
) -> Result<()> {
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };

    match code {
        KeyCode::Esc => {
            if let Some(form) = app.close_form() {
                if let FormKind::Edit(id) = form.kind {
                    sync.cancel_edit(id);
                }
            }
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.switch_field(),
        KeyCode::Left => form.cursor_left(),
        KeyCode::Right => form.cursor_right(),
        KeyCode::Backspace => form.delete_char(),
        KeyCode::Char(c) => form.insert_char(c),
        KeyCode::Enter => {
            if let Err(msg) = form.validate() {
                app.set_status(msg);
                return Ok(());
            }
            let form = form.clone();

            show_loading(terminal, app, sync, "Saving...")?;
            let result = match form.kind {
                FormKind::Create => sync.create(&form.quote, &form.author).await.map(|q| q.id),
                FormKind::Edit(id) => sync.update(id, &form.quote, &form.author).await.map(|q| q.id),
            };
            app.loading = None;

            // On failure the form stays open with the user's input
            match result {
                Ok(id) => {
                    app.close_form();
                    app.select_id(id, sync.cards());
                    app.set_status(match form.kind {
                        FormKind::Create => "Quote added",
                        FormKind::Edit(_) => "Quote updated",
                    });
                }
                Err(e) => {
                    warn!("Form submit failed: {}", e);
                    app.set_error(e.user_message());
                }
            }
        }
        _ => {}
    }

    Ok(())
}

/// Initialize file-based logging for TUI mode
///
/// Only initializes if QUOTES_LOG environment variable is set.
/// Logs to config.log_file or data_dir/debug.log
fn init_tui_logging(config: &Config) {
    // Only log if QUOTES_LOG is set
    let Ok(log_level) = std::env::var("QUOTES_LOG") else {
        return;
    };

    if let Err(e) = config.ensure_data_dir() {
        eprintln!("Warning: {:#}", e);
        return;
    }

    let log_path = config.log_path();

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "quotes_core={},quotes_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
