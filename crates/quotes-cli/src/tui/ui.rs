//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use quotes_core::{CardList, QuoteCard, SortMode};

use super::app::{App, FormField, QuoteForm};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, cards: &CardList, sort: SortMode) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, cards, sort, chunks[0]);
    draw_cards(frame, app, cards, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(form) = &app.form {
        draw_form(frame, form);
    }

    if let Some(error) = &app.error_message {
        draw_error(frame, error);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the title line with the sort toggle
fn draw_header(frame: &mut Frame, cards: &CardList, sort: SortMode, area: Rect) {
    let sort_style = if sort.is_by_author() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let line = Line::from(vec![
        Span::styled("Quotes", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" ({})  ", cards.len())),
        Span::styled(format!("[{}]", sort.label()), sort_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn card_item(card: &QuoteCard) -> ListItem<'static> {
    let mut footer = vec![Span::styled(
        format!("[{}]", card.likes_label()),
        Style::default().fg(Color::Yellow),
    )];
    if card.shows_edit_button() {
        footer.push(Span::styled(
            "  [Edit] [Delete]",
            Style::default().add_modifier(Modifier::DIM),
        ));
    } else {
        footer.push(Span::styled("  editing...", Style::default().fg(Color::Cyan)));
    }

    ListItem::new(vec![
        Line::from(card.text.clone()),
        Line::from(Span::styled(
            format!("  - {}", card.author),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(footer),
        Line::from(""),
    ])
}

/// Draw the quote cards
fn draw_cards(frame: &mut Frame, app: &App, cards: &CardList, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if cards.is_empty() {
        let message = if app.loading.is_some() {
            "Loading..."
        } else {
            "No quotes yet. Press 'a' to add one."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = cards.iter().map(card_item).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(loading) = app.loading {
        loading.to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "a:add  e:edit  l:like  d:del  s:sort  r:reload  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Centered popup area, clamped to the frame
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw the add/edit form
fn draw_form(frame: &mut Frame, form: &QuoteForm) {
    let area = popup_area(frame.area(), 60, 8);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let label_style = |field: FormField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };

    frame.render_widget(
        Paragraph::new(Span::styled("Quote", label_style(FormField::Quote))),
        rows[0],
    );
    frame.render_widget(Paragraph::new(format!("> {}", form.quote)), rows[1]);
    frame.render_widget(
        Paragraph::new(Span::styled("Author", label_style(FormField::Author))),
        rows[2],
    );
    frame.render_widget(Paragraph::new(format!("> {}", form.author)), rows[3]);
    frame.render_widget(
        Paragraph::new("Tab:switch  Enter:save  Esc:cancel")
            .style(Style::default().add_modifier(Modifier::DIM)),
        rows[5],
    );

    // Position cursor
    let input_row = match form.focus {
        FormField::Quote => rows[1],
        FormField::Author => rows[3],
    };
    frame.set_cursor_position((cursor_column(input_row, form.cursor), input_row.y));
}

/// Screen column for a cursor after the "> " prompt, kept inside `row`
fn cursor_column(row: Rect, cursor: usize) -> u16 {
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
    row.x
        .saturating_add(2)
        .saturating_add(offset)
        .min(row.right().saturating_sub(1))
}

/// Draw the error modal
fn draw_error(frame: &mut Frame, message: &str) {
    let area = popup_area(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 44, 20);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         Jump to first/last"),
        Line::from(""),
        Line::from("Quotes:"),
        Line::from("  a           Add quote"),
        Line::from("  e           Edit quote"),
        Line::from("  l           Like quote"),
        Line::from("  d           Delete quote"),
        Line::from("  s           Toggle sort by author"),
        Line::from("  r           Reload"),
        Line::from(""),
        Line::from("  ?           Help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}
