//! UI rendering
//!
//! Pure rendering functions that transform state into terminal frames.
//! Render functions read state and draw; they never change it.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use libshelf::{Book, ReadingStatus};

use crate::app::{AppState, Screen, SearchField};

/// Render the application UI
///
/// This is the main rendering entry point.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Screen tabs
            Constraint::Min(5),    // Screen body
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_tabs(frame, chunks[0], state);

    match state.current_screen {
        Screen::Library => render_library(frame, chunks[1], state),
        Screen::Search => render_search(frame, chunks[1], state),
    }

    render_status_bar(frame, chunks[2], state);

    if state.help_visible {
        render_help_overlay(frame, area, state);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, state);
    }
}

/// Apply `style` only when colors are enabled
fn paint(state: &AppState, style: Style) -> Style {
    if state.config.colors_enabled {
        style
    } else {
        Style::default()
    }
}

fn selected_style(state: &AppState) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let selected = match state.current_screen {
        Screen::Library => 0,
        Screen::Search => 1,
    };

    let library_title = format!("F2 Library ({})", state.session.library().len());
    let tabs = Tabs::new(vec![library_title, "F3 Search".to_string()])
        .block(Block::default().borders(Borders::ALL).title(" Shelf "))
        .select(selected)
        .highlight_style(paint(state, Style::default().fg(Color::Yellow)).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

/// Render the library screen
fn render_library(frame: &mut Frame, area: Rect, state: &AppState) {
    let books = state.session.library_books();
    let library = state.session.library();
    let title = format!(
        " Library: {} want to read, {} read ",
        library.count(ReadingStatus::WantToRead),
        library.count(ReadingStatus::Read)
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if books.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Your library is empty",
                paint(state, Style::default().fg(Color::Yellow)),
            )),
            Line::from(""),
            Line::from("Press F3 to search, then Ctrl+A to add a book"),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = books
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let status = state.session.status(&book.isbn).map(|s| s.as_str()).unwrap_or("");
            let status_style = match state.session.status(&book.isbn) {
                Some(ReadingStatus::Read) => paint(state, Style::default().fg(Color::Green)),
                _ => paint(state, Style::default().fg(Color::Yellow)),
            };
            let row = Row::new(vec![
                Cell::from(Span::styled(status.to_string(), status_style)),
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(book.isbn.clone()),
            ]);
            if i == state.library_selected {
                row.style(selected_style(state))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(13),
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Length(17),
        ],
    )
    .header(header(state, ["Status", "Title", "Author", "ISBN"]))
    .block(block);

    frame.render_widget(table, area);
}

/// Render the search screen: query form above the result table
fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_search_form(frame, chunks[0], state);
    render_results(frame, chunks[1], state);
}

fn render_search_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let field = state.search.field;
    let mut spans = vec![
        Span::styled(
            format!("{}: ", field.label()),
            paint(state, Style::default().fg(Color::Cyan)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(state.search.input.clone()),
        Span::styled("_", paint(state, Style::default().fg(Color::Gray))),
    ];

    if field.supports_exact() {
        let mode = if state.search.exact_match { "  [exact]" } else { "  [contains]" };
        spans.push(Span::styled(mode, paint(state, Style::default().fg(Color::Gray))));
    }
    match field {
        SearchField::Genre => {
            spans.push(Span::styled("  ←/→ pick genre", paint(state, Style::default().fg(Color::Gray))));
        }
        SearchField::PageRange => {
            spans.push(Span::styled("  e.g. 300-400, 300- or -400", paint(state, Style::default().fg(Color::Gray))));
        }
        _ => {}
    }

    let form = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Search (Tab: field, Enter: search, Ctrl+R: refine) ")
            .borders(Borders::ALL),
    );

    frame.render_widget(form, area);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = state.session.page();
    let title = format!(
        " Results: {} books, page {} of {} ",
        page.total_items,
        state.session.current_page(),
        page.total_pages.max(1)
    );
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if !state.search.applied.is_empty() {
        block = block.title_bottom(format!(" {} ", state.search.applied.join(" & ")));
    }
    let nav = match (page.has_prev(), page.has_next()) {
        (true, true) => " ◀ PgUp | PgDn ▶ ",
        (true, false) => " ◀ PgUp ",
        (false, true) => " PgDn ▶ ",
        (false, false) => "",
    };
    if !nav.is_empty() {
        block = block.title_bottom(Line::from(nav).right_aligned());
    }

    if page.is_empty() {
        let empty = Paragraph::new("No books match")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let row = result_row(state, book);
            if i == state.search.selected {
                row.style(selected_style(state))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Percentage(25),
        ],
    )
    .header(header(state, ["", "Title", "Author", "Rating", "Pages", "Lang", "Genres"]))
    .block(block);

    frame.render_widget(table, area);
}

fn result_row(state: &AppState, book: &Book) -> Row<'static> {
    let marker = if state.session.library().contains(&book.isbn) { "*" } else { "" };
    let rating = book.rating.map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".to_string());
    let pages = book.pages.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(Span::styled(marker, paint(state, Style::default().fg(Color::Green)))),
        Cell::from(book.title.clone()),
        Cell::from(book.author.clone()),
        Cell::from(rating),
        Cell::from(pages),
        Cell::from(book.language.clone()),
        Cell::from(book.genres.to_string()),
    ])
}

fn header<const N: usize>(state: &AppState, titles: [&'static str; N]) -> Row<'static> {
    Row::new(titles.to_vec())
        .style(paint(state, Style::default().fg(Color::Cyan)).add_modifier(Modifier::BOLD))
}

/// Render status bar with the last message and key hints
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match state.current_screen {
        Screen::Library => "↑/↓: Select | r: Mark read | d: Remove | F1: Help | q: Quit",
        Screen::Search => "Ctrl+A: Add | PgUp/PgDn: Page | Ctrl+X: Reset | F1: Help | Ctrl+C: Quit",
    };

    let mut spans = Vec::new();
    if let Some(ref message) = state.status.message {
        spans.push(Span::styled(
            message.clone(),
            paint(state, Style::default().fg(Color::Green)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(hints, paint(state, Style::default().fg(Color::Gray))));

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  F1         - Toggle help"),
        Line::from("  F2         - Library"),
        Line::from("  F3         - Search"),
        Line::from("  Esc        - Dismiss overlays"),
        Line::from("  Ctrl+C     - Quit"),
        Line::from(""),
        Line::from("Library:"),
        Line::from("  ↑/↓        - Select book"),
        Line::from("  r          - Mark as read"),
        Line::from("  d          - Remove from library"),
        Line::from("  q          - Quit"),
        Line::from(""),
        Line::from("Search:"),
        Line::from("  Tab        - Next field (Shift+Tab: previous)"),
        Line::from("  Ctrl+E     - Toggle exact match (title, author)"),
        Line::from("  ←/→        - Pick genre (genre field)"),
        Line::from("  Enter      - Search the whole catalog"),
        Line::from("  Ctrl+R     - Refine current results"),
        Line::from("  Ctrl+X     - Reset all filters"),
        Line::from("  ↑/↓ PgUp/PgDn - Select, change page"),
        Line::from("  Ctrl+A     - Add selected book to library"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(paint(state, Style::default().fg(Color::Cyan))),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

/// Render error overlay
fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Invalid query",
            paint(state, Style::default().fg(Color::Red)).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(paint(state, Style::default().fg(Color::Red))),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Helper to create centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
