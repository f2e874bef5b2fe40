//! Reducer function for state transitions
//!
//! The reducer is a function `(State, Action) -> State` with no I/O. The
//! book table is loaded before the first frame, so searching, paging and
//! library updates are plain in-memory transitions and happen right here.

use super::actions::{Action, Screen};
use super::state::{AppState, SearchState, StatusBarState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Reducer
///
/// Takes current state and an action, returns new state.
///
/// # Guarantees
///
/// - No file or terminal I/O
/// - A rejected query leaves results, page and selection untouched
/// - Deterministic (same inputs -> same output)
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, _) => state, // Terminal auto-handles resize

        // === Navigation ===
        Action::NavigateTo(screen) => AppState {
            current_screen: screen,
            library_selected: if screen == Screen::Library { 0 } else { state.library_selected },
            ..state
        },

        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === Search form ===
        Action::SearchInput(c) => {
            let mut input = state.search.input;
            input.push(c);
            AppState {
                search: SearchState { input, ..state.search },
                ..state
            }
        }

        Action::SearchBackspace => {
            let mut input = state.search.input;
            input.pop();
            AppState {
                search: SearchState { input, ..state.search },
                ..state
            }
        }

        Action::NextField => AppState {
            search: SearchState {
                field: state.search.field.next(),
                ..state.search
            },
            ..state
        },

        Action::PrevField => AppState {
            search: SearchState {
                field: state.search.field.prev(),
                ..state.search
            },
            ..state
        },

        Action::ToggleExact => AppState {
            search: SearchState {
                exact_match: !state.search.exact_match,
                ..state.search
            },
            ..state
        },

        Action::CycleGenre(step) => cycle_genre(state, step),

        Action::SearchSubmitted => run_query(state, false),
        Action::RefineSubmitted => run_query(state, true),

        Action::ResetFilters => {
            let mut state = state;
            state.session.reset_filters();
            state.search.selected = 0;
            state.search.applied.clear();
            let message = format!("Showing all {} books", state.session.results().len());
            reduce(state, Action::SetStatus(message))
        }

        // === Result list ===
        Action::SelectNext => {
            let last = state.session.page().items.len().saturating_sub(1);
            AppState {
                search: SearchState {
                    selected: (state.search.selected + 1).min(last),
                    ..state.search
                },
                ..state
            }
        }

        Action::SelectPrev => AppState {
            search: SearchState {
                selected: state.search.selected.saturating_sub(1),
                ..state.search
            },
            ..state
        },

        Action::NextPage => {
            let mut state = state;
            state.session.next_page();
            state.search.selected = 0;
            state
        }

        Action::PrevPage => {
            let mut state = state;
            state.session.prev_page();
            state.search.selected = 0;
            state
        }

        Action::AddSelected => match state.selected_result() {
            Some(book) => {
                let mut state = state;
                let message = if state.session.add_to_library(&book.isbn) {
                    "Added to library!"
                } else {
                    "Already in library"
                };
                reduce(state, Action::SetStatus(message.to_string()))
            }
            None => state,
        },

        // === Library ===
        Action::MarkSelectedRead => match state.selected_library_book() {
            Some(book) => {
                let mut state = state;
                let message = if state.session.mark_read(&book.isbn) {
                    format!("Marked \"{}\" as read", book.title)
                } else {
                    format!("\"{}\" is already read", book.title)
                };
                reduce(state, Action::SetStatus(message))
            }
            None => state,
        },

        Action::RemoveSelected => match state.selected_library_book() {
            Some(book) => {
                let mut state = state;
                state.session.remove_from_library(&book.isbn);
                let remaining = state.session.library().len();
                state.library_selected = state.library_selected.min(remaining.saturating_sub(1));
                reduce(state, Action::SetStatus(format!("Removed \"{}\" from library", book.title)))
            }
            None => state,
        },

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },

        // === Status Bar ===
        Action::SetStatus(message) => AppState {
            status: StatusBarState {
                message: Some(message),
            },
            ..state
        },

        Action::ClearStatus => AppState {
            status: StatusBarState { message: None },
            ..state
        },
    }
}

/// Build filters from the form and run them
///
/// `refine` narrows the current results; otherwise the whole catalog is
/// searched. Validation failures go to the error overlay.
fn run_query(state: AppState, refine: bool) -> AppState {
    let filters = match state.search.field.to_filters(&state.search.input, state.search.exact_match) {
        Ok(filters) => filters,
        Err(e) => return reduce(state, Action::ShowError(e.to_string())),
    };

    let mut state = state;
    let outcome = if refine {
        state.session.refine_all(&filters)
    } else {
        state.session.search_all(&filters)
    };

    match outcome {
        Ok(count) => {
            if !refine {
                state.search.applied.clear();
            }
            state.search.applied.extend(filters.iter().map(ToString::to_string));
            state.search.selected = 0;
            let noun = if count == 1 { "book" } else { "books" };
            reduce(state, Action::SetStatus(format!("Found {} {}", count, noun)))
        }
        Err(e) => reduce(state, Action::ShowError(e.to_string())),
    }
}

/// Step the genre field through the catalog's genres
fn cycle_genre(state: AppState, step: i8) -> AppState {
    if state.genres.is_empty() {
        return state;
    }

    let len = state.genres.len();
    let current = libshelf::types::normalize(&state.search.input);
    let index = match state.genres.iter().position(|g| *g == current) {
        Some(i) if step >= 0 => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if step >= 0 => 0,
        None => len - 1,
    };

    let input = state.genres[index].clone();
    AppState {
        search: SearchState { input, ..state.search },
        ..state
    }
}

/// Handle keyboard input
///
/// Maps keys to high-level actions. This is where keybindings are defined.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // Global keybindings (work everywhere)
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::Quit);
        }

        // Help
        (KeyCode::F(1), _) => {
            let action = if state.help_visible { Action::HideHelp } else { Action::ShowHelp };
            return reduce(state, action);
        }

        // Navigation
        (KeyCode::F(2), _) => {
            return reduce(state, Action::NavigateTo(Screen::Library));
        }
        (KeyCode::F(3), _) => {
            return reduce(state, Action::NavigateTo(Screen::Search));
        }

        // Dismiss error
        (KeyCode::Esc, _) if state.error.is_some() => {
            return reduce(state, Action::DismissError);
        }

        // Hide help
        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::HideHelp);
        }

        _ => {}
    }

    // Overlays swallow everything else
    if state.error.is_some() || state.help_visible {
        return state;
    }

    // Screen-specific keybindings
    match state.current_screen {
        Screen::Library => handle_library_key(state, key),
        Screen::Search => handle_search_key(state, key),
    }
}

/// Handle library-specific keys
fn handle_library_key(state: AppState, key: KeyEvent) -> AppState {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => reduce(state, Action::Quit),
        (KeyCode::Char('r'), KeyModifiers::NONE) => reduce(state, Action::MarkSelectedRead),
        (KeyCode::Char('d'), KeyModifiers::NONE) => reduce(state, Action::RemoveSelected),

        (KeyCode::Down, _) => {
            let last = state.session.library().len().saturating_sub(1);
            AppState {
                library_selected: (state.library_selected + 1).min(last),
                ..state
            }
        }
        (KeyCode::Up, _) => AppState {
            library_selected: state.library_selected.saturating_sub(1),
            ..state
        },

        _ => state,
    }
}

/// Handle search-specific keys
fn handle_search_key(state: AppState, key: KeyEvent) -> AppState {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => reduce(state, Action::SearchSubmitted),
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => reduce(state, Action::RefineSubmitted),
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => reduce(state, Action::ResetFilters),
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => reduce(state, Action::ToggleExact),
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => reduce(state, Action::AddSelected),

        (KeyCode::Tab, _) => reduce(state, Action::NextField),
        (KeyCode::BackTab, _) => reduce(state, Action::PrevField),

        (KeyCode::Down, _) => reduce(state, Action::SelectNext),
        (KeyCode::Up, _) => reduce(state, Action::SelectPrev),
        (KeyCode::PageDown, _) => reduce(state, Action::NextPage),
        (KeyCode::PageUp, _) => reduce(state, Action::PrevPage),

        (KeyCode::Right, _) if state.search.field == super::SearchField::Genre => {
            reduce(state, Action::CycleGenre(1))
        }
        (KeyCode::Left, _) if state.search.field == super::SearchField::Genre => {
            reduce(state, Action::CycleGenre(-1))
        }

        (KeyCode::Backspace, _) => reduce(state, Action::SearchBackspace),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            reduce(state, Action::SearchInput(c))
        }

        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchField;
    use libshelf::{loader, ReadingStatus, Session};
    use std::sync::Arc;

    const CSV: &str = "\
isbn,title,author,rating,pages,language,genres
0439708184,Harry Potter and the Sorcerer's Stone,J.K. Rowling,4.47,309,eng,\"['Fantasy','Young Adult']\"
0439064872,Harry Potter and the Chamber of Secrets,J.K. Rowling,4.43,341,eng,\"['Fantasy', 'Fiction']\"
0061120081,To Kill a Mockingbird,Harper Lee,4.27,324,eng,\"['Classics', 'Fiction']\"
";

    fn state() -> AppState {
        let table = loader::load_from_reader(CSV.as_bytes()).unwrap();
        AppState::new(Session::new(Arc::new(table)))
    }

    fn typed(state: AppState, text: &str) -> AppState {
        text.chars().fold(state, |s, c| reduce(s, Action::SearchInput(c)))
    }

    #[test]
    fn test_reducer_leaves_input_untouched() {
        let state = state();
        let state_clone = state.clone();

        let new_state = reduce(state_clone.clone(), Action::SetStatus("Test".to_string()));

        assert!(state_clone.status.message.is_none());
        assert_eq!(new_state.status.message, Some("Test".to_string()));
    }

    #[test]
    fn test_quit_action() {
        let state = state();
        assert!(!state.should_quit);

        let new_state = reduce(state, Action::Quit);
        assert!(new_state.should_quit);
    }

    #[test]
    fn test_search_replaces_results_and_reports_count() {
        let state = typed(state(), "harry");
        let state = reduce(state, Action::SearchSubmitted);

        assert_eq!(state.session.results().len(), 2);
        assert_eq!(state.status.message, Some("Found 2 books".to_string()));
        assert_eq!(state.search.applied, vec!["title ~ \"harry\"".to_string()]);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_invalid_query_shows_error_and_keeps_results() {
        let mut state = reduce(typed(state(), "harry"), Action::SearchSubmitted);
        state.search.field = SearchField::MinPages;
        state.search.input = "many".to_string();

        let state = reduce(state, Action::SearchSubmitted);

        assert!(state.error.is_some());
        assert_eq!(state.session.results().len(), 2);
    }

    #[test]
    fn test_refine_narrows_and_records_filters() {
        let state = reduce(typed(state(), "harry"), Action::SearchSubmitted);
        let mut state = state;
        state.search.field = SearchField::MinPages;
        state.search.input = "320".to_string();

        let state = reduce(state, Action::RefineSubmitted);

        assert_eq!(state.session.results().isbns(), vec!["0439064872"]);
        assert_eq!(state.search.applied.len(), 2);
        assert_eq!(state.status.message, Some("Found 1 book".to_string()));
    }

    #[test]
    fn test_page_range_applies_both_bounds() {
        let mut state = state();
        state.search.field = SearchField::PageRange;
        let state = typed(state, "309-330");

        let state = reduce(state, Action::SearchSubmitted);

        assert_eq!(state.session.results().isbns(), vec!["0439708184", "0061120081"]);
        assert_eq!(state.search.applied, vec!["pages >= 309", "pages <= 330"]);
        assert_eq!(state.status.message, Some("Found 2 books".to_string()));
    }

    #[test]
    fn test_page_range_refines_current_results() {
        let state = reduce(typed(state(), "harry"), Action::SearchSubmitted);
        let mut state = state;
        state.search.field = SearchField::PageRange;
        state.search.input = "-320".to_string();

        let state = reduce(state, Action::RefineSubmitted);

        assert_eq!(state.session.results().isbns(), vec!["0439708184"]);
        assert_eq!(state.search.applied, vec!["title ~ \"harry\"", "pages <= 320"]);
    }

    #[test]
    fn test_malformed_page_range_shows_error() {
        let mut state = state();
        state.search.field = SearchField::PageRange;
        state.search.input = "lots".to_string();

        let state = reduce(state, Action::SearchSubmitted);

        assert!(state.error.unwrap().contains("300-400"));
        assert_eq!(state.session.results().len(), 3);
    }

    #[test]
    fn test_add_selected_twice_reports_already_in_library() {
        let state = reduce(state(), Action::AddSelected);
        assert_eq!(state.status.message, Some("Added to library!".to_string()));
        assert_eq!(state.session.status("0439708184"), Some(ReadingStatus::WantToRead));

        let state = reduce(state, Action::AddSelected);
        assert_eq!(state.status.message, Some("Already in library".to_string()));
    }

    #[test]
    fn test_library_mark_read_and_remove() {
        let state = reduce(state(), Action::SelectNext);
        let state = reduce(state, Action::AddSelected);
        let state = reduce(state, Action::NavigateTo(Screen::Library));

        let state = reduce(state, Action::MarkSelectedRead);
        assert_eq!(state.session.status("0439064872"), Some(ReadingStatus::Read));

        let state = reduce(state, Action::RemoveSelected);
        assert!(state.session.library().is_empty());
        assert_eq!(state.library_selected, 0);
    }

    #[test]
    fn test_cycle_genre_wraps_through_catalog_genres() {
        let mut state = state();
        state.search.field = SearchField::Genre;

        let state = reduce(state, Action::CycleGenre(1));
        assert_eq!(state.search.input, "classics");

        let state = reduce(state, Action::CycleGenre(-1));
        assert_eq!(state.search.input, "young adult");
    }

    #[test]
    fn test_reset_filters_shows_everything() {
        let state = reduce(typed(state(), "mockingbird"), Action::SearchSubmitted);
        assert_eq!(state.session.results().len(), 1);

        let state = reduce(state, Action::ResetFilters);
        assert_eq!(state.session.results().len(), 3);
        assert!(state.search.applied.is_empty());
    }
}
