//! Application state
//!
//! All state transitions happen through the reducer (see `reducer.rs`).
//! The catalog itself lives in the shared, read-only book table inside the
//! session; everything else here is per-user view state.

use libshelf::{Book, Session};

use super::actions::{Screen, SearchField};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Should the application quit?
    pub should_quit: bool,

    /// Current active screen
    pub current_screen: Screen,

    /// Help overlay visible?
    pub help_visible: bool,

    /// Library, current results and page cursor
    pub session: Session,

    /// Search screen state
    pub search: SearchState,

    /// Selected row on the library screen
    pub library_selected: usize,

    /// Every genre in the catalog, for the genre picker
    pub genres: Vec<String>,

    /// Status bar state
    pub status: StatusBarState,

    /// Error overlay state
    pub error: Option<String>,

    /// UI configuration
    pub config: UiConfig,
}

/// Search screen state
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Field the query box searches
    pub field: SearchField,

    /// Query text as typed
    pub input: String,

    /// Exact match for title and author
    pub exact_match: bool,

    /// Selected row within the current page
    pub selected: usize,

    /// Filters that produced the current results, most recent last
    pub applied: Vec<String>,
}

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Current status message
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Use colors?
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            field: SearchField::Title,
            input: String::new(),
            exact_match: false,
            selected: 0,
            applied: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err()
            && std::env::var("SHELF_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("SHELF_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
        }
    }
}

impl AppState {
    /// Create application state around a fresh session
    pub fn new(session: Session) -> Self {
        let genres = session.table().genres();
        Self {
            should_quit: false,
            current_screen: Screen::Search,
            help_visible: false,
            session,
            search: SearchState::default(),
            library_selected: 0,
            genres,
            status: StatusBarState::default(),
            error: None,
            config: UiConfig::default(),
        }
    }

    /// Book under the cursor on the search screen
    pub fn selected_result(&self) -> Option<Book> {
        self.session.page().items.get(self.search.selected).cloned()
    }

    /// Book under the cursor on the library screen
    pub fn selected_library_book(&self) -> Option<Book> {
        self.session.library_books().rows().get(self.library_selected).cloned()
    }
}
