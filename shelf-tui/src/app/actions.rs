//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. This module defines
//! all possible actions that can modify application state.

use crossterm::event::KeyEvent;
use libshelf::{filter, Filter, Result, ShelfError};

/// Actions that trigger state transitions
///
/// Actions describe what should happen; the reducer (see `reducer.rs`)
/// applies them to state.
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    /// Navigate to a different screen
    NavigateTo(Screen),

    /// Quit the application
    Quit,

    /// Show help overlay
    ShowHelp,

    /// Hide help overlay
    HideHelp,

    // === Search form ===
    /// Character typed into the query box
    SearchInput(char),

    /// Delete the last character of the query
    SearchBackspace,

    /// Select the next / previous search field
    NextField,
    PrevField,

    /// Toggle exact matching for title and author
    ToggleExact,

    /// Step through known genres (+1 forward, -1 back)
    CycleGenre(i8),

    /// Run the query against the whole catalog
    SearchSubmitted,

    /// Run the query against the current results
    RefineSubmitted,

    /// Show every book again
    ResetFilters,

    // === Result list ===
    SelectNext,
    SelectPrev,
    NextPage,
    PrevPage,

    /// Save the selected search result to the library
    AddSelected,

    // === Library ===
    /// Mark the selected library book as read
    MarkSelectedRead,

    /// Remove the selected library book
    RemoveSelected,

    // === Error Handling ===
    /// Show error overlay
    ShowError(String),

    /// Dismiss error overlay
    DismissError,

    // === Status Bar ===
    /// Update status message
    SetStatus(String),

    /// Clear status message
    ClearStatus,
}

/// Screen/View identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Saved books with their reading status
    Library,

    /// Catalog search and results
    Search,
}

/// Which dimension the query box searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    MinRating,
    MinPages,
    MaxPages,
    /// Both page bounds at once, typed as `min-max`
    PageRange,
    Genre,
    Isbn,
    Language,
}

impl SearchField {
    pub const ALL: [SearchField; 9] = [
        SearchField::Title,
        SearchField::Author,
        SearchField::MinRating,
        SearchField::MinPages,
        SearchField::MaxPages,
        SearchField::PageRange,
        SearchField::Genre,
        SearchField::Isbn,
        SearchField::Language,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::MinRating => "Min rating",
            SearchField::MinPages => "Min pages",
            SearchField::MaxPages => "Max pages",
            SearchField::PageRange => "Pages (min-max)",
            SearchField::Genre => "Genre",
            SearchField::Isbn => "ISBN",
            SearchField::Language => "Language",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the exact-match toggle applies to this field
    pub fn supports_exact(&self) -> bool {
        matches!(self, SearchField::Title | SearchField::Author)
    }

    /// Build the filters for this field from the text typed by the user
    ///
    /// Every field gives one filter except the page range, which gives one
    /// per bound.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` when numeric fields do not hold a valid number.
    /// Text fields are validated when the filter runs.
    pub fn to_filters(&self, input: &str, exact_match: bool) -> Result<Vec<Filter>> {
        let text = input.to_string();
        let filter = match self {
            SearchField::Title => Filter::Title { query: text, exact_match },
            SearchField::Author => Filter::Author { query: text, exact_match },
            SearchField::MinRating => Filter::MinRating { min_rating: filter::parse_min_rating(input)? },
            SearchField::MinPages => Filter::MinPages { min_pages: filter::parse_page_count(input)? },
            SearchField::MaxPages => Filter::MaxPages { max_pages: filter::parse_page_count(input)? },
            SearchField::PageRange => return parse_page_range(input),
            SearchField::Genre => Filter::Genre { genre: text },
            SearchField::Isbn => Filter::Isbn { isbn: text },
            SearchField::Language => Filter::Language { language: text },
        };
        Ok(vec![filter])
    }
}

/// Parse `300-400`, `300-` or `-400` into page-count filters
///
/// A missing or zero bound is left open; at least one bound must be set.
fn parse_page_range(input: &str) -> Result<Vec<Filter>> {
    let Some((min, max)) = input.split_once('-') else {
        return Err(ShelfError::InvalidQuery(format!(
            "Page range must look like 300-400, got '{}'",
            input.trim()
        )));
    };

    let bound = |text: &str| match text.trim() {
        "" => Ok(0),
        text => filter::parse_page_count(text),
    };

    let filters = filter::page_range(bound(min)?, bound(max)?);
    if filters.is_empty() {
        return Err(ShelfError::InvalidQuery(
            "Page range needs a minimum, a maximum or both".to_string(),
        ));
    }
    Ok(filters)
}
