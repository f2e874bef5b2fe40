//! shelf-tui library
//!
//! Exports types and modules for testing and potential reuse.

pub mod error;
pub mod app;
pub mod terminal;
pub mod ui;

use std::sync::Arc;

use libshelf::{loader, Config, Session};

// Re-export commonly used types
pub use error::{TuiError, Result};
pub use app::{AppState, Action, Screen, reduce};

/// Load the catalog named by `config` and build the first frame's state
///
/// Runs before the terminal is switched into raw mode, so a missing or
/// malformed dataset is reported on a normal screen.
pub fn initial_state(config: &Config) -> Result<AppState> {
    let table = Arc::new(loader::load_default(config)?);
    let session = Session::with_page_size(table, config.display.items_per_page);
    Ok(AppState::new(session))
}
