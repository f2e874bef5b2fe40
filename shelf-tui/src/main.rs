//! shelf-tui - Terminal UI for browsing a book catalog
//!
//! Search the catalog by title, author, rating, page count, genre, ISBN or
//! language, page through the results, and keep a reading library.

use shelf_tui::{
    app::{event::EventHandler, reduce, Action},
    error::Result,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui, AppState,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    init_logging()?;

    // Load everything before touching the terminal
    let config = libshelf::Config::load()?;
    let state = shelf_tui::initial_state(&config)?;
    tracing::info!(books = state.session.table().len(), "Catalog loaded");

    // Install panic hook to restore terminal on panic
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, state);
    restore_terminal(terminal)?;

    result
}

/// Send logs to the file named by `SHELF_TUI_LOG`, if any
///
/// The screen belongs to the UI, so without that variable nothing is logged.
fn init_logging() -> Result<()> {
    if let Ok(path) = std::env::var("SHELF_TUI_LOG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(shellexpand::tilde(&path).to_string())?;
        libshelf::logging::config_from_env(false).init_to_file(file);
    }
    Ok(())
}

fn run_app(terminal: &mut Tui, mut state: AppState) -> Result<()> {
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    loop {
        terminal.draw(|frame| ui::render(frame, &state))?;

        let action: Action = event_handler.next()?.into();
        state = reduce(state, action);

        if state.should_quit {
            break;
        }
    }

    tracing::info!(saved = state.session.library().len(), "Leaving");
    Ok(())
}
