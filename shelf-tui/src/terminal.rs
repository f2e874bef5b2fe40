//! Terminal management
//!
//! The catalog is loaded before anything here runs, so a bad dataset is
//! reported on a normal screen. Once raw mode is on, both a normal exit and
//! a panic go back through `leave_screen`.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switch to raw mode on the alternate screen with the cursor hidden
///
/// If the screen cannot be entered, raw mode is switched off again before
/// the error is returned.
pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the shell's screen
///
/// Raw mode is switched off even when leaving the alternate screen fails.
pub fn restore_terminal(mut terminal: Tui) -> Result<()> {
    let left = leave_screen(terminal.backend_mut());
    disable_raw_mode()?;
    left?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
///
/// The panic is also written to the `SHELF_TUI_LOG` file when one is open.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = leave_screen(io::stdout());
        tracing::error!(panic = %panic_info, "shelf-tui panicked");

        original_hook(panic_info);
    }));
}

/// Leave the alternate screen and show the cursor again
fn leave_screen<W: Write>(mut out: W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)
}
