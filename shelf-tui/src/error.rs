//! Error types for shelf-tui
//!
//! Wraps core errors and terminal/IO errors for unified handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Core library error (dataset, configuration)
    #[error("{0}")]
    Core(#[from] libshelf::ShelfError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Application state error
    #[error("Application error: {0}")]
    Application(String),
}

impl TuiError {
    /// Process exit code, following the core's conventions
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Core(e) => e.exit_code(),
            TuiError::Terminal(_) | TuiError::Application(_) => 1,
        }
    }
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;
