//! Application module
//!
//! Contains the core application architecture:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: (State, Action) -> State
//!
//! Rendering and the event loop sit outside this module and only read state.

pub mod actions;
pub mod state;
pub mod reducer;
pub mod event;

// Re-export commonly used types
pub use actions::{Action, Screen, SearchField};
pub use state::{AppState, SearchState, StatusBarState, UiConfig};
pub use reducer::reduce;
