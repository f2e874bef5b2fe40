//! Shelf - browse a book catalog and keep a reading library
//!
//! This library holds everything below the presentation layer: the immutable
//! book table and its loader, the filter engine, the reading library, the
//! pager, and the per-user session that ties them together.

pub mod config;
pub mod error;
pub mod filter;
pub mod library;
pub mod loader;
pub mod logging;
pub mod pager;
pub mod session;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ShelfError, Result};
pub use filter::Filter;
pub use library::Library;
pub use pager::{paginate, Page};
pub use session::Session;
pub use table::{Book, BookTable, ResultSet};
pub use types::{BookRecord, Genres, ReadingStatus};
