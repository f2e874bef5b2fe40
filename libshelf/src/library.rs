//! Personal reading library
//!
//! Maps ISBNs to a [`ReadingStatus`]. A book is either absent, saved as
//! "Want to Read", or marked "Read":
//!
//! ```text
//! (absent) --add--> WantToRead --mark_read--> Read
//!     ^                 |                      |
//!     +-----remove------+----------remove------+
//! ```
//!
//! There is no way back from `Read` to `WantToRead`. Every operation is total:
//! calls that do not apply to the current state are no-ops and report `false`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::{BookTable, ResultSet};
use crate::types::ReadingStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    entries: BTreeMap<String, ReadingStatus>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a book as "Want to Read". Returns `true` if it was not saved before.
    ///
    /// Adding a book that is already saved leaves its status alone, so a
    /// `Read` book is never downgraded.
    pub fn add(&mut self, isbn: &str) -> bool {
        if self.entries.contains_key(isbn) {
            return false;
        }
        self.entries.insert(isbn.to_string(), ReadingStatus::WantToRead);
        tracing::debug!(isbn, "Added to library");
        true
    }

    /// Move a saved book from "Want to Read" to "Read". Returns `true` on transition.
    pub fn mark_read(&mut self, isbn: &str) -> bool {
        match self.entries.get_mut(isbn) {
            Some(status) if *status == ReadingStatus::WantToRead => {
                *status = ReadingStatus::Read;
                tracing::debug!(isbn, "Marked as read");
                true
            }
            _ => false,
        }
    }

    /// Drop a book from the library. Returns `true` if it was present.
    pub fn remove(&mut self, isbn: &str) -> bool {
        let removed = self.entries.remove(isbn).is_some();
        if removed {
            tracing::debug!(isbn, "Removed from library");
        }
        removed
    }

    /// Status of a book; `None` means it is not in the library
    pub fn status(&self, isbn: &str) -> Option<ReadingStatus> {
        self.entries.get(isbn).copied()
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.entries.contains_key(isbn)
    }

    /// Every saved ISBN, sorted
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Saved ISBNs with their status
    pub fn entries(&self) -> impl Iterator<Item = (&str, ReadingStatus)> {
        self.entries.iter().map(|(isbn, status)| (isbn.as_str(), *status))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of saved books with the given status
    pub fn count(&self, status: ReadingStatus) -> usize {
        self.entries.values().filter(|s| **s == status).count()
    }

    /// Rows of `table` that are saved in this library, in table order
    pub fn books(&self, table: &BookTable) -> ResultSet {
        table.select(self.all())
    }
}
