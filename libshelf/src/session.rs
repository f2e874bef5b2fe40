//! Per-user browsing session
//!
//! Holds everything that lives for one user's interaction: the reading
//! library, the current result set and the page cursor. The book table is
//! shared read-only, so any number of sessions can browse the same table.

use std::sync::Arc;

use crate::error::Result;
use crate::filter::{self, Filter};
use crate::library::Library;
use crate::pager::{self, Page, DEFAULT_ITEMS_PER_PAGE};
use crate::table::{Book, BookTable, ResultSet};
use crate::types::ReadingStatus;

#[derive(Debug, Clone)]
pub struct Session {
    table: Arc<BookTable>,
    library: Library,
    results: ResultSet,
    current_page: usize,
    items_per_page: usize,
}

impl Session {
    /// Start a session with the default page size
    pub fn new(table: Arc<BookTable>) -> Self {
        Self::with_page_size(table, DEFAULT_ITEMS_PER_PAGE)
    }

    /// Start a session showing `items_per_page` rows per page (at least 1)
    pub fn with_page_size(table: Arc<BookTable>, items_per_page: usize) -> Self {
        let results = table.all();
        Self {
            table,
            library: Library::new(),
            results,
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Return to a fresh session: empty library, all books, first page
    pub fn reset(&mut self) {
        self.library = Library::new();
        self.results = self.table.all();
        self.current_page = 1;
    }

    pub fn table(&self) -> &BookTable {
        &self.table
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.results.len(), self.items_per_page)
    }

    // === Queries ===

    /// Run `filter` against the whole table
    ///
    /// On error the current results and page are kept.
    pub fn search(&mut self, filter: &Filter) -> Result<usize> {
        let results = filter.apply(&self.table)?;
        Ok(self.show(results))
    }

    /// Run `filters` in sequence against the whole table
    pub fn search_all(&mut self, filters: &[Filter]) -> Result<usize> {
        let results = filter::apply_all(&self.table, filters)?;
        Ok(self.show(results))
    }

    /// Narrow the current results with `filter`
    pub fn refine(&mut self, filter: &Filter) -> Result<usize> {
        let results = filter.apply(&self.results)?;
        Ok(self.show(results))
    }

    /// Narrow the current results with each of `filters` in turn
    pub fn refine_all(&mut self, filters: &[Filter]) -> Result<usize> {
        let results = filter::apply_all(&self.results, filters)?;
        Ok(self.show(results))
    }

    /// Show every book again
    pub fn reset_filters(&mut self) {
        self.show(self.table.all());
    }

    fn show(&mut self, results: ResultSet) -> usize {
        self.results = results;
        self.current_page = 1;
        tracing::debug!(results = self.results.len(), pages = self.total_pages(), "Result set replaced");
        self.results.len()
    }

    // === Paging ===

    /// The page under the cursor
    pub fn page(&self) -> Page<'_, Book> {
        pager::paginate(self.results.rows(), self.current_page, self.items_per_page)
    }

    /// Move to page `page`, clamped to the valid range
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    // === Library ===

    pub fn add_to_library(&mut self, isbn: &str) -> bool {
        self.library.add(isbn)
    }

    pub fn mark_read(&mut self, isbn: &str) -> bool {
        self.library.mark_read(isbn)
    }

    pub fn remove_from_library(&mut self, isbn: &str) -> bool {
        self.library.remove(isbn)
    }

    pub fn status(&self, isbn: &str) -> Option<ReadingStatus> {
        self.library.status(isbn)
    }

    /// Saved books joined against the table, in table order
    pub fn library_books(&self) -> ResultSet {
        self.library.books(&self.table)
    }
}
