//! Immutable in-memory book table and the result sets derived from it

use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Deref;
use std::sync::Arc;

use crate::types::{strip_isbn, BookRecord};

/// A book row shared between the table and any number of result sets
pub type Book = Arc<BookRecord>;

/// The loaded dataset.
///
/// Rows keep source order and ISBNs are unique once hyphens, spaces and
/// letter case are ignored. The table is never mutated
/// after construction, so it can be shared behind an `Arc` by every session.
#[derive(Debug, Clone, Default)]
pub struct BookTable {
    rows: Vec<Book>,
    by_isbn: HashMap<String, usize>,
}

impl BookTable {
    /// Build a table from records in source order.
    ///
    /// When an ISBN repeats, the first row wins and later rows are dropped.
    /// `0-439-70818-4` repeats `0439708184`.
    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Self {
        let mut rows = Vec::new();
        let mut by_isbn = HashMap::new();

        for record in records {
            let key = isbn_key(&record.isbn);
            if by_isbn.contains_key(&key) {
                tracing::warn!(isbn = %record.isbn, title = %record.title, "Dropping row with duplicate ISBN");
                continue;
            }
            by_isbn.insert(key, rows.len());
            rows.push(Arc::new(record));
        }

        Self { rows, by_isbn }
    }

    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by ISBN, ignoring hyphens, spaces and case
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.by_isbn.get(&isbn_key(isbn)).map(|&idx| &self.rows[idx])
    }

    /// The whole table as a result set
    pub fn all(&self) -> ResultSet {
        ResultSet::from(self.rows.clone())
    }

    /// Rows whose ISBN is in `isbns`, in table order
    pub fn select<'a, I>(&self, isbns: I) -> ResultSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = isbns.into_iter().collect();
        self.rows
            .iter()
            .filter(|book| wanted.contains(book.isbn.as_str()))
            .cloned()
            .collect()
    }

    /// Every genre that appears in the table, normalized and sorted
    pub fn genres(&self) -> Vec<String> {
        let all: BTreeSet<&str> = self.rows.iter().flat_map(|book| book.genres.iter()).collect();
        all.into_iter().map(str::to_string).collect()
    }
}

impl Deref for BookTable {
    type Target = [Book];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

/// Ordered subsequence of the table produced by a query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Book>,
}

impl ResultSet {
    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    /// ISBNs in result order
    pub fn isbns(&self) -> Vec<&str> {
        self.rows.iter().map(|book| book.isbn.as_str()).collect()
    }
}

impl Deref for ResultSet {
    type Target = [Book];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl From<Vec<Book>> for ResultSet {
    fn from(rows: Vec<Book>) -> Self {
        Self { rows }
    }
}

impl FromIterator<Book> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Identity of an ISBN: separators dropped, letters lowercased
fn isbn_key(isbn: &str) -> String {
    strip_isbn(isbn).to_lowercase()
}
