//! Filter engine
//!
//! One predicate per search dimension. Every predicate takes a slice of rows
//! (the whole [`BookTable`](crate::BookTable) or an earlier [`ResultSet`]) and
//! returns the matching rows in source order. Predicates never mutate their
//! input, so feeding one predicate's output into the next yields the
//! intersection of both conditions.
//!
//! Query parameters are validated up front and rejected with
//! [`ShelfError::InvalidQuery`]. Data problems are not errors: a row whose
//! genre list cannot be parsed, or whose page count is unknown, simply does
//! not match predicates on that field.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::table::{Book, ResultSet};
use crate::types::{normalize, strip_isbn};

/// Filter rows by title
///
/// `exact_match` compares normalized titles for equality, otherwise the
/// normalized query must be a substring of the normalized title.
///
/// # Errors
///
/// Returns `InvalidQuery` if `query` is empty or whitespace.
pub fn by_title(rows: &[Book], query: &str, exact_match: bool) -> Result<ResultSet> {
    let query = require_text(query, "Title query")?;
    Ok(select(rows, |book| text_matches(&book.title, &query, exact_match)))
}

/// Filter rows by author, with the same matching rules as [`by_title`]
///
/// # Errors
///
/// Returns `InvalidQuery` if `query` is empty or whitespace.
pub fn by_author(rows: &[Book], query: &str, exact_match: bool) -> Result<ResultSet> {
    let query = require_text(query, "Author query")?;
    Ok(select(rows, |book| text_matches(&book.author, &query, exact_match)))
}

/// Keep rows rated at least `min_rating`. Rows without a rating never match.
///
/// # Errors
///
/// Returns `InvalidQuery` if `min_rating` is NaN or infinite.
pub fn by_minimum_rating(rows: &[Book], min_rating: f64) -> Result<ResultSet> {
    if !min_rating.is_finite() {
        return Err(ShelfError::invalid_query("Minimum rating must be a number"));
    }
    Ok(select(rows, |book| book.rating.is_some_and(|rating| rating >= min_rating)))
}

/// Keep rows whose language code equals `language` after normalization
///
/// # Errors
///
/// Returns `InvalidQuery` if `language` is empty or whitespace.
pub fn by_language(rows: &[Book], language: &str) -> Result<ResultSet> {
    let language = require_text(language, "Language")?;
    Ok(select(rows, |book| normalize(&book.language) == language))
}

/// Keep rows whose genre list contains `genre`
///
/// Rows with a missing or malformed genre list have an empty genre set and
/// therefore never match.
///
/// # Errors
///
/// Returns `InvalidQuery` if `genre` is empty or whitespace.
pub fn by_genre(rows: &[Book], genre: &str) -> Result<ResultSet> {
    let genre = require_text(genre, "Genre")?;
    Ok(select(rows, |book| book.genres.contains(&genre)))
}

/// Keep rows with at least `min_pages` pages. Unknown page counts never match.
///
/// # Errors
///
/// Returns `InvalidQuery` if `min_pages` is negative.
pub fn by_minimum_pages(rows: &[Book], min_pages: i64) -> Result<ResultSet> {
    let min_pages = require_page_count(min_pages, "Minimum pages")?;
    Ok(select(rows, |book| book.pages.is_some_and(|pages| u64::from(pages) >= min_pages)))
}

/// Keep rows with at most `max_pages` pages. Unknown page counts never match.
///
/// # Errors
///
/// Returns `InvalidQuery` if `max_pages` is negative.
pub fn by_maximum_pages(rows: &[Book], max_pages: i64) -> Result<ResultSet> {
    let max_pages = require_page_count(max_pages, "Maximum pages")?;
    Ok(select(rows, |book| book.pages.is_some_and(|pages| u64::from(pages) <= max_pages)))
}

/// Find rows by ISBN
///
/// Hyphens and spaces are ignored on both sides, so `0-439-70818-4` finds a
/// row stored as `0439708184` and the other way round. Letters compare
/// case-insensitively (ISBN-10 check digit `X`).
///
/// # Errors
///
/// Returns `InvalidQuery` if the query is empty, or if after stripping it is
/// not 10 or 13 alphanumeric characters.
pub fn by_isbn(rows: &[Book], isbn_query: &str) -> Result<ResultSet> {
    if isbn_query.trim().is_empty() {
        return Err(ShelfError::invalid_query("ISBN query must be a non-empty string"));
    }

    let query = strip_isbn(isbn_query).to_lowercase();
    let length = query.chars().count();
    if !query.chars().all(char::is_alphanumeric) || (length != 10 && length != 13) {
        return Err(ShelfError::invalid_query(
            "ISBN must be either 10 or 13 characters long and contain only letters and numbers",
        ));
    }

    Ok(select(rows, |book| book.clean_isbn().to_lowercase() == query))
}

// ============================================================================
// Parameter parsing for text front ends
// ============================================================================

/// Parse a minimum rating typed by a user
///
/// # Errors
///
/// Returns `InvalidQuery` unless the text is a finite number.
pub fn parse_min_rating(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
        .ok_or_else(|| ShelfError::invalid_query(format!("Minimum rating must be a number, got '{}'", text.trim())))
}

/// Parse a page count typed by a user
///
/// Only whole, non-negative numbers are accepted. `300.0` is rejected along
/// with `12.5`.
///
/// # Errors
///
/// Returns `InvalidQuery` for anything that is not a non-negative integer.
pub fn parse_page_count(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|pages| *pages >= 0)
        .ok_or_else(|| {
            ShelfError::invalid_query(format!(
                "Page count must be a non-negative integer, got '{}'",
                text.trim()
            ))
        })
}

// ============================================================================
// Composition
// ============================================================================

/// A single predicate with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Filter {
    Title { query: String, exact_match: bool },
    Author { query: String, exact_match: bool },
    MinRating { min_rating: f64 },
    Language { language: String },
    Genre { genre: String },
    MinPages { min_pages: i64 },
    MaxPages { max_pages: i64 },
    Isbn { isbn: String },
}

impl Filter {
    /// Apply this predicate to `rows`
    pub fn apply(&self, rows: &[Book]) -> Result<ResultSet> {
        let result = match self {
            Filter::Title { query, exact_match } => by_title(rows, query, *exact_match),
            Filter::Author { query, exact_match } => by_author(rows, query, *exact_match),
            Filter::MinRating { min_rating } => by_minimum_rating(rows, *min_rating),
            Filter::Language { language } => by_language(rows, language),
            Filter::Genre { genre } => by_genre(rows, genre),
            Filter::MinPages { min_pages } => by_minimum_pages(rows, *min_pages),
            Filter::MaxPages { max_pages } => by_maximum_pages(rows, *max_pages),
            Filter::Isbn { isbn } => by_isbn(rows, isbn),
        };

        match &result {
            Ok(matched) => tracing::debug!(filter = ?self, input = rows.len(), matched = matched.len(), "Filter applied"),
            Err(e) => tracing::debug!(filter = ?self, error = %e, "Filter rejected"),
        }

        result
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = |exact: bool| if exact { "=" } else { "~" };
        match self {
            Filter::Title { query, exact_match } => write!(f, "title {} \"{}\"", op(*exact_match), query.trim()),
            Filter::Author { query, exact_match } => write!(f, "author {} \"{}\"", op(*exact_match), query.trim()),
            Filter::MinRating { min_rating } => write!(f, "rating >= {min_rating}"),
            Filter::Language { language } => write!(f, "language = {}", language.trim()),
            Filter::Genre { genre } => write!(f, "genre = {}", genre.trim()),
            Filter::MinPages { min_pages } => write!(f, "pages >= {min_pages}"),
            Filter::MaxPages { max_pages } => write!(f, "pages <= {max_pages}"),
            Filter::Isbn { isbn } => write!(f, "isbn = {}", isbn.trim()),
        }
    }
}

/// Apply `filters` left to right, each narrowing the previous result
///
/// An empty list returns every input row.
pub fn apply_all(rows: &[Book], filters: &[Filter]) -> Result<ResultSet> {
    let mut current = ResultSet::from(rows.to_vec());
    for filter in filters {
        current = filter.apply(&current)?;
    }
    Ok(current)
}

/// Page-count filters as the interactive form builds them: a bound of 0 is
/// "no bound" and is left out.
pub fn page_range(min_pages: i64, max_pages: i64) -> Vec<Filter> {
    let mut filters = Vec::new();
    if min_pages != 0 {
        filters.push(Filter::MinPages { min_pages });
    }
    if max_pages != 0 {
        filters.push(Filter::MaxPages { max_pages });
    }
    filters
}

fn select(rows: &[Book], predicate: impl Fn(&Book) -> bool) -> ResultSet {
    rows.iter().filter(|book| predicate(book)).cloned().collect()
}

fn text_matches(field: &str, normalized_query: &str, exact_match: bool) -> bool {
    let field = normalize(field);
    if exact_match {
        field == normalized_query
    } else {
        field.contains(normalized_query)
    }
}

fn require_text(query: &str, what: &str) -> Result<String> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return Err(ShelfError::invalid_query(format!("{what} must be a non-empty string")));
    }
    Ok(normalized)
}

fn require_page_count(pages: i64, what: &str) -> Result<u64> {
    u64::try_from(pages)
        .map_err(|_| ShelfError::invalid_query(format!("{what} must be a non-negative integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BookTable;
    use crate::types::{BookRecord, Genres};

    fn record(isbn: &str, title: &str, author: &str, rating: Option<f64>, pages: Option<u32>, genres: &str) -> BookRecord {
        BookRecord {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            rating,
            pages,
            language: "eng".to_string(),
            genres: Genres::parse(genres),
        }
    }

    fn sample_table() -> BookTable {
        let mut spanish = record("8478884459", "Harry Potter y la piedra filosofal", "J.K. Rowling", Some(4.4), Some(254), "['Fantasy']");
        spanish.language = "spa".to_string();

        BookTable::from_records(vec![
            record("0439708184", "Harry Potter and the Sorcerer's Stone", "J.K. Rowling", Some(4.47), Some(309), "['Fantasy','Young Adult']"),
            record("0-06-112008-1", "To Kill a Mockingbird", "Harper Lee", Some(4.27), Some(324), "['Classics', 'Fiction']"),
            record("978-0-7432-7356-5", "The Great Gatsby", "F. Scott Fitzgerald", Some(3.93), None, "['Classics'"),
            record("0375826726", "Harry Potter Boxed Set", "J. K. Rowling", None, Some(4100), ""),
            spanish,
        ])
    }

    #[test]
    fn test_title_substring_is_case_insensitive() {
        let table = sample_table();
        let result = by_title(&table, "  HARRY potter ", false).unwrap();
        assert_eq!(result.isbns(), vec!["0439708184", "0375826726", "8478884459"]);
    }

    #[test]
    fn test_title_exact_match() {
        let table = sample_table();
        let result = by_title(&table, "the great gatsby", true).unwrap();
        assert_eq!(result.isbns(), vec!["978-0-7432-7356-5"]);

        let result = by_title(&table, "great gatsby", true).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_blank_text_queries_are_rejected() {
        let table = sample_table();
        assert!(matches!(by_title(&table, "   ", false), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_author(&table, "", true), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_language(&table, "\t"), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_genre(&table, " "), Err(ShelfError::InvalidQuery(_))));
    }

    #[test]
    fn test_author_exact_and_partial() {
        let table = sample_table();
        assert_eq!(by_author(&table, "j.k. rowling", true).unwrap().len(), 2);
        assert_eq!(by_author(&table, "rowling", false).unwrap().len(), 3);
    }

    #[test]
    fn test_minimum_rating_excludes_unrated_rows() {
        let table = sample_table();
        let result = by_minimum_rating(&table, 0.0).unwrap();
        assert_eq!(result.len(), 4);
        assert!(!result.isbns().contains(&"0375826726"));

        let result = by_minimum_rating(&table, 4.27).unwrap();
        assert_eq!(result.isbns(), vec!["0439708184", "0-06-112008-1", "8478884459"]);
    }

    #[test]
    fn test_minimum_rating_rejects_nan() {
        let table = sample_table();
        assert!(matches!(by_minimum_rating(&table, f64::NAN), Err(ShelfError::InvalidQuery(_))));
    }

    #[test]
    fn test_language_is_normalized() {
        let table = sample_table();
        assert_eq!(by_language(&table, " SPA ").unwrap().isbns(), vec!["8478884459"]);
    }

    #[test]
    fn test_genre_skips_malformed_and_missing_lists() {
        let table = sample_table();
        assert_eq!(by_genre(&table, "Fantasy").unwrap().isbns(), vec!["0439708184", "8478884459"]);
        // The Gatsby row has an unterminated list and must not match
        assert_eq!(by_genre(&table, "classics").unwrap().isbns(), vec!["0-06-112008-1"]);
    }

    #[test]
    fn test_page_bounds_skip_unknown_page_counts() {
        let table = sample_table();
        assert_eq!(by_minimum_pages(&table, 0).unwrap().len(), 4);
        assert_eq!(by_maximum_pages(&table, 309).unwrap().isbns(), vec!["0439708184", "8478884459"]);
        assert!(matches!(by_minimum_pages(&table, -1), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_maximum_pages(&table, -5), Err(ShelfError::InvalidQuery(_))));
    }

    #[test]
    fn test_isbn_ignores_hyphens_on_both_sides() {
        let table = sample_table();
        assert_eq!(by_isbn(&table, "0-439-70818-4").unwrap().isbns(), vec!["0439708184"]);
        assert_eq!(by_isbn(&table, "0061120081").unwrap().isbns(), vec!["0-06-112008-1"]);
        assert_eq!(by_isbn(&table, "978 0743273565").unwrap().isbns(), vec!["978-0-7432-7356-5"]);
    }

    #[test]
    fn test_isbn_validation() {
        let table = sample_table();
        assert!(matches!(by_isbn(&table, ""), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_isbn(&table, "12345"), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(by_isbn(&table, "043970818!"), Err(ShelfError::InvalidQuery(_))));
        assert!(by_isbn(&table, "123456789X").unwrap().is_empty());
    }

    #[test]
    fn test_parse_min_rating() {
        assert_eq!(parse_min_rating(" 3.5 ").unwrap(), 3.5);
        assert!(matches!(parse_min_rating("four"), Err(ShelfError::InvalidQuery(_))));
        assert!(matches!(parse_min_rating("NaN"), Err(ShelfError::InvalidQuery(_))));
    }

    #[test]
    fn test_parse_page_count_rejects_fractions_and_negatives() {
        assert_eq!(parse_page_count("300").unwrap(), 300);
        assert!(parse_page_count("300.0").is_err());
        assert!(parse_page_count("12.5").is_err());
        assert!(parse_page_count("-1").is_err());
        assert!(parse_page_count("").is_err());
    }

    #[test]
    fn test_apply_all_intersects() {
        let table = sample_table();
        let filters = vec![
            Filter::Author { query: "rowling".to_string(), exact_match: false },
            Filter::MinPages { min_pages: 300 },
            Filter::MaxPages { max_pages: 1000 },
        ];
        assert_eq!(apply_all(&table, &filters).unwrap().isbns(), vec!["0439708184"]);
    }

    #[test]
    fn test_apply_all_with_no_filters_returns_input() {
        let table = sample_table();
        assert_eq!(apply_all(&table, &[]).unwrap().len(), table.len());
    }

    #[test]
    fn test_apply_all_stops_at_first_invalid_filter() {
        let table = sample_table();
        let filters = vec![
            Filter::Genre { genre: "fantasy".to_string() },
            Filter::Isbn { isbn: "abc".to_string() },
        ];
        assert!(matches!(apply_all(&table, &filters), Err(ShelfError::InvalidQuery(_))));
    }

    #[test]
    fn test_page_range_skips_zero_bounds() {
        assert!(page_range(0, 0).is_empty());
        assert_eq!(page_range(100, 0), vec![Filter::MinPages { min_pages: 100 }]);
        assert_eq!(
            page_range(100, 500),
            vec![Filter::MinPages { min_pages: 100 }, Filter::MaxPages { max_pages: 500 }]
        );
    }

    #[test]
    fn test_filter_display() {
        let title = Filter::Title { query: " Dune ".to_string(), exact_match: false };
        assert_eq!(title.to_string(), "title ~ \"Dune\"");
        assert_eq!(Filter::MinRating { min_rating: 4.5 }.to_string(), "rating >= 4.5");
        assert_eq!(Filter::MaxPages { max_pages: 300 }.to_string(), "pages <= 300");
    }

    #[test]
    fn test_input_rows_are_untouched() {
        let table = sample_table();
        let before = table.all();
        let _ = by_title(&table, "harry", false).unwrap();
        assert_eq!(table.all(), before);
    }
}
