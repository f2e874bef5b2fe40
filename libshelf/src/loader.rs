//! Dataset loader
//!
//! Reads the book CSV (columns `isbn, title, author, rating, pages, language,
//! genres`; extra columns are ignored) into a [`BookTable`]. Field parsing is
//! tolerant: bad ratings and page counts become unknown values and bad genre
//! lists become empty sets, so the affected rows simply drop out of the
//! predicates on those fields.

use std::path::Path;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{DataError, Result, ShelfError};
use crate::table::BookTable;
use crate::types::{BookRecord, Genres};

/// Columns the dataset must provide
pub const REQUIRED_COLUMNS: [&str; 7] = ["isbn", "title", "author", "rating", "pages", "language", "genres"];

/// A CSV row before field cleanup
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    pages: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    genres: Option<String>,
}

/// Load the dataset configured in `config`
pub fn load_default(config: &Config) -> Result<BookTable> {
    load_books(&config.dataset_path())
}

/// Load the dataset at `path`
///
/// # Errors
///
/// - `DataUnavailable` if there is no file at `path`
/// - `Data(MissingColumn)` if the header lacks a required column
/// - `Data(Csv)` if the file cannot be read as CSV
pub fn load_books(path: &Path) -> Result<BookTable> {
    if !path.is_file() {
        return Err(ShelfError::DataUnavailable(format!(
            "Dataset not found at {}",
            path.display()
        )));
    }

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)
        .map_err(DataError::Csv)?;

    let table = read_books(reader)?;
    tracing::info!(path = %path.display(), books = table.len(), "Loaded book dataset");
    Ok(table)
}

/// Load a dataset from any reader, e.g. an in-memory CSV
pub fn load_from_reader<R: std::io::Read>(input: R) -> Result<BookTable> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(input);
    read_books(reader)
}

fn read_books<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<BookTable> {
    let headers = reader.headers().map_err(DataError::Csv)?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn(column.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.map_err(DataError::Csv)?;
        match into_record(row) {
            Some(record) => records.push(record),
            None => tracing::warn!(row = line + 1, "Skipping row without an ISBN"),
        }
    }

    Ok(BookTable::from_records(records))
}

fn into_record(row: RawRow) -> Option<BookRecord> {
    let isbn = row.isbn.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())?;

    Some(BookRecord {
        isbn,
        title: row.title.unwrap_or_default(),
        author: row.author.unwrap_or_default(),
        rating: row.rating.as_deref().and_then(parse_rating),
        pages: row.pages.as_deref().and_then(parse_pages),
        language: row.language.unwrap_or_default(),
        genres: row.genres.as_deref().map(Genres::parse).unwrap_or_default(),
    })
}

fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|rating| rating.is_finite())
}

/// Page counts arrive as `309` or, after a trip through a dataframe, `309.0`.
fn parse_pages(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}
