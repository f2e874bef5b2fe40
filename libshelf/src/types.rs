//! Core types for the book catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalize text for comparison: trim surrounding whitespace and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// One row of the book table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub isbn: String,
    pub title: String,
    pub author: String,
    /// Average rating, usually within 0.0..=5.0. `None` when the dataset
    /// value was missing or not a number.
    pub rating: Option<f64>,
    /// Page count. `None` when unknown.
    pub pages: Option<u32>,
    pub language: String,
    pub genres: Genres,
}

impl BookRecord {
    /// ISBN with hyphens and spaces removed
    pub fn clean_isbn(&self) -> String {
        strip_isbn(&self.isbn)
    }
}

/// Remove the separators people put inside ISBNs.
pub fn strip_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

// ============================================================================
// Genres
// ============================================================================

/// Normalized set of genre labels attached to a book.
///
/// The dataset stores genres as a list literal such as
/// `['Fantasy', 'Young Adult']`. Parsing is tolerant: anything that cannot be
/// read as such a list yields an empty set, which matches no genre query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genres(BTreeSet<String>);

impl Genres {
    /// Parse a genre list literal, falling back to the empty set.
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_default()
    }

    /// Parse a genre list literal. Returns `None` for missing or malformed
    /// input (unbalanced brackets, unterminated quotes).
    pub fn try_parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return None;
        }

        let inner = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
            (Some(rest), true) => rest.strip_suffix(']')?,
            (None, false) => trimmed,
            _ => return None,
        };

        let mut tokens = BTreeSet::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;
        // Set once a quoted token closes; only whitespace may follow before the comma.
        let mut closed = false;

        for c in inner.chars() {
            match quote {
                Some(q) if c == q => {
                    quote = None;
                    closed = true;
                }
                Some(_) => current.push(c),
                None if c == ',' => {
                    push_token(&mut tokens, &current);
                    current.clear();
                    closed = false;
                }
                None if closed => {
                    if !c.is_whitespace() {
                        return None;
                    }
                }
                None if (c == '\'' || c == '"') && current.trim().is_empty() => {
                    current.clear();
                    quote = Some(c);
                }
                None => current.push(c),
            }
        }

        if quote.is_some() {
            return None;
        }
        push_token(&mut tokens, &current);

        Some(Self(tokens))
    }

    /// Membership test against an already normalized genre
    pub fn contains(&self, normalized_genre: &str) -> bool {
        self.0.contains(normalized_genre)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn push_token(tokens: &mut BTreeSet<String>, token: &str) {
    let token = normalize(token);
    if !token.is_empty() {
        tokens.insert(token);
    }
}

impl FromIterator<String> for Genres {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut tokens = BTreeSet::new();
        for genre in iter {
            push_token(&mut tokens, &genre);
        }
        Self(tokens)
    }
}

impl std::fmt::Display for Genres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

// ============================================================================
// Reading status
// ============================================================================

/// Progress of a book saved to the personal library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[serde(rename = "Want to Read")]
    WantToRead,
    #[serde(rename = "Read")]
    Read,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WantToRead => "Want to Read",
            Self::Read => "Read",
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
