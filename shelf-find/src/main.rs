//! shelf-find - Search the book catalog from the command line

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use libshelf::{
    filter::{self, Filter},
    loader, BookRecord, Config, Session, ShelfError,
};

#[derive(Parser, Debug)]
#[command(name = "shelf-find")]
#[command(version, about = "Search the book catalog")]
#[command(long_about = r#"Search the book catalog with composable filters and formatting options.

Filters given together are intersected: a book must pass every one.

EXAMPLES:
    # First page of the whole catalog
    shelf-find

    # Substring title search (case-insensitive)
    shelf-find --title "harry potter"

    # Exact title or author match
    shelf-find --title "The Hobbit" --exact

    # Well rated fantasy between 300 and 400 pages
    shelf-find --genre fantasy --min-rating 4.2 --min-pages 300 --max-pages 400

    # Look up an ISBN (hyphens and spaces are ignored)
    shelf-find --isbn 0-439-70818-4

    # Page through results
    shelf-find --author rowling --page 2 --per-page 5

    # JSON output for scripting
    shelf-find --genre classics --format json | jq '.[] | .title'

    # Export to CSV
    shelf-find --language eng --per-page 1000 --format csv > english.csv

    # Genres known to the catalog
    shelf-find --list-genres

OUTPUT FORMATS:
    text  - One book per line followed by a page footer (default)
    json  - JSON array of the books on the page
    jsonl - JSON lines, one book per line (streaming-friendly)
    csv   - CSV with headers (spreadsheet-compatible)

ENVIRONMENT:
    SHELF_CONFIG      Config file (default: ~/.config/shelf/config.toml)
    SHELF_DATA        Dataset path, overriding the config file
    SHELF_LOG_FORMAT  Log format on stderr: text, json or pretty
    SHELF_LOG_LEVEL   Log level (default: warn)

EXIT CODES:
    0 - Success (including empty results)
    1 - Error (bad config, unreadable dataset)
    2 - Dataset not found
    3 - Invalid query
"#)]
struct Args {
    /// Books whose title contains this text
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Books whose author contains this text
    #[arg(long, value_name = "TEXT")]
    author: Option<String>,

    /// Title and author must match exactly (ignoring case)
    #[arg(long)]
    exact: bool,

    /// Minimum average rating
    #[arg(long, value_name = "RATING")]
    min_rating: Option<String>,

    /// Language code, e.g. eng
    #[arg(long, value_name = "CODE")]
    language: Option<String>,

    /// Books tagged with this genre
    #[arg(long, value_name = "GENRE")]
    genre: Option<String>,

    /// Minimum page count
    #[arg(long, value_name = "N")]
    min_pages: Option<String>,

    /// Maximum page count
    #[arg(long, value_name = "N")]
    max_pages: Option<String>,

    /// 10 or 13 character ISBN
    #[arg(long, value_name = "ISBN")]
    isbn: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value = "1", value_name = "N")]
    page: usize,

    /// Books per page (default: display.items_per_page from config)
    #[arg(long, value_name = "N")]
    per_page: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "jsonl", "csv"])]
    format: String,

    /// Print every genre in the catalog and exit
    #[arg(long)]
    list_genres: bool,

    /// Dataset path, overriding the config file and SHELF_DATA
    #[arg(long, value_name = "PATH")]
    data: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Filters in the order they are applied
    fn filters(&self) -> libshelf::Result<Vec<Filter>> {
        let mut filters = Vec::new();

        if let Some(ref query) = self.title {
            filters.push(Filter::Title { query: query.clone(), exact_match: self.exact });
        }
        if let Some(ref query) = self.author {
            filters.push(Filter::Author { query: query.clone(), exact_match: self.exact });
        }
        if let Some(ref text) = self.min_rating {
            filters.push(Filter::MinRating { min_rating: filter::parse_min_rating(text)? });
        }
        if let Some(ref language) = self.language {
            filters.push(Filter::Language { language: language.clone() });
        }
        if let Some(ref genre) = self.genre {
            filters.push(Filter::Genre { genre: genre.clone() });
        }
        if let Some(ref text) = self.min_pages {
            filters.push(Filter::MinPages { min_pages: filter::parse_page_count(text)? });
        }
        if let Some(ref text) = self.max_pages {
            filters.push(Filter::MaxPages { max_pages: filter::parse_page_count(text)? });
        }
        if let Some(ref isbn) = self.isbn {
            filters.push(Filter::Isbn { isbn: isbn.clone() });
        }

        Ok(filters)
    }

    /// Rows per page: `--per-page` when given, else the configured size
    fn page_size(&self, config: &Config) -> libshelf::Result<usize> {
        match self.per_page {
            Some(0) => Err(ShelfError::InvalidQuery(
                "--per-page must be a positive integer".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(config.display.items_per_page),
        }
    }
}

fn main() {
    let args = Args::parse();

    libshelf::logging::config_from_env(args.verbose).init();
    tracing::debug!("shelf-find started with args: {:?}", args);

    // Core errors already carry their cause in the message
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Exit code for a failed run, taken from the core error when there is one
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ShelfError>()
        .map(ShelfError::exit_code)
        .unwrap_or(1)
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(ref path) = args.data {
        config.data.path = path.clone();
    }

    // Validate the query before paying for the dataset load
    let filters = args.filters()?;
    let per_page = args.page_size(&config)?;

    let table = Arc::new(loader::load_default(&config)?);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.list_genres {
        return write_genres(&mut out, &table.genres(), &args.format);
    }

    let mut session = Session::with_page_size(table, per_page);
    let found = session.search_all(&filters)?;
    tracing::debug!(found, filters = filters.len(), "Search finished");

    // Unlike the interactive pager, a page past the end prints nothing
    let page = libshelf::paginate(session.results().rows(), args.page, session.items_per_page());
    let books: Vec<&BookRecord> = page.items.iter().map(|book| book.as_ref()).collect();

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&books)?;
            writeln!(out, "{}", json)?;
        }
        "jsonl" => {
            for book in &books {
                writeln!(out, "{}", serde_json::to_string(book)?)?;
            }
        }
        "csv" => write_csv(&mut out, &books)?,
        _ => {
            // Empty results - output nothing and exit 0
            if books.is_empty() {
                return Ok(());
            }

            for book in &books {
                writeln!(out, "{}", text_line(book))?;
            }
            let noun = if page.total_items == 1 { "book" } else { "books" };
            writeln!(
                out,
                "-- page {} of {} ({} {}) --",
                page.number, page.total_pages, page.total_items, noun
            )?;
        }
    }

    Ok(())
}

fn text_line(book: &BookRecord) -> String {
    let rating = book.rating.map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".to_string());
    let pages = book.pages.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | {} | {} | {} pages | {} | {}",
        book.isbn, book.title, book.author, rating, pages, book.language, book.genres
    )
}

fn write_csv<W: Write>(out: W, books: &[&BookRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["isbn", "title", "author", "rating", "pages", "language", "genres"])?;

    for book in books {
        let genres: Vec<&str> = book.genres.iter().collect();
        writer.write_record([
            book.isbn.clone(),
            book.title.clone(),
            book.author.clone(),
            book.rating.map(|r| r.to_string()).unwrap_or_default(),
            book.pages.map(|p| p.to_string()).unwrap_or_default(),
            book.language.clone(),
            genres.join(";"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_genres<W: Write>(out: &mut W, genres: &[String], format: &str) -> Result<()> {
    match format {
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(genres)?)?,
        "jsonl" => {
            for genre in genres {
                writeln!(out, "{}", serde_json::to_string(genre)?)?;
            }
        }
        "csv" => {
            writeln!(out, "genre")?;
            let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(&mut *out);
            for genre in genres {
                writer.write_record([genre])?;
            }
            writer.flush()?;
        }
        _ => {
            for genre in genres {
                writeln!(out, "{}", genre)?;
            }
        }
    }
    Ok(())
}
