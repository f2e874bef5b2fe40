//! CLI integration tests for shelf-find

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DATASET: &str = "\
isbn,title,author,rating,pages,language,genres
0439708184,Harry Potter and the Sorcerer's Stone,J.K. Rowling,4.47,309,eng,\"['Fantasy','Young Adult']\"
0439064872,Harry Potter and the Chamber of Secrets,J.K. Rowling,4.43,341,eng,\"['Fantasy', 'Young Adult', 'Fiction']\"
0061120081,To Kill a Mockingbird,Harper Lee,4.27,324,eng,\"['Classics', 'Fiction']\"
0743273565,The Great Gatsby,F. Scott Fitzgerald,3.93,,eng,\"['Classics', 'Fiction'\"
978-0-452-28423-4,Nineteen Eighty-Four,George Orwell,4.19,328.0,eng,\"['Classics', 'Science Fiction', 'Dystopia']\"
2070612759,Harry Potter a l'ecole des sorciers,J.K. Rowling,4.47,308,fre,\"['Fantasy']\"
";

/// Helper to escape path for TOML on Windows
fn escape_path_for_toml(path: &str) -> String {
    path.replace('\\', "\\\\")
}

/// Helper to create a test environment with config and dataset
fn setup_test_env(items_per_page: usize) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();

    let data_path = temp_dir.path().join("books_dataset_cleaned.csv");
    fs::write(&data_path, DATASET).unwrap();

    let config_path = temp_dir.path().join("config.toml");
    let config_content = format!(
        r#"
[data]
path = "{}"

[display]
items_per_page = {}
"#,
        escape_path_for_toml(&data_path.to_string_lossy()),
        items_per_page
    );
    fs::write(&config_path, config_content).unwrap();

    (temp_dir, config_path.to_string_lossy().to_string())
}

fn shelf_find(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("shelf-find").unwrap();
    cmd.env("SHELF_CONFIG", config_path).env_remove("SHELF_DATA");
    cmd
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("shelf-find").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search the book catalog"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_filters_lists_first_page() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nineteen Eighty-Four"))
        .stdout(predicate::str::contains("-- page 1 of 1 (6 books) --"));
}

#[test]
fn test_title_search_is_case_insensitive_substring() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--title", "HARRY potter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0439708184"))
        .stdout(predicate::str::contains("2070612759"))
        .stdout(predicate::str::contains("Mockingbird").not());
}

#[test]
fn test_filters_are_intersected() {
    let (_dir, config) = setup_test_env(10);

    let output = shelf_find(&config)
        .args(["--author", "rowling", "--language", "eng", "--min-pages", "320", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], "0439064872");
}

#[test]
fn test_exact_author_match() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--author", "harper", "--exact"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    shelf_find(&config)
        .args(["--author", "harper lee", "--exact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To Kill a Mockingbird"));
}

#[test]
fn test_isbn_lookup_ignores_hyphens() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--isbn", "9780452284234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("George Orwell"));
}

#[test]
fn test_invalid_isbn_exits_3() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--isbn", "123"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("10 or 13"));
}

#[test]
fn test_non_numeric_page_count_exits_3() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--max-pages", "three hundred"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid query"));
}

#[test]
fn test_missing_dataset_exits_2() {
    let (dir, config) = setup_test_env(10);
    let missing = dir.path().join("missing.csv");

    shelf_find(&config)
        .args(["--data", missing.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn test_shelf_data_env_overrides_config() {
    let (dir, config) = setup_test_env(10);
    let other = dir.path().join("other.csv");
    fs::write(&other, "isbn,title,author,rating,pages,language,genres\n1,Dune,Frank Herbert,4.25,604,eng,\n").unwrap();

    let mut cmd = Command::cargo_bin("shelf-find").unwrap();
    cmd.env("SHELF_CONFIG", &config)
        .env("SHELF_DATA", &other)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("(1 book)"));
}

#[test]
fn test_empty_results_exit_0() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--genre", "horror"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_paging_uses_config_page_size() {
    let (_dir, config) = setup_test_env(4);

    shelf_find(&config)
        .args(["--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- page 2 of 2 (6 books) --"))
        .stdout(predicate::str::contains("Nineteen Eighty-Four"))
        .stdout(predicate::str::contains("Sorcerer's Stone").not());
}

#[test]
fn test_page_past_end_is_empty() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--page", "9", "--format", "jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_jsonl_one_book_per_line() {
    let (_dir, config) = setup_test_env(10);

    let output = shelf_find(&config)
        .args(["--genre", "classics", "--format", "jsonl"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let book: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(book["genres"].as_array().unwrap().iter().any(|g| g == "classics"));
    }
}

#[test]
fn test_csv_output_has_header_and_joined_genres() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--title", "sorcerer", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("isbn,title,author,rating,pages,language,genres"))
        .stdout(predicate::str::contains("0439708184,Harry Potter and the Sorcerer's Stone,J.K. Rowling,4.47,309,eng,fantasy;young adult"));
}

#[test]
fn test_unknown_values_are_null_in_json() {
    let (_dir, config) = setup_test_env(10);

    let output = shelf_find(&config)
        .args(["--title", "gatsby", "--format", "json"])
        .output()
        .unwrap();

    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(books[0]["pages"].is_null());
    assert_eq!(books[0]["genres"].as_array().unwrap().len(), 0);
}

#[test]
fn test_list_genres() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .arg("--list-genres")
        .assert()
        .success()
        .stdout("classics\ndystopia\nfantasy\nfiction\nscience fiction\nyoung adult\n");
}

#[test]
fn test_invalid_format_rejected() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_zero_per_page_exits_3() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--per-page", "0", "--format", "json"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--per-page must be a positive integer"));
}

#[test]
fn test_per_page_flag_overrides_config() {
    let (_dir, config) = setup_test_env(10);

    shelf_find(&config)
        .args(["--per-page", "4", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- page 2 of 2 (6 books) --"));
}

#[test]
fn test_config_error_cause_is_printed_once() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[data\npath = ").unwrap();

    let output = shelf_find(&config_path.to_string_lossy())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("Failed to parse config").count(), 1, "{}", stderr);
    assert!(stderr.starts_with("Error: Configuration error: Failed to parse config:"));
}
