//! Directory scanning and header detection.
//!
//! The scan is best-effort: an unreadable storage root yields an empty
//! catalog, and a malformed file never aborts the scan of the others.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

/// Candidate delimiters, in tie-breaking precedence order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// File extensions considered tabular.
const TABULAR_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

// =============================================================================
// DatasetCatalog
// =============================================================================

/// Mapping from dataset filename to its ordered column names.
///
/// Backed by a `BTreeMap` so listings and file lookups are deterministic
/// across scans of the same directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCatalog(BTreeMap<String, Vec<String>>);

impl DatasetCatalog {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Column names for a file, if it is in the catalog.
    pub fn columns(&self, file: &str) -> Option<&[String]> {
        self.0.get(file).map(|c| c.as_slice())
    }

    /// Whether any catalogued file has a column with this exact name.
    pub fn contains_column(&self, name: &str) -> bool {
        self.0.values().any(|cols| cols.iter().any(|c| c == name))
    }

    /// First file (in filename order) whose columns contain every given name.
    pub fn locate(&self, names: &[&str]) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, cols)| names.iter().all(|n| cols.iter().any(|c| c == n)))
            .map(|(file, _)| file.as_str())
    }

    /// User-presentable listing of files and their columns.
    pub fn listing(&self) -> String {
        let mut out = String::from("Available datasets and their columns:\n");
        for (file, cols) in &self.0 {
            out.push_str(&format!("- {}: {}\n", file, cols.join(", ")));
        }
        out
    }

    /// JSON rendering (filename -> column list) for embedding in prompts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    fn insert(&mut self, file: String, columns: Vec<String>) {
        self.0.insert(file, columns);
    }
}

// =============================================================================
// DatasetIndex
// =============================================================================

/// Scans a storage directory for tabular files with header rows.
///
/// The root is injected explicitly so tests can point it at a temporary
/// directory; nothing is read from process-global state.
pub struct DatasetIndex {
    root: PathBuf,
}

impl DatasetIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build an index rooted at the configured storage directory.
    pub fn from_config(config: &statchat_core::config::StorageConfig) -> Self {
        Self::new(&config.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build a fresh catalog from the storage directory.
    ///
    /// Fails softly: an unreadable root yields an empty catalog, and files
    /// that cannot be read or whose first line looks like data are skipped.
    pub fn scan(&self) -> DatasetCatalog {
        let mut catalog = DatasetCatalog::default();

        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "Storage root unreadable; catalog is empty");
                return catalog;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(e) => e.path(),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !path.is_file() || !has_tabular_extension(&path) {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            match read_first_line(&path) {
                Ok(Some(line)) => {
                    let delimiter = guess_delimiter(&line);
                    let columns: Vec<String> =
                        line.split(delimiter).map(|c| c.trim().to_string()).collect();
                    if is_header(&columns) {
                        catalog.insert(name, columns);
                    } else {
                        debug!(file = %name, "First line looks like data; excluded from catalog");
                    }
                }
                Ok(None) => {
                    debug!(file = %name, "Empty file; excluded from catalog");
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "Failed to read first line; skipping");
                }
            }
        }

        catalog
    }
}

/// Guess the field delimiter of a line.
///
/// Picks whichever candidate yields the most splits; ties go to the earlier
/// entry in [`DELIMITERS`].
pub fn guess_delimiter(line: &str) -> char {
    let mut best = DELIMITERS[0];
    let mut max_count = 0;
    for delimiter in DELIMITERS {
        let count = line.matches(delimiter).count();
        if count > max_count {
            max_count = count;
            best = delimiter;
        }
    }
    best
}

/// Classify split tokens as a header row.
///
/// A line is a header only if a strict majority of its tokens fail to parse
/// as a number.
pub fn is_header(tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let non_numeric = tokens
        .iter()
        .filter(|t| t.trim().parse::<f64>().is_err())
        .count();
    non_numeric * 2 > tokens.len()
}

fn has_tabular_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            TABULAR_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Read only the first line of a file; `None` for an empty file.
fn read_first_line(path: &Path) -> std::io::Result<Option<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    // ---- Delimiter guessing ----

    #[test]
    fn test_guess_delimiter_comma_majority() {
        // comma appears 3 times, semicolon once
        assert_eq!(guess_delimiter("a,b;c,d,e"), ',');
    }

    #[test]
    fn test_guess_delimiter_semicolon() {
        assert_eq!(guess_delimiter("a;b;c"), ';');
    }

    #[test]
    fn test_guess_delimiter_tab() {
        assert_eq!(guess_delimiter("a\tb\tc\td"), '\t');
    }

    #[test]
    fn test_guess_delimiter_pipe() {
        assert_eq!(guess_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_guess_delimiter_tie_prefers_precedence_order() {
        // One comma, one semicolon: comma wins by precedence.
        assert_eq!(guess_delimiter("a,b;c"), ',');
        // One semicolon, one pipe: semicolon wins.
        assert_eq!(guess_delimiter("a;b|c"), ';');
    }

    #[test]
    fn test_guess_delimiter_no_delimiters_defaults_to_comma() {
        assert_eq!(guess_delimiter("justonecolumn"), ',');
    }

    // ---- Header classification ----

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_numeric_line_is_not_header() {
        assert!(!is_header(&tokens(&["1", "2", "3"])));
    }

    #[test]
    fn test_all_text_line_is_header() {
        assert!(is_header(&tokens(&["SqFt", "Price"])));
    }

    #[test]
    fn test_strict_majority_required() {
        // 1 of 2 non-numeric: not a strict majority.
        assert!(!is_header(&tokens(&["Price", "42"])));
        // 2 of 3 non-numeric: strict majority.
        assert!(is_header(&tokens(&["Price", "SqFt", "42"])));
    }

    #[test]
    fn test_float_tokens_count_as_numeric() {
        assert!(!is_header(&tokens(&["1.5", "-2.0", "3e4"])));
    }

    #[test]
    fn test_empty_token_list_is_not_header() {
        assert!(!is_header(&[]));
    }

    // ---- Scan ----

    #[test]
    fn test_scan_unreadable_root_yields_empty_catalog() {
        let index = DatasetIndex::new("/definitely/not/a/real/dir");
        let catalog = index.scan();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_scan_indexes_header_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "housing.csv", "SqFt,Price,YearBuilt\n1200,250000,1990\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.columns("housing.csv").unwrap(),
            &["SqFt", "Price", "YearBuilt"]
        );
    }

    #[test]
    fn test_scan_excludes_headerless_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "raw.csv", "1,2,3\n4,5,6\n");
        write_file(dir.path(), "named.csv", "SqFt,Price\n1,2\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.columns("raw.csv").is_none());
        assert!(catalog.columns("named.csv").is_some());
    }

    #[test]
    fn test_scan_ignores_unrecognized_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "notes.md", "SqFt,Price\n");
        write_file(dir.path(), "data.csv", "SqFt,Price\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.columns("data.csv").is_some());
    }

    #[test]
    fn test_scan_skips_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "empty.csv", "");
        write_file(dir.path(), "data.csv", "A,B\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_scan_semicolon_delimited_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "euro.csv", "Region;Sales;Year\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(
            catalog.columns("euro.csv").unwrap(),
            &["Region", "Sales", "Year"]
        );
    }

    #[test]
    fn test_scan_tsv_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "data.tsv", "Age\tIncome\tEducation\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(
            catalog.columns("data.tsv").unwrap(),
            &["Age", "Income", "Education"]
        );
    }

    #[test]
    fn test_scan_trims_crlf_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "win.csv", "SqFt, Price \r\n1,2\r\n");
        let catalog = DatasetIndex::new(dir.path()).scan();
        assert_eq!(catalog.columns("win.csv").unwrap(), &["SqFt", "Price"]);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.csv", "X,Y\n");
        write_file(dir.path(), "a.csv", "P,Q\n");
        let index = DatasetIndex::new(dir.path());
        assert_eq!(index.scan(), index.scan());
    }

    // ---- Catalog queries ----

    fn sample_catalog() -> DatasetCatalog {
        let mut c = DatasetCatalog::default();
        c.insert(
            "housing.csv".to_string(),
            tokens(&["SqFt", "Price", "YearBuilt"]),
        );
        c.insert("wages.csv".to_string(), tokens(&["Age", "Wage"]));
        c
    }

    #[test]
    fn test_contains_column() {
        let c = sample_catalog();
        assert!(c.contains_column("SqFt"));
        assert!(c.contains_column("Wage"));
        assert!(!c.contains_column("sqft")); // exact match only
        assert!(!c.contains_column("Bedrooms"));
    }

    #[test]
    fn test_locate_finds_file_with_all_columns() {
        let c = sample_catalog();
        assert_eq!(c.locate(&["SqFt", "Price"]), Some("housing.csv"));
        assert_eq!(c.locate(&["Age", "Wage"]), Some("wages.csv"));
        // Columns split across files: no single match.
        assert_eq!(c.locate(&["SqFt", "Wage"]), None);
    }

    #[test]
    fn test_listing_mentions_every_file_and_column() {
        let c = sample_catalog();
        let listing = c.listing();
        assert!(listing.contains("housing.csv"));
        assert!(listing.contains("wages.csv"));
        assert!(listing.contains("YearBuilt"));
    }

    #[test]
    fn test_to_json_shape() {
        let c = sample_catalog();
        let parsed: serde_json::Value = serde_json::from_str(&c.to_json()).unwrap();
        assert_eq!(parsed["wages.csv"][1], "Wage");
    }
}
