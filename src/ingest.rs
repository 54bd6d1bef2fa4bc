// 📂 Price List Ingestion - discovers qualifying CSV files and fills the catalog
//
// A qualifying file has a .csv extension and the whole word "price" in its
// stem: "shop1_price" and "price list" qualify, "overpriced" and
// "shop1prices" do not. Files are processed in filename order so repeated
// runs over the same directory produce identical catalogs.
//
// Error policy is skip-and-continue: a malformed row or an unreadable file
// is warned about and counted, never fatal. Only an unreadable data
// directory aborts the run.

use crate::catalog::PriceCatalog;
use crate::columns::ColumnMap;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Stem filter: the word "price" delimited by non-alphanumerics or the
/// stem edges. Underscores and digits separate words here, unlike the
/// regex `\b` class, so "shop1_price" qualifies while "shop1prices" and
/// "overpriced" do not.
const PRICE_WORD_PATTERN: &str = r"(?:^|[^\pL\pN])price(?:[^\pL\pN]|$)";

// ============================================================================
// INGEST REPORT
// ============================================================================

/// Per-run ingestion counters, returned to the caller for the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Qualifying files discovered
    pub files_scanned: usize,

    /// Files whose rows were ingested
    pub files_ingested: usize,

    /// Files skipped: unresolvable columns or an I/O failure
    pub files_skipped: usize,

    /// Rows upserted into the catalog
    pub rows_ingested: usize,

    /// Rows skipped: missing fields or non-numeric price/weight
    pub rows_skipped: usize,
}

enum FileOutcome {
    Ingested { rows: usize, skipped: usize },
    MissingColumns,
}

// ============================================================================
// INGESTOR
// ============================================================================

/// Ingestor - scans one directory of supplier price lists into a catalog
pub struct Ingestor {
    directory: PathBuf,
    word_filter: Regex,
}

impl Ingestor {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Result<Ingestor> {
        let word_filter =
            Regex::new(PRICE_WORD_PATTERN).context("invalid price-word filter pattern")?;
        Ok(Ingestor {
            directory: directory.into(),
            word_filter,
        })
    }

    /// Ingest every qualifying file in the directory into `catalog`.
    pub fn run(&self, catalog: &mut PriceCatalog) -> Result<IngestReport> {
        let files = self.qualifying_files()?;

        let mut report = IngestReport {
            files_scanned: files.len(),
            ..IngestReport::default()
        };

        for path in &files {
            let stem = file_stem(path);
            match self.ingest_file(path, &stem, catalog) {
                Ok(FileOutcome::Ingested { rows, skipped }) => {
                    report.files_ingested += 1;
                    report.rows_ingested += rows;
                    report.rows_skipped += skipped;
                }
                Ok(FileOutcome::MissingColumns) => {
                    // Not an error: the file simply is not a price list we
                    // know how to read
                    eprintln!("⚠️  {}: required columns not found, file skipped", stem);
                    report.files_skipped += 1;
                }
                Err(err) => {
                    eprintln!("⚠️  {}: {:#}, file skipped", stem, err);
                    report.files_skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Whole-word check used by file discovery, exposed for reuse
    pub fn is_price_stem(&self, stem: &str) -> bool {
        self.word_filter.is_match(stem)
    }

    /// CSV files under the directory whose stem names a price list,
    /// sorted by path for a deterministic run.
    fn qualifying_files(&self) -> Result<Vec<PathBuf>> {
        let dir = std::fs::read_dir(&self.directory).with_context(|| {
            format!("failed to read price directory {}", self.directory.display())
        })?;

        let mut files = Vec::new();
        for entry in dir {
            let entry = entry.with_context(|| {
                format!("failed to list price directory {}", self.directory.display())
            })?;
            let path = entry.path();
            if !path.is_file() || !has_csv_extension(&path) {
                continue;
            }
            if self.is_price_stem(&file_stem(&path)) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    fn ingest_file(
        &self,
        path: &Path,
        stem: &str,
        catalog: &mut PriceCatalog,
    ) -> Result<FileOutcome> {
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header row of {}", path.display()))?
            .clone();

        let map = match ColumnMap::detect(headers.iter()) {
            Some(map) => map,
            None => return Ok(FileOutcome::MissingColumns),
        };

        let mut rows = 0;
        let mut skipped = 0;

        for (line, result) in reader.records().enumerate() {
            // +2: line numbers are 1-based and the header occupies line 1
            let line_number = line + 2;

            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    eprintln!("⚠️  {} line {}: unreadable row ({}), row skipped", stem, line_number, err);
                    skipped += 1;
                    continue;
                }
            };

            let product = record.get(map.product);
            let price = record.get(map.price).and_then(parse_number);
            let weight = record.get(map.weight).and_then(parse_number);

            match (product, price, weight) {
                (Some(product), Some(price), Some(weight)) => {
                    catalog.record(product, price, weight, stem);
                    rows += 1;
                }
                _ => {
                    eprintln!(
                        "⚠️  {} line {}: missing or non-numeric price/weight, row skipped",
                        stem, line_number
                    );
                    skipped += 1;
                }
            }
        }

        Ok(FileOutcome::Ingested { rows, skipped })
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    fn run_ingest(dir: &TempDir) -> (PriceCatalog, IngestReport) {
        let mut catalog = PriceCatalog::new();
        let ingestor = Ingestor::new(dir.path()).unwrap();
        let report = ingestor.run(&mut catalog).unwrap();
        (catalog, report)
    }

    #[test]
    fn test_merge_across_two_shops() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "shop1_price.csv", "название;цена;вес\nМолоко;80;1\n");
        write_file(&dir, "shop2_price.csv", "товар;розница;масса\nМолоко;90;2\n");

        let (catalog, report) = run_ingest(&dir);

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_ingested, 2);
        assert_eq!(report.rows_ingested, 2);
        assert_eq!(catalog.len(), 1);

        let entry = catalog.get("Молоко").unwrap();
        assert_eq!(entry.prices.len(), 2);
        assert_eq!(entry.prices[0].price, 80.0);
        assert_eq!(entry.prices[0].weight, 1.0);
        assert_eq!(entry.prices[1].price, 90.0);
        assert_eq!(entry.prices[1].weight, 2.0);
        assert_eq!(entry.sources, vec!["shop1_price", "shop2_price"]);
    }

    #[test]
    fn test_file_without_weight_column_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "shop1_price.csv", "название;цена\nМолоко;80\n");

        let (catalog, report) = run_ingest(&dir);

        assert!(catalog.is_empty());
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_ingested, 0);
        assert_eq!(report.files_skipped, 1);
    }

    #[test]
    fn test_non_qualifying_filenames_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "overpriced.csv", "название;цена;вес\nМолоко;80;1\n");
        write_file(&dir, "shop1prices.csv", "название;цена;вес\nМолоко;80;1\n");
        write_file(&dir, "price.txt", "название;цена;вес\nМолоко;80;1\n");

        let (catalog, report) = run_ingest(&dir);

        assert!(catalog.is_empty());
        assert_eq!(report.files_scanned, 0);
    }

    #[test]
    fn test_price_stem_word_boundaries() {
        let dir = TempDir::new().unwrap();
        let ingestor = Ingestor::new(dir.path()).unwrap();

        assert!(ingestor.is_price_stem("price"));
        assert!(ingestor.is_price_stem("shop1_price"));
        assert!(ingestor.is_price_stem("price list 7"));
        assert!(ingestor.is_price_stem("price-2024"));

        assert!(!ingestor.is_price_stem("overpriced"));
        assert!(!ingestor.is_price_stem("prices"));
        assert!(!ingestor.is_price_stem("shop1prices"));
        assert!(!ingestor.is_price_stem("Price")); // case-sensitive, like the column synonyms
    }

    #[test]
    fn test_malformed_row_is_skipped_rest_ingested() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "shop1_price.csv",
            "название;цена;вес\nМолоко;80;1\nСыр;дорого;0.5\nХлеб;40;0.4\n",
        );

        let (catalog, report) = run_ingest(&dir);

        assert_eq!(report.rows_ingested, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("Сыр").is_none());
        assert!(catalog.get("Хлеб").is_some());
    }

    #[test]
    fn test_short_row_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "shop1_price.csv", "название;цена;вес\nМолоко;80\n");

        let (catalog, report) = run_ingest(&dir);

        assert!(catalog.is_empty());
        assert_eq!(report.rows_skipped, 1);
    }

    #[test]
    fn test_product_name_used_verbatim() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "shop1_price.csv", "название;цена;вес\n Молоко ;80;1\n");

        let (catalog, _) = run_ingest(&dir);

        assert!(catalog.get("Молоко").is_none());
        assert!(catalog.get(" Молоко ").is_some());
    }

    #[test]
    fn test_empty_directory_yields_empty_catalog() {
        let dir = TempDir::new().unwrap();

        let (catalog, report) = run_ingest(&dir);

        assert!(catalog.is_empty());
        assert_eq!(report, IngestReport::default());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("no_such_dir");

        let mut catalog = PriceCatalog::new();
        let ingestor = Ingestor::new(gone).unwrap();

        assert!(ingestor.run(&mut catalog).is_err());
    }

    #[test]
    fn test_files_processed_in_filename_order() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "b_price.csv", "название;цена;вес\nМолоко;90;1\n");
        write_file(&dir, "a_price.csv", "название;цена;вес\nМолоко;80;1\n");

        let (catalog, _) = run_ingest(&dir);

        let entry = catalog.get("Молоко").unwrap();
        assert_eq!(entry.sources, vec!["a_price", "b_price"]);
        assert_eq!(entry.prices[0].price, 80.0);
    }
}
