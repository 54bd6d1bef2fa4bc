use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use price_catalog::{
    export_html, export_json, render_search_table, Ingestor, PriceCatalog, HTML_REPORT_FILE,
    JSON_EXPORT_FILE,
};

/// Data directory scanned when none is given on the command line
const DEFAULT_DIRECTORY: &str = "files";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let directory = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DIRECTORY);

    println!("🧾 Price Catalog - merging supplier price lists");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Ingest every qualifying price list
    println!("\n📂 Scanning {} for price lists...", directory);
    let mut catalog = PriceCatalog::new();
    let ingestor = Ingestor::new(directory)?;
    let stats = ingestor.run(&mut catalog)?;
    println!(
        "✓ Ingested {} of {} qualifying files ({} rows, {} rows skipped)",
        stats.files_ingested, stats.files_scanned, stats.rows_ingested, stats.rows_skipped
    );
    println!("✓ Catalog holds {} products", catalog.len());

    // 2. Export the merged catalog
    export_html(&catalog, Path::new(HTML_REPORT_FILE))?;
    println!("\n📄 HTML report written to {}", HTML_REPORT_FILE);
    export_json(&catalog, Path::new(JSON_EXPORT_FILE))?;
    println!("📄 JSON export written to {}", JSON_EXPORT_FILE);

    // 3. Interactive search
    run_search_loop(&catalog)?;

    println!("\n✅ Done");
    Ok(())
}

/// Read-search-print loop. The exact line "exit" (or end of input) ends
/// the session; anything else is a search term.
fn run_search_loop(catalog: &PriceCatalog) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nEnter a search term ('exit' to quit): ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        if line == "exit" {
            break;
        }

        let matches = catalog.search(&line);
        println!("{} product(s) matched", matches.len());
        print!("{}", render_search_table(&matches));
    }

    Ok(())
}
