// 📄 Report Rendering - HTML/JSON export plus the console search table
//
// Both surfaces project the catalog through the same cartesian expansion:
// every reading of an entry is attributed to every file in its source set
// (see CatalogEntry::records). Output labels stay in Russian to match the
// price lists themselves.

use crate::catalog::{CatalogEntry, PriceCatalog, PriceRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::Path;

/// Fixed output names, next to the working directory of the run
pub const HTML_REPORT_FILE: &str = "output.html";
pub const JSON_EXPORT_FILE: &str = "output.json";

// ============================================================================
// HTML REPORT
// ============================================================================

/// Render the full catalog as a standalone HTML document.
///
/// Row numbers are assigned per reading, not per expanded row: the rows
/// fanned out over an entry's source files share the number of the reading
/// they came from. Numbering starts at 1 and follows catalog order.
pub fn render_html(catalog: &PriceCatalog) -> String {
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Позиции продуктов</title>\n\
         </head>\n<body>\n",
    );
    let _ = writeln!(html, "<!-- generated {} -->", Utc::now().to_rfc3339());
    html.push_str(
        "<table>\n<tr>\n\
         <th>Номер</th>\n<th>Название</th>\n\
         <th>Цена</th>\n<th>Фасовка</th>\n\
         <th>Файл</th>\n<th>Цена за кг.</th>\n</tr>\n",
    );

    let mut number = 1;
    for entry in catalog.entries() {
        for point in &entry.prices {
            let metric = point.price_per_weight();
            for source in &entry.sources {
                let _ = writeln!(
                    html,
                    "\t<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                    number, entry.product, point.price, point.weight, source, metric
                );
            }
            number += 1;
        }
    }

    html.push_str("\n</table>\n</body>\n</html>");
    html
}

/// Write the HTML report to `path`.
pub fn export_html(catalog: &PriceCatalog, path: &Path) -> Result<()> {
    std::fs::write(path, render_html(catalog))
        .with_context(|| format!("failed to write HTML report to {}", path.display()))
}

// ============================================================================
// JSON EXPORT
// ============================================================================

#[derive(Serialize)]
struct CatalogExport<'a> {
    generated_at: DateTime<Utc>,
    products: &'a [CatalogEntry],
}

/// Write the catalog as pretty-printed JSON to `path`.
pub fn export_json(catalog: &PriceCatalog, path: &Path) -> Result<()> {
    let export = CatalogExport {
        generated_at: Utc::now(),
        products: catalog.entries(),
    };
    let json = serde_json::to_string_pretty(&export).context("failed to serialize catalog")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write JSON export to {}", path.display()))
}

// ============================================================================
// SEARCH TABLE
// ============================================================================

/// Expand matched entries, sort by price-per-weight, render a fixed-width
/// table. The 1-based index is assigned after sorting; the sort is stable,
/// so equal metrics keep their insertion order.
pub fn render_search_table(matches: &[&CatalogEntry]) -> String {
    let mut records: Vec<PriceRecord> =
        matches.iter().flat_map(|entry| entry.records()).collect();
    records.sort_by(|a, b| {
        a.price_per_weight
            .partial_cmp(&b.price_per_weight)
            .unwrap_or(Ordering::Equal)
    });

    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<3} {:<30} {:<10} {:<5} {:<20} {:<10}",
        "№", "Наименование", "Цена", "Вес", "Файл", "Цена за кг."
    );
    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            table,
            "{:<3} {:<30} {:<10} {:<5} {:<20} {:<10.2}",
            index + 1,
            record.product,
            record.price,
            record.weight,
            record.source,
            record.price_per_weight
        );
    }
    table
}
