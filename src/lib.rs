// Price Catalog Aggregator - Core Library
// Exposes all modules for use in the CLI and tests

pub mod catalog;
pub mod columns;
pub mod ingest;
pub mod report;

// Re-export commonly used types
pub use catalog::{price_per_weight, CatalogEntry, PriceCatalog, PricePoint, PriceRecord};
pub use columns::{ColumnMap, ColumnRole};
pub use ingest::{IngestReport, Ingestor};
pub use report::{
    export_html, export_json, render_html, render_search_table, HTML_REPORT_FILE, JSON_EXPORT_FILE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
