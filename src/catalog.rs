// 🧾 Price Catalog - merged in-memory view of every ingested price list
//
// One entry per exact product name. An entry accumulates (price, weight)
// readings from every file that mentions the product; the source set keeps
// one file stem per contributor no matter how many rows it supplied.
// Entries live for a single run only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized comparison metric: price per unit of weight.
///
/// Division by zero is defined away: a zero weight yields 0.0 so a
/// malformed reading can never fault the sort or the report.
pub fn price_per_weight(price: f64, weight: f64) -> f64 {
    if weight > 0.0 {
        price / weight
    } else {
        0.0
    }
}

// ============================================================================
// DATA MODEL
// ============================================================================

/// PricePoint - one observed (price, weight) reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub weight: f64,
}

impl PricePoint {
    pub fn price_per_weight(&self) -> f64 {
        price_per_weight(self.price, self.weight)
    }
}

/// CatalogEntry - one product's aggregated readings across all files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product name, used verbatim as the merge key (case-sensitive)
    pub product: String,

    /// Readings in ingestion order
    pub prices: Vec<PricePoint>,

    /// Contributing file stems. Set semantics, first-seen order.
    pub sources: Vec<String>,
}

impl CatalogEntry {
    fn new(product: &str) -> Self {
        CatalogEntry {
            product: product.to_string(),
            prices: Vec::new(),
            sources: Vec::new(),
        }
    }

    fn add(&mut self, point: PricePoint, source: &str) {
        self.prices.push(point);
        if !self.sources.iter().any(|s| s == source) {
            self.sources.push(source.to_string());
        }
    }

    /// Expand this entry's readings against its source set.
    ///
    /// The merge keys on product name alone and drops the reading→file
    /// link, so every reading is attributed to every contributing file:
    /// 2 readings from 2 files expand to 4 records.
    pub fn records(&self) -> Vec<PriceRecord> {
        let mut records = Vec::with_capacity(self.prices.len() * self.sources.len());
        for point in &self.prices {
            for source in &self.sources {
                records.push(PriceRecord {
                    product: self.product.clone(),
                    price: point.price,
                    weight: point.weight,
                    source: source.clone(),
                    price_per_weight: point.price_per_weight(),
                });
            }
        }
        records
    }
}

/// PriceRecord - derived row for reporting and search display, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub product: String,
    pub price: f64,
    pub weight: f64,
    pub source: String,
    pub price_per_weight: f64,
}

// ============================================================================
// CATALOG
// ============================================================================

/// PriceCatalog - insertion-ordered product map
///
/// Owned by the run and passed explicitly to ingestion, search and
/// rendering; there is no global state. The side index keeps upsert O(1)
/// while the entry vector preserves first-encounter order for iteration.
pub struct PriceCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        PriceCatalog {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Upsert one reading: append to the existing entry for this exact
    /// product name, or create a new entry on first encounter.
    pub fn record(&mut self, product: &str, price: f64, weight: f64, source: &str) {
        let point = PricePoint { price, weight };
        match self.index.get(product).copied() {
            Some(slot) => self.entries[slot].add(point, source),
            None => {
                let mut entry = CatalogEntry::new(product);
                entry.add(point, source);
                self.index.insert(product.to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in first-encounter order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, product: &str) -> Option<&CatalogEntry> {
        self.index.get(product).map(|&slot| &self.entries[slot])
    }

    /// Case-insensitive substring search over product names.
    ///
    /// Results come back in catalog insertion order, unsorted; ordering by
    /// the price metric happens at display time.
    pub fn search(&self, term: &str) -> Vec<&CatalogEntry> {
        let needle = term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.product.to_lowercase().contains(&needle))
            .collect()
    }
}

impl Default for PriceCatalog {
    fn default() -> Self {
        PriceCatalog::new()
    }
}
