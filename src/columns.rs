// Column Reconciliation - maps heterogeneous CSV headers onto semantic roles
//
// Supplier price lists never agree on naming: one file says "название",
// another "товар", a third "наименование". Every file must expose three
// roles (product, price, weight); matching is exact and case-sensitive
// against a fixed synonym set per role.

use serde::{Deserialize, Serialize};

// ============================================================================
// COLUMN ROLES
// ============================================================================

/// ColumnRole - the three semantic fields every price list must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    Product,
    Price,
    Weight,
}

impl ColumnRole {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            ColumnRole::Product => "product",
            ColumnRole::Price => "price",
            ColumnRole::Weight => "weight",
        }
    }

    /// Recognized header spellings for this role (exact, case-sensitive)
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Product => &["название", "продукт", "товар", "наименование"],
            ColumnRole::Price => &["цена", "розница"],
            ColumnRole::Weight => &["фасовка", "масса", "вес"],
        }
    }

    /// Classify a single header cell, if it matches any role
    pub fn of_header(header: &str) -> Option<ColumnRole> {
        [ColumnRole::Product, ColumnRole::Price, ColumnRole::Weight]
            .into_iter()
            .find(|role| role.synonyms().contains(&header))
    }
}

// ============================================================================
// COLUMN MAP
// ============================================================================

/// ColumnMap - zero-based positions of the three roles within one file
///
/// Candidates are tracked as `Option<usize>` during the scan, so a role
/// resolved to column 0 can never be mistaken for "column missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub product: usize,
    pub price: usize,
    pub weight: usize,
}

impl ColumnMap {
    /// Scan a header row left to right and resolve all three roles.
    ///
    /// When the same role matches more than one header, the rightmost
    /// occurrence wins. Returns `None` when any role has no matching
    /// header; the caller is expected to skip the whole file.
    pub fn detect<'a, I>(headers: I) -> Option<ColumnMap>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut product: Option<usize> = None;
        let mut price: Option<usize> = None;
        let mut weight: Option<usize> = None;

        for (index, header) in headers.into_iter().enumerate() {
            match ColumnRole::of_header(header) {
                Some(ColumnRole::Product) => product = Some(index),
                Some(ColumnRole::Price) => price = Some(index),
                Some(ColumnRole::Weight) => weight = Some(index),
                None => {}
            }
        }

        Some(ColumnMap {
            product: product?,
            price: price?,
            weight: weight?,
        })
    }
}
