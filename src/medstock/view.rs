//! # View Projection
//!
//! Derives what a UI should show from the product collection: the products that pass
//! the category filter and name search, in stored order, each tagged with a
//! [`VisualState`] computed against "today".
//!
//! Nothing here mutates or stores anything; the projection is recomputed on demand.

use crate::error::{Result, StockError};
use crate::model::{Category, Product};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// The category tab a user has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todas" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

/// Render-time alert level of a product. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    Expired,
    Critical,
    Normal,
}

/// Expiry wins over stock: an expired product is `Expired` even when out of stock.
pub fn classify(product: &Product, today: NaiveDate) -> VisualState {
    match product.expiry_date {
        Some(expiry) if expiry < today => VisualState::Expired,
        _ if product.quantity == 0 => VisualState::Critical,
        _ => VisualState::Normal,
    }
}

/// The current local calendar date, time of day dropped.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedProduct {
    pub product: Product,
    pub state: VisualState,
}

/// Result of a projection. `Empty` is returned instead of an empty list so callers
/// render an empty-state message explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Empty,
    Listed(Vec<ProjectedProduct>),
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Projection::Empty)
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn items(&self) -> &[ProjectedProduct] {
        match self {
            Projection::Empty => &[],
            Projection::Listed(items) => items,
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.items().iter().map(|pp| pp.product.clone()).collect()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for pp in self.items() {
            summary.products += 1;
            summary.units += u64::from(pp.product.quantity);
            match pp.state {
                VisualState::Expired => summary.expired += 1,
                VisualState::Critical => summary.critical += 1,
                VisualState::Normal => {}
            }
        }
        summary
    }
}

/// Totals shown under a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub products: usize,
    pub units: u64,
    pub expired: usize,
    pub critical: usize,
}

/// Filter by category, then by case-insensitive name substring, then classify.
/// Stored order is preserved.
pub fn project(
    products: &[Product],
    filter: &CategoryFilter,
    search: &str,
    today: NaiveDate,
) -> Projection {
    let needle = search.to_lowercase();

    let listed: Vec<ProjectedProduct> = products
        .iter()
        .filter(|p| filter.matches(p.category))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .map(|p| ProjectedProduct {
            product: p.clone(),
            state: classify(p, today),
        })
        .collect();

    if listed.is_empty() {
        Projection::Empty
    } else {
        Projection::Listed(listed)
    }
}
