use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Optional constraints narrowing a product listing. `None` means no
/// constraint on that field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Exact match on the product's category code.
    pub category: Option<String>,
    /// Exclusive ceiling: only products priced strictly below it match.
    pub price_less_than: Option<Decimal>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category_code() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(ceiling) = self.price_less_than {
            if product.price >= ceiling {
                return false;
            }
        }

        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// Slices an already-filtered, ordered result set. An offset past the end
    /// yields an empty window.
    pub fn window<T>(&self, items: &[T]) -> std::ops::Range<usize> {
        let start = (self.offset as usize).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        start..end
    }
}
