use serde::{Deserialize, Serialize};

use super::{DiscountSubject, Percentage};

/// A single discount rule: a match predicate paired with a fixed percentage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountStrategy {
    /// Matches items whose category code equals `code`.
    Category { code: String, percentage: Percentage },
    /// Matches items carrying `sku` as their code (a product code or a variant SKU).
    Sku { sku: String, percentage: Percentage },
}

impl DiscountStrategy {
    pub fn category(code: impl Into<String>, percentage: Percentage) -> Self {
        Self::Category { code: code.into(), percentage }
    }

    pub fn sku(sku: impl Into<String>, percentage: Percentage) -> Self {
        Self::Sku { sku: sku.into(), percentage }
    }

    pub fn applies<S>(&self, subject: &S) -> bool
    where
        S: DiscountSubject + ?Sized,
    {
        match self {
            Self::Category { code, .. } => subject.category_code() == Some(code.as_str()),
            Self::Sku { sku, .. } => subject.matches_code(sku),
        }
    }

    pub fn percentage(&self) -> Percentage {
        match self {
            Self::Category { percentage, .. } | Self::Sku { percentage, .. } => *percentage,
        }
    }
}
