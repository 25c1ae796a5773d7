//! First-match-wins discount evaluation.
//!
//! The engine holds an ordered list of [`DiscountStrategy`] values. For any
//! subject (a product, or one of its variants) the earliest strategy that
//! applies decides the percentage; later strategies are never consulted, so
//! discounts do not stack.

pub mod strategy;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use strategy::DiscountStrategy;

use crate::domain::product::{Product, Variant};
use crate::errors::DomainError;

/// Whole-number discount percentage in `0..=100`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u32) -> Result<Self, DomainError> {
        u8::try_from(value)
            .ok()
            .filter(|value| *value <= 100)
            .map(Self)
            .ok_or(DomainError::InvalidPercentage(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `price - price * pct / 100`, without intermediate rounding.
    pub fn discount(self, price: Decimal) -> Decimal {
        price - price * Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }
}

impl TryFrom<u32> for Percentage {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u32 {
    fn from(value: Percentage) -> Self {
        u32::from(value.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Anything a discount strategy can be evaluated against.
pub trait DiscountSubject {
    /// Whether `code` identifies this subject.
    fn matches_code(&self, code: &str) -> bool;
    fn category_code(&self) -> Option<&str>;
    fn base_price(&self) -> Decimal;
}

impl DiscountSubject for Product {
    fn matches_code(&self, code: &str) -> bool {
        self.code == code
    }

    fn category_code(&self) -> Option<&str> {
        Product::category_code(self)
    }

    fn base_price(&self) -> Decimal {
        self.price
    }
}

/// A variant seen through its parent product: it answers to both its own SKU
/// and the parent code, inherits the parent category, and is priced at its
/// own price or the inherited one.
#[derive(Clone, Copy, Debug)]
pub struct VariantSubject<'a> {
    pub product: &'a Product,
    pub variant: &'a Variant,
}

impl<'a> VariantSubject<'a> {
    pub fn new(product: &'a Product, variant: &'a Variant) -> Self {
        Self { product, variant }
    }
}

impl DiscountSubject for VariantSubject<'_> {
    fn matches_code(&self, code: &str) -> bool {
        self.variant.sku == code || self.product.code == code
    }

    fn category_code(&self) -> Option<&str> {
        self.product.category_code()
    }

    fn base_price(&self) -> Decimal {
        self.product.variant_price(self.variant)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub percentage: Percentage,
    pub final_price: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscountEngine {
    strategies: Vec<DiscountStrategy>,
}

impl DiscountEngine {
    pub fn new(strategies: Vec<DiscountStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[DiscountStrategy] {
        &self.strategies
    }

    pub fn matching<S>(&self, subject: &S) -> Option<&DiscountStrategy>
    where
        S: DiscountSubject + ?Sized,
    {
        self.strategies.iter().find(|strategy| strategy.applies(subject))
    }

    pub fn apply<S>(&self, subject: &S) -> Decimal
    where
        S: DiscountSubject + ?Sized,
    {
        self.evaluate(subject).final_price
    }

    pub fn percentage_for<S>(&self, subject: &S) -> Percentage
    where
        S: DiscountSubject + ?Sized,
    {
        self.matching(subject).map(DiscountStrategy::percentage).unwrap_or(Percentage::ZERO)
    }

    pub fn evaluate<S>(&self, subject: &S) -> Discount
    where
        S: DiscountSubject + ?Sized,
    {
        let price = subject.base_price();
        match self.matching(subject) {
            Some(strategy) => {
                let percentage = strategy.percentage();
                Discount { percentage, final_price: percentage.discount(price) }
            }
            None => Discount { percentage: Percentage::ZERO, final_price: price },
        }
    }
}
