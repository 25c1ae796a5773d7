use catalog_core::StoreError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod category;
pub mod product;

pub use category::SqlCategoryRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("price {0} cannot be stored in minor units")]
    UnrepresentablePrice(Decimal),
}

impl RepositoryError {
    fn decode(error: impl ToString) -> Self {
        Self::Decode(error.to_string())
    }

    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(error)) => error.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<RepositoryError> for StoreError {
    fn from(value: RepositoryError) -> Self {
        if value.is_unique_violation() {
            return StoreError::Conflict(value.to_string());
        }
        match value {
            RepositoryError::Decode(message) => StoreError::Decode(message),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

const MINOR_UNITS: u32 = 2;

/// Converts stored cents back into a two-decimal price.
pub(crate) fn price_from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNITS)
}

/// Converts a price to cents, refusing values with sub-cent precision.
pub(crate) fn price_to_minor(price: Decimal) -> Result<i64, RepositoryError> {
    if price.is_sign_negative() || price.normalize().scale() > MINOR_UNITS {
        return Err(RepositoryError::UnrepresentablePrice(price));
    }
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .ok_or(RepositoryError::UnrepresentablePrice(price))
}

/// Smallest cent amount not strictly below `ceiling`; `price < ceiling`
/// holds exactly when `price_minor < ceiling_to_minor(ceiling)`. Ceilings
/// beyond the `i64` cent range saturate, since no stored price reaches them.
pub(crate) fn ceiling_to_minor(ceiling: Decimal) -> i64 {
    ceiling
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.ceil())
        .and_then(|minor| minor.to_i64())
        .unwrap_or(i64::MAX)
}
