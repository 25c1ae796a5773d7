use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    category::{Category, NewCategory},
    filter::{Page, ProductFilter},
    product::Product,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Conflict(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// One page of a filtered listing plus the number of matches ignoring the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Product>, StoreError>;

    /// Products matching `filter`, ordered by identifier, windowed by `page`.
    /// An offset at or past the number of matches yields an empty page.
    async fn filtered(&self, page: Page, filter: &ProductFilter)
        -> Result<ProductPage, StoreError>;

    /// Looks a product up by code with its category and variants loaded.
    async fn by_code(&self, code: &str) -> Result<Option<Product>, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, StoreError>;
    async fn create(&self, category: NewCategory) -> Result<Category, StoreError>;
}
