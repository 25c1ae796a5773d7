use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{CategoryStore, ProductPage, ProductStore, StoreError};
use crate::domain::{
    category::{Category, CategoryId, NewCategory},
    filter::{Page, ProductFilter},
    product::Product,
};

/// Store backed by process memory. Filtering and paging follow the same
/// contract as the SQL store, so services and handlers can be exercised
/// without a database.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<Vec<Product>>,
    categories: RwLock<Vec<Category>>,
    failure: Option<String>,
}

impl InMemoryCatalogStore {
    pub fn new(categories: Vec<Category>, mut products: Vec<Product>) -> Self {
        products.sort_by_key(|product| product.id);
        Self {
            products: RwLock::new(products),
            categories: RwLock::new(categories),
            failure: None,
        }
    }

    /// Builds a store whose category table is whatever the products reference.
    pub fn with_products(products: Vec<Product>) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for category in products.iter().filter_map(|product| product.category.as_ref()) {
            if !categories.iter().any(|known| known.id == category.id) {
                categories.push(category.clone());
            }
        }
        categories.sort_by_key(|category| category.id);
        Self::new(categories, products)
    }

    /// A store on which every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::default() }
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryCatalogStore {
    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self.products.read().await.clone())
    }

    async fn filtered(
        &self,
        page: Page,
        filter: &ProductFilter,
    ) -> Result<ProductPage, StoreError> {
        self.check()?;
        let products = self.products.read().await;
        let matching: Vec<&Product> =
            products.iter().filter(|product| filter.matches(product)).collect();

        let window = page.window(&matching);
        Ok(ProductPage {
            products: matching[window].iter().map(|product| (*product).clone()).collect(),
            total: matching.len() as u64,
        })
    }

    async fn by_code(&self, code: &str) -> Result<Option<Product>, StoreError> {
        self.check()?;
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.code == code).cloned())
    }
}

#[async_trait]
impl CategoryStore for InMemoryCatalogStore {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        self.check()?;
        Ok(self.categories.read().await.clone())
    }

    async fn create(&self, category: NewCategory) -> Result<Category, StoreError> {
        self.check()?;
        let mut categories = self.categories.write().await;
        if categories.iter().any(|existing| existing.code == category.code) {
            return Err(StoreError::Conflict(format!(
                "category with code {} already exists",
                category.code
            )));
        }

        let next_id = categories.iter().map(|existing| existing.id.0).max().unwrap_or(0) + 1;
        let created =
            Category { id: CategoryId(next_id), code: category.code, name: category.name };
        categories.push(created.clone());
        Ok(created)
    }
}
