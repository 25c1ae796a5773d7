pub mod category;
pub mod memory;
pub mod query;
pub mod store;

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::discount::{DiscountEngine, Percentage, VariantSubject};
use crate::domain::{
    filter::{Page, ProductFilter},
    product::Product,
};
use crate::errors::ApplicationError;

use self::store::ProductStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricedProduct {
    pub product: Product,
    pub final_price: Decimal,
    pub percentage: Percentage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductListing {
    pub items: Vec<PricedProduct>,
    /// Number of products matching the filter, independent of the page.
    pub total: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricedVariant {
    pub final_price: Decimal,
    pub percentage: Percentage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductDetail {
    pub product: Product,
    pub final_price: Decimal,
    pub percentage: Percentage,
    /// Keyed by variant SKU.
    pub variants: BTreeMap<String, PricedVariant>,
}

impl ProductDetail {
    pub fn variant_pricing(&self, sku: &str) -> Option<&PricedVariant> {
        self.variants.get(sku)
    }
}

/// Read-side orchestration: store lookups followed by per-item discounting.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ProductStore>,
    engine: Arc<DiscountEngine>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>, engine: Arc<DiscountEngine>) -> Self {
        Self { store, engine }
    }

    pub async fn list_products(
        &self,
        page: Page,
        filter: &ProductFilter,
    ) -> Result<ProductListing, ApplicationError> {
        let result = self.store.filtered(page, filter).await?;

        let items = result
            .products
            .into_iter()
            .map(|product| {
                let discount = self.engine.evaluate(&product);
                PricedProduct {
                    product,
                    final_price: discount.final_price,
                    percentage: discount.percentage,
                }
            })
            .collect();

        Ok(ProductListing { items, total: result.total })
    }

    pub async fn product_detail(&self, code: &str) -> Result<ProductDetail, ApplicationError> {
        let product = self
            .store
            .by_code(code)
            .await?
            .ok_or_else(|| ApplicationError::NotFound { code: code.to_owned() })?;

        let discount = self.engine.evaluate(&product);
        let variants = product
            .variants
            .iter()
            .map(|variant| {
                let variant_discount =
                    self.engine.evaluate(&VariantSubject::new(&product, variant));
                (
                    variant.sku.clone(),
                    PricedVariant {
                        final_price: variant_discount.final_price,
                        percentage: variant_discount.percentage,
                    },
                )
            })
            .collect();

        Ok(ProductDetail {
            final_price: discount.final_price,
            percentage: discount.percentage,
            variants,
            product,
        })
    }
}
