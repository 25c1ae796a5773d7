use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub price: Decimal,
    pub category: Option<Category>,
    pub variants: Vec<Variant>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    /// `None` means the variant sells at its product's price.
    pub price: Option<Decimal>,
}

impl Product {
    pub fn category_code(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.code.as_str())
    }

    /// Effective price of one of this product's variants.
    pub fn variant_price(&self, variant: &Variant) -> Decimal {
        variant.price.unwrap_or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::{
        category::{Category, CategoryId},
        product::{Product, ProductId, Variant, VariantId},
    };

    #[test]
    fn variant_without_price_inherits_product_price() {
        let product = product_fixture();

        assert_eq!(product.variant_price(&product.variants[0]), Decimal::new(8_999, 2));
        assert_eq!(product.variant_price(&product.variants[1]), Decimal::new(9_499, 2));
    }

    #[test]
    fn category_code_is_none_for_uncategorised_product() {
        let mut product = product_fixture();
        assert_eq!(product.category_code(), Some("boots"));

        product.category = None;
        assert_eq!(product.category_code(), None);
    }

    fn product_fixture() -> Product {
        Product {
            id: ProductId(1),
            code: "000001".to_owned(),
            price: Decimal::new(8_999, 2),
            category: Some(Category {
                id: CategoryId(1),
                code: "boots".to_owned(),
                name: "Boots".to_owned(),
            }),
            variants: vec![
                Variant {
                    id: VariantId(1),
                    product_id: ProductId(1),
                    name: "Size 38".to_owned(),
                    sku: "000001-38".to_owned(),
                    price: None,
                },
                Variant {
                    id: VariantId(2),
                    product_id: ProductId(1),
                    name: "Size 39".to_owned(),
                    sku: "000001-39".to_owned(),
                    price: Some(Decimal::new(9_499, 2)),
                },
            ],
        }
    }
}
