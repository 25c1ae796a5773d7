//! Wire representation of catalog values.
//!
//! Prices leave the service as JSON numbers rounded to cents. `discount` and
//! `final_price` are present only when a discount actually applied.

use catalog_core::{
    Category, Percentage, PricedProduct, Product, ProductDetail, ProductListing, Variant,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductResponse {
    pub code: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<ProductResponse>,
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantResponse {
    pub code: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub variants: Vec<VariantResponse>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryResponse {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryResponse>,
}

/// Body of `POST /categories`. Absent fields read as empty and are rejected
/// by validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

pub fn money(value: Decimal) -> f64 {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero).to_f64().unwrap_or(0.0)
}

fn discount_fields(percentage: Percentage, final_price: Decimal) -> (Option<String>, Option<f64>) {
    if percentage.is_zero() {
        (None, None)
    } else {
        (Some(percentage.to_string()), Some(money(final_price)))
    }
}

pub fn to_product_response(
    product: &Product,
    final_price: Decimal,
    percentage: Percentage,
) -> ProductResponse {
    let (discount, final_price) = discount_fields(percentage, final_price);
    ProductResponse {
        code: product.code.clone(),
        price: money(product.price),
        category: product.category_code().unwrap_or_default().to_string(),
        discount,
        final_price,
    }
}

pub fn to_catalog_response(listing: &ProductListing) -> CatalogResponse {
    CatalogResponse {
        products: listing
            .items
            .iter()
            .map(|PricedProduct { product, final_price, percentage }| {
                to_product_response(product, *final_price, *percentage)
            })
            .collect(),
        total: listing.total,
    }
}

fn to_variant_response(detail: &ProductDetail, variant: &Variant) -> VariantResponse {
    let price = detail.product.variant_price(variant);
    let (discount, final_price) = match detail.variant_pricing(&variant.sku) {
        Some(pricing) => discount_fields(pricing.percentage, pricing.final_price),
        None => (None, None),
    };
    VariantResponse { code: variant.sku.clone(), price: money(price), discount, final_price }
}

pub fn to_product_detail_response(detail: &ProductDetail) -> ProductDetailResponse {
    ProductDetailResponse {
        product: to_product_response(&detail.product, detail.final_price, detail.percentage),
        variants: detail
            .product
            .variants
            .iter()
            .map(|variant| to_variant_response(detail, variant))
            .collect(),
    }
}

pub fn to_category_response(category: &Category) -> CategoryResponse {
    CategoryResponse { code: category.code.clone(), name: category.name.clone() }
}

pub fn to_categories_response(categories: &[Category]) -> CategoriesResponse {
    CategoriesResponse { categories: categories.iter().map(to_category_response).collect() }
}
