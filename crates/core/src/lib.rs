pub mod catalog;
pub mod config;
pub mod discount;
pub mod domain;
pub mod errors;

pub use catalog::category::CategoryService;
pub use catalog::memory::InMemoryCatalogStore;
pub use catalog::query::{ListRequest, RawListQuery};
pub use catalog::store::{CategoryStore, ProductPage, ProductStore, StoreError};
pub use catalog::{CatalogService, PricedProduct, PricedVariant, ProductDetail, ProductListing};
pub use discount::{Discount, DiscountEngine, DiscountStrategy, DiscountSubject, Percentage};
pub use domain::category::{Category, CategoryId, NewCategory};
pub use domain::filter::{Page, ProductFilter};
pub use domain::product::{Product, ProductId, Variant, VariantId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
