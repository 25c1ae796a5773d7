use serde::Serialize;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_PRODUCTS: &[SeedProductContract] = &[
    SeedProductContract { code: "PROD001", price_minor: 6_576, category: Some("clothing") },
    SeedProductContract { code: "PROD002", price_minor: 1_254, category: Some("shoes") },
    SeedProductContract {
        code: "PROD003",
        price_minor: 2_378_875,
        category: Some("accessories"),
    },
    SeedProductContract { code: "PROD004", price_minor: 5_600, category: Some("clothing") },
    SeedProductContract { code: "PROD005", price_minor: 999, category: Some("accessories") },
    SeedProductContract { code: "PROD006", price_minor: 150, category: Some("shoes") },
    SeedProductContract { code: "PROD007", price_minor: 66_770, category: Some("clothing") },
    SeedProductContract { code: "PROD008", price_minor: 8_888, category: Some("accessories") },
    SeedProductContract { code: "000003", price_minor: 7_100, category: Some("shoes") },
    SeedProductContract { code: "PROD010", price_minor: 8_999, category: Some("boots") },
    SeedProductContract { code: "PROD011", price_minor: 4_500, category: None },
];

const SEED_CATEGORY_CODES: &[&str] = &["clothing", "shoes", "accessories", "boots"];

const SEED_VARIANT_SKUS: &[&str] =
    &["SKU001A", "SKU001B", "SKU002A", "SKU010-42", "SKU010-43", "000003-STD"];

/// Deterministic catalog fixture: four categories, eleven products (one
/// uncategorised) and a handful of variants, some inheriting their
/// product's price.
pub struct CatalogSeedDataset;

impl CatalogSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/catalog_seed.sql");

    /// Loads the fixture. Rows that already exist are left untouched, so
    /// loading twice is harmless.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(Self::SQL).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(SeedResult {
            categories_seeded: SEED_CATEGORY_CODES.len(),
            products_seeded: SEED_PRODUCTS.len(),
            variants_seeded: SEED_VARIANT_SKUS.len(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for code in SEED_CATEGORY_CODES {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE code = ?1)")
                    .bind(*code)
                    .fetch_one(pool)
                    .await?;
            checks.push(SeedCheck { label: format!("category:{code}"), present: exists == 1 });
        }

        for product in SEED_PRODUCTS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(
                    SELECT 1 FROM products p
                    LEFT JOIN categories c ON c.id = p.category_id
                    WHERE p.code = ?1 AND p.price_minor = ?2 AND c.code IS ?3
                )",
            )
            .bind(product.code)
            .bind(product.price_minor)
            .bind(product.category)
            .fetch_one(pool)
            .await?;
            checks.push(SeedCheck {
                label: format!("product:{}", product.code),
                present: exists == 1,
            });
        }

        for sku in SEED_VARIANT_SKUS {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM product_variants WHERE sku = ?1)")
                    .bind(*sku)
                    .fetch_one(pool)
                    .await?;
            checks.push(SeedCheck { label: format!("variant:{sku}"), present: exists == 1 });
        }

        let all_present = checks.iter().all(|check| check.present);
        Ok(VerificationResult { all_present, checks })
    }

    /// Removes the seeded rows, variants first.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        for sku in SEED_VARIANT_SKUS {
            sqlx::query("DELETE FROM product_variants WHERE sku = ?1")
                .bind(*sku)
                .execute(&mut *tx)
                .await?;
        }
        for product in SEED_PRODUCTS {
            sqlx::query("DELETE FROM products WHERE code = ?1")
                .bind(product.code)
                .execute(&mut *tx)
                .await?;
        }
        for code in SEED_CATEGORY_CODES {
            sqlx::query("DELETE FROM categories WHERE code = ?1")
                .bind(*code)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedProductContract {
    code: &'static str,
    price_minor: i64,
    category: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub categories_seeded: usize,
    pub products_seeded: usize,
    pub variants_seeded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedCheck {
    pub label: String,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<SeedCheck>,
}

impl VerificationResult {
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().filter(|check| !check.present).map(|check| check.label.as_str())
    }
}
