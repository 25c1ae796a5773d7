use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use catalog_core::domain::{
    category::{Category, CategoryId},
    filter::{Page, ProductFilter},
    product::{Product, ProductId, Variant, VariantId},
};
use catalog_core::{ProductPage, ProductStore, StoreError};

use super::{ceiling_to_minor, price_from_minor, price_to_minor, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "SELECT p.id, p.code, p.price_minor,
        c.id AS category_id, c.code AS category_code, c.name AS category_name
     FROM products p
     LEFT JOIN categories c ON c.id = p.category_id";

/// Product row to insert; used by seeding and tests.
#[derive(Clone, Debug)]
pub struct NewProductRow {
    pub code: String,
    pub price: Decimal,
    pub category_id: Option<CategoryId>,
}

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, product: NewProductRow) -> Result<ProductId, RepositoryError> {
        let price_minor = price_to_minor(product.price)?;
        let result =
            sqlx::query("INSERT INTO products (code, price_minor, category_id) VALUES (?, ?, ?)")
                .bind(&product.code)
                .bind(price_minor)
                .bind(product.category_id.map(|id| id.0))
                .execute(&self.pool)
                .await?;
        Ok(ProductId(result.last_insert_rowid()))
    }

    pub async fn insert_variant(
        &self,
        product_id: ProductId,
        name: &str,
        sku: &str,
        price: Option<Decimal>,
    ) -> Result<VariantId, RepositoryError> {
        let price_minor = price.map(price_to_minor).transpose()?;
        let result = sqlx::query(
            "INSERT INTO product_variants (product_id, name, sku, price_minor) VALUES (?, ?, ?, ?)",
        )
        .bind(product_id.0)
        .bind(name)
        .bind(sku)
        .bind(price_minor)
        .execute(&self.pool)
        .await?;
        Ok(VariantId(result.last_insert_rowid()))
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM products p LEFT JOIN categories c ON c.id = p.category_id",
        );
        push_filter(&mut builder, filter);

        let total = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        u64::try_from(total).map_err(RepositoryError::decode)
    }

    async fn fetch(
        &self,
        filter: &ProductFilter,
        page: Option<Page>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(PRODUCT_COLUMNS);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY p.id");
        if let Some(page) = page {
            builder.push(" LIMIT ").push_bind(i64::from(page.limit));
            builder.push(" OFFSET ").push_bind(i64::from(page.offset));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut products = rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()?;
        self.attach_variants(&mut products).await?;
        Ok(products)
    }

    async fn attach_variants(&self, products: &mut [Product]) -> Result<(), RepositoryError> {
        if products.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, product_id, name, sku, price_minor FROM product_variants WHERE product_id IN (",
        );
        let mut ids = builder.separated(", ");
        for product in products.iter() {
            ids.push_bind(product.id.0);
        }
        ids.push_unseparated(") ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut by_product: HashMap<ProductId, Vec<Variant>> = HashMap::new();
        for row in &rows {
            let variant = row_to_variant(row)?;
            by_product.entry(variant.product_id).or_default().push(variant);
        }

        for product in products.iter_mut() {
            product.variants = by_product.remove(&product.id).unwrap_or_default();
        }
        Ok(())
    }
}

fn push_filter<'args>(builder: &mut QueryBuilder<'args, Sqlite>, filter: &ProductFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = &filter.category {
        builder.push(" AND c.code = ").push_bind(category.clone());
    }
    if let Some(ceiling) = filter.price_less_than {
        builder.push(" AND p.price_minor < ").push_bind(ceiling_to_minor(ceiling));
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(RepositoryError::decode)?;
    let code: String = row.try_get("code").map_err(RepositoryError::decode)?;
    let price_minor: i64 = row.try_get("price_minor").map_err(RepositoryError::decode)?;
    let category_id: Option<i64> = row.try_get("category_id").map_err(RepositoryError::decode)?;
    let category_code: Option<String> =
        row.try_get("category_code").map_err(RepositoryError::decode)?;
    let category_name: Option<String> =
        row.try_get("category_name").map_err(RepositoryError::decode)?;

    let category = match (category_id, category_code, category_name) {
        (Some(id), Some(code), Some(name)) => Some(Category { id: CategoryId(id), code, name }),
        _ => None,
    };

    Ok(Product {
        id: ProductId(id),
        code,
        price: price_from_minor(price_minor),
        category,
        variants: Vec::new(),
    })
}

fn row_to_variant(row: &SqliteRow) -> Result<Variant, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(RepositoryError::decode)?;
    let product_id: i64 = row.try_get("product_id").map_err(RepositoryError::decode)?;
    let name: String = row.try_get("name").map_err(RepositoryError::decode)?;
    let sku: String = row.try_get("sku").map_err(RepositoryError::decode)?;
    let price_minor: Option<i64> = row.try_get("price_minor").map_err(RepositoryError::decode)?;

    Ok(Variant {
        id: VariantId(id),
        product_id: ProductId(product_id),
        name,
        sku,
        price: price_minor.map(price_from_minor),
    })
}

#[async_trait]
impl ProductStore for SqlProductRepository {
    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.fetch(&ProductFilter::default(), None).await?)
    }

    async fn filtered(
        &self,
        page: Page,
        filter: &ProductFilter,
    ) -> Result<ProductPage, StoreError> {
        let total = self.count(filter).await?;
        let products = self.fetch(filter, Some(page)).await?;
        Ok(ProductPage { products, total })
    }

    async fn by_code(&self, code: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("{PRODUCT_COLUMNS} WHERE p.code = ?"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut products = vec![row_to_product(&row)?];
        self.attach_variants(&mut products).await?;
        Ok(products.pop())
    }
}
