use std::sync::Arc;

use catalog_core::config::{AppConfig, ConfigError};
use catalog_core::{CatalogService, CategoryService};
use catalog_db::{
    connect_with_settings, migrations, DbPool, SqlCategoryRepository, SqlProductRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: CatalogService,
    pub categories: CategoryService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    // Rules are checked before touching the database.
    let engine = Arc::new(config.discounts.build_engine()?);
    info!(
        event_name = "system.bootstrap.discounts_loaded",
        correlation_id = "bootstrap",
        rule_count = engine.strategies().len(),
        "discount rules loaded"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let catalog =
        CatalogService::new(Arc::new(SqlProductRepository::new(db_pool.clone())), engine);
    let categories = CategoryService::new(Arc::new(SqlCategoryRepository::new(db_pool.clone())));

    Ok(Application { config, db_pool, catalog, categories })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use catalog_core::config::{AppConfig, DiscountRule, DiscountRuleKind};
    use catalog_core::{Page, Percentage, ProductFilter};
    use catalog_db::CatalogSeedDataset;
    use rust_decimal::Decimal;

    use crate::bootstrap::{bootstrap_with_config, BootstrapError};
    use crate::routes::{router, test_support::get, ApiState};

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config
    }

    #[tokio::test]
    async fn bootstrap_rejects_out_of_range_discount_rules_before_connecting() {
        let mut config = memory_config();
        config.database.url = "postgres://unreachable".to_string();
        config.discounts.rules = vec![DiscountRule {
            kind: DiscountRuleKind::Sku,
            code: "000003".to_string(),
            percentage: 150,
        }];

        let error = bootstrap_with_config(config).await.err().expect("bootstrap should fail");

        assert!(matches!(error, BootstrapError::Config(_)));
        assert!(error.to_string().contains("0..=100"));
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_wires_services_to_the_database() {
        let app = bootstrap_with_config(memory_config()).await.expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('categories', 'products', 'product_variants')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("catalog tables should exist after bootstrap");
        assert_eq!(table_count, 3);

        CatalogSeedDataset::load(&app.db_pool).await.expect("seed");

        let listing = app
            .catalog
            .list_products(Page { offset: 0, limit: 20 }, &ProductFilter::default())
            .await
            .expect("list products");
        assert_eq!(listing.total, 11);

        let boots = listing
            .items
            .iter()
            .find(|item| item.product.code == "PROD010")
            .expect("boots product listed");
        assert_eq!(boots.percentage, Percentage::new(30).expect("valid percentage"));
        assert_eq!(boots.final_price, Decimal::new(62_993, 3));

        let categories = app.categories.list_categories().await.expect("list categories");
        assert_eq!(categories.len(), 4);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn sql_backed_router_accepts_maximal_price_ceiling() {
        let app = bootstrap_with_config(memory_config()).await.expect("bootstrap should succeed");
        CatalogSeedDataset::load(&app.db_pool).await.expect("seed");
        let routes = router(ApiState { catalog: app.catalog, categories: app.categories });

        let (status, body) =
            get(routes, "/catalog?priceLessThan=79228162514264337593543950335&limit=100").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 11);
        assert_eq!(body["products"].as_array().map(Vec::len), Some(11));

        app.db_pool.close().await;
    }
}
