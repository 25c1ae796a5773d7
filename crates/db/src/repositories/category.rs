use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use catalog_core::domain::category::{Category, CategoryId, NewCategory};
use catalog_core::{CategoryStore, StoreError};

use super::RepositoryError;
use crate::DbPool;

pub struct SqlCategoryRepository {
    pool: DbPool,
}

impl SqlCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(RepositoryError::decode)?;
    let code: String = row.try_get("code").map_err(RepositoryError::decode)?;
    let name: String = row.try_get("name").map_err(RepositoryError::decode)?;

    Ok(Category { id: CategoryId(id), code, name })
}

#[async_trait]
impl CategoryStore for SqlCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, code, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(rows.iter().map(row_to_category).collect::<Result<Vec<_>, _>>()?)
    }

    async fn create(&self, category: NewCategory) -> Result<Category, StoreError> {
        let result = sqlx::query("INSERT INTO categories (code, name) VALUES (?, ?)")
            .bind(&category.code)
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)
            .map_err(|error| {
                if error.is_unique_violation() {
                    StoreError::Conflict(format!(
                        "category with code {} already exists",
                        category.code
                    ))
                } else {
                    StoreError::from(error)
                }
            })?;

        Ok(Category {
            id: CategoryId(result.last_insert_rowid()),
            code: category.code,
            name: category.name,
        })
    }
}
