use std::sync::Arc;

use super::store::CategoryStore;
use crate::domain::category::{Category, NewCategory, MAX_CATEGORY_FIELD_CHARS};
use crate::errors::{ApplicationError, DomainError};

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ApplicationError> {
        Ok(self.store.list().await?)
    }

    /// Creates a category after trimming both fields; blank or overlong
    /// values are rejected before the store is touched.
    pub async fn create_category(
        &self,
        code: &str,
        name: &str,
    ) -> Result<Category, ApplicationError> {
        let code = required_field("code", code)?;
        let name = required_field("name", name)?;

        Ok(self.store.create(NewCategory { code: code.to_owned(), name: name.to_owned() }).await?)
    }
}

fn required_field<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::invalid_input(field, format!("{field} is required")));
    }
    if value.chars().count() > MAX_CATEGORY_FIELD_CHARS {
        return Err(DomainError::invalid_input(
            field,
            format!("{field} must be at most {MAX_CATEGORY_FIELD_CHARS} characters"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::{category::CategoryService, memory::InMemoryCatalogStore};
    use crate::domain::category::{Category, CategoryId};
    use crate::errors::{ApplicationError, DomainError};

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryCatalogStore::new(
            vec![Category {
                id: CategoryId(1),
                code: "clothing".to_owned(),
                name: "Clothing".to_owned(),
            }],
            Vec::new(),
        )))
    }

    #[tokio::test]
    async fn create_trims_and_persists() {
        let service = service();

        let created = service.create_category("  boots ", " Boots ").await.expect("create");
        assert_eq!(created.code, "boots");
        assert_eq!(created.name, "Boots");

        let codes: Vec<String> = service
            .list_categories()
            .await
            .expect("list")
            .into_iter()
            .map(|category| category.code)
            .collect();
        assert_eq!(codes, ["clothing", "boots"]);
    }

    #[tokio::test]
    async fn create_rejects_blank_code_before_name() {
        let error = service().create_category(" ", "").await.expect_err("invalid");

        assert_eq!(
            error,
            ApplicationError::Domain(DomainError::invalid_input("code", "code is required"))
        );
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let error = service().create_category("boots", "").await.expect_err("invalid");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::InvalidInput { field: "name", .. })
        ));
    }

    #[tokio::test]
    async fn fields_are_limited_to_32_characters() {
        let service = service();

        let longest = "x".repeat(32);
        let created = service.create_category(&longest, &"é".repeat(32)).await.expect("create");
        assert_eq!(created.code, longest);

        let error = service.create_category(&"y".repeat(33), "Long").await.expect_err("code");
        assert_eq!(
            error,
            ApplicationError::Domain(DomainError::invalid_input(
                "code",
                "code must be at most 32 characters"
            ))
        );

        let error = service.create_category("long", &"n".repeat(33)).await.expect_err("name");
        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::InvalidInput { field: "name", .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let error = service().create_category("clothing", "Apparel").await.expect_err("dup");

        assert!(matches!(error, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_failure() {
        let service = CategoryService::new(Arc::new(InMemoryCatalogStore::failing("timeout")));

        let error = service.list_categories().await.expect_err("failing");
        assert_eq!(error, ApplicationError::StoreFailure("timeout".to_owned()));
    }
}
