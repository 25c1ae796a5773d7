pub mod catalog;
pub mod categories;

use axum::{routing::get, Router};
use catalog_core::{CatalogService, CategoryService};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: CatalogService,
    pub categories: CategoryService,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/catalog", get(catalog::list_products))
        .route("/catalog/{code}", get(catalog::product_detail))
        .route("/categories", get(categories::list_categories).post(categories::create_category))
        .with_state(state)
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}
