use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use catalog_core::{ListRequest, RawListQuery};
use tracing::info;

use super::{correlation_id, ApiState};
use crate::error::{api_error, bad_request, ApiError};
use crate::mapper::{
    to_catalog_response, to_product_detail_response, CatalogResponse, ProductDetailResponse,
};

pub async fn list_products(
    State(state): State<ApiState>,
    query: Result<Query<RawListQuery>, QueryRejection>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Query(raw) = query.map_err(|rejection| bad_request(rejection.body_text()))?;

    let request = ListRequest::parse(&raw)
        .map_err(|error| api_error("catalog.list.rejected", &correlation_id, error.into()))?;
    let listing = state
        .catalog
        .list_products(request.page, &request.filter)
        .await
        .map_err(|error| api_error("catalog.list.failed", &correlation_id, error))?;

    info!(
        event_name = "catalog.list.served",
        correlation_id = %correlation_id,
        offset = request.page.offset,
        limit = request.page.limit,
        returned = listing.items.len(),
        total = listing.total,
        "catalog page served"
    );
    Ok(Json(to_catalog_response(&listing)))
}

pub async fn product_detail(
    State(state): State<ApiState>,
    Path(code): Path<String>,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let correlation_id = correlation_id();

    let detail = state
        .catalog
        .product_detail(&code)
        .await
        .map_err(|error| api_error("catalog.detail.failed", &correlation_id, error))?;

    info!(
        event_name = "catalog.detail.served",
        correlation_id = %correlation_id,
        product_code = %code,
        discount = %detail.percentage,
        "product detail served"
    );
    Ok(Json(to_product_detail_response(&detail)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use catalog_core::InMemoryCatalogStore;
    use serde_json::json;

    use crate::routes::test_support::{app, app_with_store, get};

    #[tokio::test]
    async fn list_applies_defaults_and_discounts() {
        let (status, body) = get(app(), "/catalog").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["products"].as_array().map(Vec::len), Some(5));
        assert_eq!(
            body["products"][0],
            json!({
                "code": "000001",
                "price": 89.99,
                "category": "boots",
                "discount": "30%",
                "final_price": 62.99
            })
        );
        assert_eq!(
            body["products"][2],
            json!({
                "code": "000003",
                "price": 71.0,
                "category": "sandals",
                "discount": "15%",
                "final_price": 60.35
            })
        );
        assert_eq!(
            body["products"][4],
            json!({ "code": "000005", "price": 45.0, "category": "" })
        );
    }

    #[tokio::test]
    async fn list_filters_and_pages() {
        let (status, body) =
            get(app(), "/catalog?category=sandals&priceLessThan=71&offset=0&limit=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["products"][0]["code"], "000004");

        let (status, body) = get(app(), "/catalog?offset=3&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["products"][0]["code"], "000004");

        let (status, body) = get(app(), "/catalog?offset=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "products": [], "total": 5 }));
    }

    #[tokio::test]
    async fn empty_query_values_fall_back_to_defaults() {
        let (status, body) = get(app(), "/catalog?limit=&category=&priceLessThan=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
    }

    #[tokio::test]
    async fn invalid_parameters_are_rejected_with_reason() {
        let (status, body) = get(app(), "/catalog?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "limit must be at least 1" }));

        let (status, body) = get(app(), "/catalog?offset=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "offset must be non-negative" }));

        let (status, _) = get(app(), "/catalog?priceLessThan=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn maximal_price_ceiling_is_accepted() {
        let (status, body) =
            get(app(), "/catalog?priceLessThan=79228162514264337593543950335").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
    }

    #[tokio::test]
    async fn detail_prices_variants() {
        let (status, body) = get(app(), "/catalog/000001").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["discount"], "30%");
        assert_eq!(
            body["variants"],
            json!([
                { "code": "000001-38", "price": 89.99, "discount": "30%", "final_price": 62.99 },
                { "code": "000001-39", "price": 94.99, "discount": "30%", "final_price": 66.49 }
            ])
        );
    }

    #[tokio::test]
    async fn detail_of_unknown_code_is_not_found() {
        let (status, body) = get(app(), "/catalog/NOPE").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "product with code NOPE not found" }));
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal_errors() {
        let store = Arc::new(InMemoryCatalogStore::failing("database is locked"));

        let (status, body) = get(app_with_store(store), "/catalog").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "database is locked" }));
    }
}
