use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use super::{correlation_id, ApiState};
use crate::error::{api_error, bad_request, ApiError};
use crate::mapper::{
    to_categories_response, to_category_response, CategoriesResponse, CategoryResponse,
    CreateCategoryRequest,
};

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let correlation_id = correlation_id();

    let categories = state
        .categories
        .list_categories()
        .await
        .map_err(|error| api_error("categories.list.failed", &correlation_id, error))?;

    Ok(Json(to_categories_response(&categories)))
}

pub async fn create_category(
    State(state): State<ApiState>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let correlation_id = correlation_id();
    let Json(request) = body.map_err(|rejection| {
        warn!(
            event_name = "categories.create.malformed",
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "category request body rejected"
        );
        bad_request("invalid request body")
    })?;

    let category = state
        .categories
        .create_category(&request.code, &request.name)
        .await
        .map_err(|error| api_error("categories.create.failed", &correlation_id, error))?;

    info!(
        event_name = "categories.create.succeeded",
        correlation_id = %correlation_id,
        category_code = %category.code,
        category_id = category.id.0,
        "category created"
    );
    Ok((StatusCode::CREATED, Json(to_category_response(&category))))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};

    use crate::routes::test_support::{app, get, send};

    async fn post(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/categories")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        send(app, request).await
    }

    #[tokio::test]
    async fn lists_known_categories() {
        let (status, body) = get(app(), "/categories").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "categories": [
                { "code": "boots", "name": "boots" },
                { "code": "sandals", "name": "sandals" }
            ]})
        );
    }

    #[tokio::test]
    async fn create_trims_input_and_returns_created() {
        let app = app();

        let (status, body) =
            post(app.clone(), r#"{ "code": " sneakers ", "name": " Sneakers " }"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "code": "sneakers", "name": "Sneakers" }));

        let (_, listed) = get(app, "/categories").await;
        assert_eq!(listed["categories"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn create_rejects_blank_and_missing_fields() {
        let (status, body) = post(app(), r#"{ "code": "  ", "name": "Blank" }"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "code is required" }));

        let (status, body) = post(app(), r#"{ "code": "clogs" }"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "name is required" }));
    }

    #[tokio::test]
    async fn create_enforces_the_32_character_limit() {
        let app = app();
        let at_limit = format!(r#"{{ "code": "{}", "name": "Limit" }}"#, "k".repeat(32));
        let (status, _) = post(app.clone(), &at_limit).await;
        assert_eq!(status, StatusCode::CREATED);

        let over_limit = format!(r#"{{ "code": "{}", "name": "Limit" }}"#, "k".repeat(33));
        let (status, body) = post(app, &over_limit).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "code must be at most 32 characters" }));
    }

    #[tokio::test]
    async fn create_rejects_malformed_body() {
        let (status, body) = post(app(), "{ not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid request body" }));
    }

    #[tokio::test]
    async fn duplicate_code_conflicts() {
        let (status, body) = post(app(), r#"{ "code": "boots", "name": "Boots again" }"#).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().is_some_and(|message| message.contains("boots")));
    }
}
