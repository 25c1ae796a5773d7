use axum::{http::StatusCode, Json};
use catalog_core::{ApplicationError, InterfaceError};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn status_for(error: &InterfaceError) -> StatusCode {
    match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a service failure onto the HTTP error body, logging server-side
/// failures at error level and client mistakes at warn.
pub fn api_error(
    event_name: &'static str,
    correlation_id: &str,
    error: ApplicationError,
) -> ApiError {
    let interface = error.into_interface(correlation_id);
    let status = status_for(&interface);

    if status.is_server_error() {
        error!(
            event_name,
            correlation_id = interface.correlation_id(),
            status = status.as_u16(),
            error = %interface,
            "request failed"
        );
    } else {
        warn!(
            event_name,
            correlation_id = interface.correlation_id(),
            status = status.as_u16(),
            error = %interface,
            "request rejected"
        );
    }

    (status, Json(ErrorBody { error: interface.message().to_string() }))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.into() }))
}
