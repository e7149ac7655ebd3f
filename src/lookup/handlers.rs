use super::protocol::{
    ENDPOINT_HEALTH, ENDPOINT_STUDENTS, ErrorResponse, HealthResponse, MSG_INTERNAL_ERROR,
    MSG_METHOD_NOT_ALLOWED,
};
use super::service::{LookupError, LookupService};
use super::types::{Criteria, StudentRecord};

use axum::extract::Query;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Extension, Json, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET")],
                Json(ErrorResponse {
                    error: MSG_METHOD_NOT_ALLOWED.to_string(),
                    details: None,
                }),
            )
                .into_response(),
            ApiError::Lookup(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: MSG_INTERNAL_ERROR.to_string(),
                    details: Some(e.to_string()),
                }),
            )
                .into_response(),
        }
    }
}

/// Builds the lookup router with CORS open to any origin for GET.
pub fn routes(service: Arc<LookupService>) -> Router {
    Router::new()
        .route(ENDPOINT_STUDENTS, any(handle_students))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(service))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers([header::CONTENT_TYPE]),
        )
}

/// Decoding into raw pairs cannot be rejected: bad percent-escapes are
/// decoded lossily and unknown keys are dropped by `Criteria::from_pairs`.
pub async fn handle_students(
    method: Method,
    Query(pairs): Query<Vec<(String, String)>>,
    Extension(service): Extension<Arc<LookupService>>,
) -> Result<Json<Vec<StudentRecord>>, ApiError> {
    // Method gate runs before anything touches the store.
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let criteria = Criteria::from_pairs(pairs);

    match service.lookup(&criteria).await {
        Ok(students) => Ok(Json(students)),
        Err(e) => {
            tracing::error!("Error fetching data: {}", e);
            Err(e.into())
        }
    }
}

pub async fn handle_health(
    Extension(service): Extension<Arc<LookupService>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        store_connected: service.connections().is_connected().await,
    })
}
