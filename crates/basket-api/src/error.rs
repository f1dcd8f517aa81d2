//! # API Errors
//!
//! Converts [`ShopError`] into JSON error responses. Faults are logged
//! here; business rejections pass through silently.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use basket_core::ShopError;
use serde::Serialize;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn from_error(err: &ShopError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
            error_code: err.error_code(),
            details: details(err),
        }
    }
}

fn details(err: &ShopError) -> Option<String> {
    match err {
        ShopError::PartialCheckout {
            order_id, stage, ..
        } => Some(format!(
            "order {} was recorded and stopped after {}; POST /api/v1/cart/checkout/resume finishes it",
            order_id, stage
        )),
        ShopError::CheckoutInProgress { order_id } => Some(format!(
            "cart is locked until order {} completes",
            order_id
        )),
        ShopError::DeadlineExceeded { operation, .. } => Some(format!("operation: {}", operation)),
        _ => None,
    }
}

/// Handler error wrapping a [`ShopError`]
#[derive(Debug)]
pub struct ApiError(pub ShopError);

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ShopError::InvalidRequest(rejection.body_text()))
    }
}

/// JSON body extractor whose rejections use the error body above
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let body = ErrorResponse::from_error(&err);

        if err.is_fault() {
            tracing::error!(
                error_code = body.error_code,
                category = ?err.category(),
                "Request failed: {}",
                err
            );
        }

        let status = StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
