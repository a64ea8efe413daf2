//! HTTP error mapping for the order endpoints.
//!
//! Every failure ends the request with a fixed status and a short text body.
//! The content type stays `application/json` on error responses too; existing
//! clients key off the status code, not the body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use od_config::DecodeErrorStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No route matched the request path.
    RouteNotFound,
    /// GET for an id the store does not hold.
    OrderNotFound { id: String },
    /// PUT for an unknown id under the `not_found` policy.
    UnknownOrder { id: String },
    /// Request body did not decode as an order.
    Decode {
        status: DecodeErrorStatus,
        detail: String,
    },
    /// Response body could not be encoded.
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound
            | ApiError::OrderNotFound { .. }
            | ApiError::UnknownOrder { .. } => StatusCode::NOT_FOUND,
            ApiError::Decode { status, .. } => match status {
                DecodeErrorStatus::BadRequest => StatusCode::BAD_REQUEST,
                DecodeErrorStatus::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Never includes decode details.
    pub fn body(&self) -> &'static str {
        match self {
            ApiError::RouteNotFound => "not found",
            ApiError::OrderNotFound { .. } => "user not found",
            ApiError::UnknownOrder { .. } => "order not found",
            ApiError::Decode { status, .. } => match status {
                DecodeErrorStatus::BadRequest => "bad request",
                DecodeErrorStatus::InternalServerError => "internal server error",
            },
            ApiError::Encode(_) => "internal server error",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RouteNotFound => write!(f, "no route"),
            ApiError::OrderNotFound { id } => write!(f, "order id={id:?} not found"),
            ApiError::UnknownOrder { id } => write!(f, "update for unknown order id={id:?}"),
            ApiError::Decode { detail, .. } => write!(f, "request body decode failed: {detail}"),
            ApiError::Encode(detail) => write!(f, "response encode failed: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            self.body(),
        )
            .into_response()
    }
}
