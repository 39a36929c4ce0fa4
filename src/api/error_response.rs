//! Unified error response handling for the HTTP surface
//!
//! All handler rejections share one JSON format so callers can handle
//! errors programmatically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Unique error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Handler-level rejections
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing required query parameter: {0}")]
    MissingParam(&'static str),

    #[error("recursive proxy request")]
    ProxyLoop,

    #[error("invalid asset URL: {0}")]
    InvalidAssetUrl(String),

    #[error("host not allowed: {0}")]
    ForeignHost(String),

    #[error("invalid revalidation token")]
    InvalidToken,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingParam(_) => "MISSING_PARAMETER",
            ApiError::ProxyLoop => "RECURSIVE_PROXY",
            ApiError::InvalidAssetUrl(_) => "INVALID_ASSET_URL",
            ApiError::ForeignHost(_) => "FORBIDDEN_HOST",
            ApiError::InvalidToken => "INVALID_TOKEN",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_)
            | ApiError::ProxyLoop
            | ApiError::InvalidAssetUrl(_)
            | ApiError::ForeignHost(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ErrorResponse::new(self.code(), self.to_string()).into_response_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new("TEST_ERROR", "Test error message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test error message");
        assert!(error.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let error = ErrorResponse::new("TEST_ERROR", "Test error")
            .with_details(serde_json::json!({ "field": "value" }));
        assert!(error.details.is_some());
    }

    #[test]
    fn test_api_error_codes_and_statuses() {
        assert_eq!(ApiError::ProxyLoop.code(), "RECURSIVE_PROXY");
        assert_eq!(ApiError::ProxyLoop.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::MissingParam("url").to_string(),
            "missing required query parameter: url"
        );
    }
}
