//! Error types for LinkReach
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Resource not found")]
    NotFound,

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed or incomplete webhook payload (400)
    #[error("Invalid webhook payload: {0}")]
    WebhookValidation(String),

    /// Provider call failed: non-2xx response or transport failure (502)
    ///
    /// Carries the operation name so the upstream message can be
    /// attributed to the call that produced it.
    #[error("Provider request failed ({operation}): {message}")]
    ProviderRequest {
        operation: &'static str,
        message: String,
    },

    /// Credential issuance unreachable or returned no key (502)
    #[error("Credential fetch failed: {0}")]
    CredentialFetch(String),

    /// Store update failed or matched zero/many rows (500)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message, error_type) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string(), "not_found"),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::WebhookValidation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone(), "webhook_validation")
            }
            AppError::ProviderRequest { .. } => {
                (StatusCode::BAD_GATEWAY, self.to_string(), "provider_request")
            }
            AppError::CredentialFetch(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string(), "credential_fetch")
            }
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string(), "http_client"),
            AppError::Persistence(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "persistence")
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                "database",
            ),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "config"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "internal",
            ),
        };

        // Record error metric
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL
            .with_label_values(&[error_type, "unknown"])
            .inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
