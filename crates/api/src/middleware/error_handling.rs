//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the
//! After-Hours Connect API. It maps domain-specific errors to appropriate
//! HTTP status codes and JSON error responses, ensuring a consistent error
//! handling experience across the entire API.
//!
//! Note that "no slot available" is not an error anywhere in the API: it
//! is carried as a null slot in a 200 response, so only genuine failures
//! pass through this module.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use afterhours_core::errors::ConnectError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ConnectError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub ConnectError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status
/// code and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ConnectError::NotFound(_) => StatusCode::NOT_FOUND,
            ConnectError::Validation(_) => StatusCode::BAD_REQUEST,
            ConnectError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ConnectError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from ConnectError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, ConnectError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<ConnectError> for AppError {
    fn from(err: ConnectError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return
/// `Result<T, AppError>`. It wraps the eyre error in a
/// `ConnectError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ConnectError::Database(err))
    }
}
