// ABOUTME: Unified error handling system with error codes and HTTP response mapping
// ABOUTME: Defines AppError, ErrorCode, and the JSON error body returned by every handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the TukangPrompt
//! server. It defines standard error types, error codes, and HTTP response
//! formatting so every handler returns the same `{"error": "..."}` JSON shape
//! with a status code matching the error category.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Authentication credentials absent from the request
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Authentication credentials present but not accepted
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,

    /// Request payload failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required field is missing from the request body
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,

    /// Requested resource does not exist or is not owned by the caller
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    /// HTTP method not supported on this endpoint
    #[serde(rename = "METHOD_NOT_ALLOWED")]
    MethodNotAllowed,

    /// Auth+Storage provider call failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Text generation provider call failed
    #[serde(rename = "GENERATION_ERROR")]
    GenerationError,
    /// Text generation provider replied with unparseable or incomplete output
    #[serde(rename = "INVALID_AI_RESPONSE")]
    InvalidAiResponse,

    /// Required configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField => StatusCode::BAD_REQUEST,

            // 401 Unauthorized - every authentication failure is reported
            // uniformly so callers never need provider-specific handling
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::ResourceNotFound => StatusCode::NOT_FOUND,

            // 405 Method Not Allowed
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 500 Internal Server Error - provider failures included; the
            // external contract fixes the category code for downstream errors
            Self::StorageError
            | Self::GenerationError
            | Self::InvalidAiResponse
            | Self::ConfigError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Authentication required (no token supplied)
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field(s)
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Resource not found (or not owned by the caller)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// HTTP method not allowed
    pub fn method_not_allowed() -> Self {
        Self::new(ErrorCode::MethodNotAllowed, "Method Not Allowed")
    }

    /// Auth+Storage provider failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Text generation provider failure
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationError, message)
    }

    /// Malformed or incomplete AI output
    pub fn invalid_ai_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAiResponse, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body: `{"error": "<human-readable message>"}`
///
/// Stack traces and internal identifiers are never exposed; the HTTP status
/// communicates the category.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self.message, "Request failed");
        }
        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Conversion from `anyhow::Error` for provider boundaries that aggregate
/// heterogeneous failures
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AuthInvalid.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidInput.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::MethodNotAllowed.http_status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::GenerationError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ConfigError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_display_is_message_only() {
        let error = AppError::auth_invalid("Unauthorized: Invalid token");
        assert_eq!(error.to_string(), "Unauthorized: Invalid token");
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::missing_field(
            "Bad request: Missing required fields (config_name, prompt_type, parameters)",
        );
        let body = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();
        assert!(body.starts_with("{\"error\":"));
        assert!(body.contains("config_name"));
    }

    #[test]
    fn test_with_source_preserves_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let error = AppError::storage("Store call failed").with_source(io);
        assert!(std::error::Error::source(&error).is_some());
    }
}
