// ABOUTME: HTTP route registration for all API capabilities
// ABOUTME: Assembles per-capability routers and normalizes 405 responses to the JSON error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! HTTP surface of the server. Each capability gets its own router struct in
//! the submodules; [`api_routes`] merges them and ensures every error
//! response, including the framework-generated 405, uses the
//! `{"error": "..."}` body.

pub mod configs;
pub mod generation;
pub mod health;
pub mod history;
pub mod saved;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Build the full application router
pub fn api_routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(generation::GenerationRoutes::routes(Arc::clone(&resources)))
        .merge(configs::ConfigRoutes::routes(Arc::clone(&resources)))
        .merge(history::HistoryRoutes::routes(Arc::clone(&resources)))
        .merge(saved::SavedPromptRoutes::routes(resources))
        .layer(axum::middleware::map_response(normalize_method_not_allowed))
}

/// Replace the framework's empty-bodied 405 with the standard error body,
/// preserving the `Allow` header
async fn normalize_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut normalized = AppError::method_not_allowed().into_response();
    if let Some(allow) = allow {
        normalized.headers_mut().insert(header::ALLOW, allow);
    }
    normalized
}
