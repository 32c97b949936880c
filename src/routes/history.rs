// ABOUTME: History route handler returning the caller's generation history
// ABOUTME: Read-only surface; entries are appended by the synthesis gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Prompt history route. History is append-only and written as a side effect
//! of generation; this route only reads it back, newest-first.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::storage::StorageProvider;

/// History routes handler
pub struct HistoryRoutes;

impl HistoryRoutes {
    /// Create the history routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/get-prompt-history", get(Self::list_history))
            .with_state(resources)
    }

    /// List the caller's generation history, newest-first
    async fn list_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;
        let history = resources.storage.list_history(&auth).await?;
        Ok((StatusCode::OK, Json(history)).into_response())
    }
}
