// ABOUTME: Saved-prompt route handlers listing kept image and video prompt pairs
// ABOUTME: Read-only, user-scoped listings backed by the storage provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Saved prompt routes. The dashboard shows the prompts a user chose to
//! keep; these listings go through the storage gateway like every other
//! user-scoped read.

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

/// Saved prompt routes handler
pub struct SavedPromptRoutes;

impl SavedPromptRoutes {
    /// Create the saved-prompt routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/get-saved-prompts", get(Self::list_saved_prompts))
            .route(
                "/api/get-saved-video-prompts",
                get(Self::list_saved_video_prompts),
            )
            .with_state(resources)
    }

    /// List the caller's kept image prompts, newest-first
    async fn list_saved_prompts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;
        let prompts = resources.storage.list_saved_prompts(&auth).await?;
        Ok((StatusCode::OK, Json(prompts)).into_response())
    }

    /// List the caller's kept video prompts, newest-first
    async fn list_saved_video_prompts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;
        let prompts = resources.storage.list_saved_video_prompts(&auth).await?;
        Ok((StatusCode::OK, Json(prompts)).into_response())
    }
}
