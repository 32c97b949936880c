// ABOUTME: Generation route handlers for image and video prompt synthesis
// ABOUTME: Auth is optional here; a valid token only enables history recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Generation routes.
//!
//! `POST /api/generate-image-prompt` and `POST /api/generate-video-prompt`
//! accept the full form state, return the generated prompt pair, and - when
//! the request carried a bearer token - record the exchange into history
//! without delaying the response.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::debug;

use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::models::{ImagePromptFormState, PromptType, VideoPromptFormState};
use crate::resources::ServerResources;

/// Error message for an unparseable request body
const INVALID_BODY_MESSAGE: &str = "Bad request: Invalid JSON body";

/// Generation routes handler
pub struct GenerationRoutes;

impl GenerationRoutes {
    /// Create the generation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/generate-image-prompt",
                post(Self::generate_image_prompt),
            )
            .route(
                "/api/generate-video-prompt",
                post(Self::generate_video_prompt),
            )
            .with_state(resources)
    }

    /// Unwrap a JSON body, mapping rejections to the standard 400 message
    fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
        payload.map(|Json(body)| body).map_err(|e| {
            debug!(error = %e, "Request body rejected");
            AppError::invalid_input(INVALID_BODY_MESSAGE)
        })
    }

    /// Generate a DALL-E/Midjourney prompt pair
    async fn generate_image_prompt(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<ImagePromptFormState>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let form = Self::parse_body(payload)?;
        let token = bearer_token(&headers);

        let prompts = resources.synthesis.generate_image_prompts(&form).await?;

        let input_parameters = serde_json::to_value(&form)
            .map_err(|e| AppError::internal(format!("Failed to serialize form state: {e}")))?;
        let generated = serde_json::to_value(&prompts)
            .map_err(|e| AppError::internal(format!("Failed to serialize prompts: {e}")))?;
        resources.synthesis.log_history_detached(
            token,
            PromptType::Image,
            input_parameters,
            generated,
        );

        Ok((StatusCode::OK, Json(prompts)).into_response())
    }

    /// Generate a Kling/Veo prompt plus a ChatGPT video concept
    async fn generate_video_prompt(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<VideoPromptFormState>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let form = Self::parse_body(payload)?;
        let token = bearer_token(&headers);

        let prompts = resources.synthesis.generate_video_prompts(&form).await?;

        let input_parameters = serde_json::to_value(&form)
            .map_err(|e| AppError::internal(format!("Failed to serialize form state: {e}")))?;
        let generated = serde_json::to_value(&prompts)
            .map_err(|e| AppError::internal(format!("Failed to serialize prompts: {e}")))?;
        resources.synthesis.log_history_detached(
            token,
            PromptType::Video,
            input_parameters,
            generated,
        );

        Ok((StatusCode::OK, Json(prompts)).into_response())
    }
}
