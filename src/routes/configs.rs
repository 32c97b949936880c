// ABOUTME: Prompt-config route handlers for saving, listing, and deleting configurations
// ABOUTME: All routes require a verified bearer token; rows are scoped to the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Prompt configuration routes.
//!
//! Configs are insert-and-delete only - there is no update operation. The
//! save payload is validated for field presence and prompt type before the
//! storage provider is touched; deletion matches id and owner in one call so
//! a foreign config answers 404, never 403.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{NewPromptConfig, PromptType};
use crate::resources::ServerResources;
use crate::storage::StorageProvider;

/// Error message for an unparseable request body
const INVALID_BODY_MESSAGE: &str = "Bad request: Invalid JSON body";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to save a prompt configuration.
///
/// Fields are optional at the wire level so presence can be validated with
/// the contract's error message rather than a generic parse failure.
#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    /// User-chosen configuration name
    #[serde(default)]
    pub config_name: Option<String>,
    /// `"image"` or `"video"`
    #[serde(default)]
    pub prompt_type: Option<String>,
    /// Opaque form parameters
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Request to delete a prompt configuration
#[derive(Debug, Deserialize)]
pub struct DeleteConfigRequest {
    /// Id of the config to delete
    #[serde(default)]
    pub config_id: Option<Uuid>,
}

/// Response for a successful deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteConfigResponse {
    /// Confirmation message
    pub message: String,
}

// ============================================================================
// Config Routes
// ============================================================================

/// Prompt-config routes handler
pub struct ConfigRoutes;

impl ConfigRoutes {
    /// Create all config routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/save-prompt-config", post(Self::save_config))
            .route("/api/get-user-configs", get(Self::list_configs))
            .route(
                "/api/delete-prompt-config",
                // POST is accepted alongside DELETE for form-driven clients
                post(Self::delete_config).delete(Self::delete_config),
            )
            .with_state(resources)
    }

    /// Validate the save payload into a typed insert
    fn validate_save(request: SaveConfigRequest) -> Result<NewPromptConfig, AppError> {
        let (Some(config_name), Some(prompt_type), Some(parameters)) = (
            request.config_name,
            request.prompt_type,
            request.parameters,
        ) else {
            return Err(AppError::missing_field(
                "Bad request: Missing required fields (config_name, prompt_type, parameters)",
            ));
        };

        let prompt_type = match prompt_type.as_str() {
            "image" => PromptType::Image,
            "video" => PromptType::Video,
            _ => {
                return Err(AppError::invalid_input(
                    "Bad request: Invalid prompt_type. Must be \"image\" or \"video\".",
                ))
            }
        };

        Ok(NewPromptConfig {
            config_name,
            prompt_type,
            parameters,
        })
    }

    /// Save a new prompt configuration
    async fn save_config(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<SaveConfigRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;

        let request = payload.map(|Json(body)| body).map_err(|e| {
            debug!(error = %e, "Save-config body rejected");
            AppError::invalid_input(INVALID_BODY_MESSAGE)
        })?;
        let config = Self::validate_save(request)?;

        let created = resources.storage.insert_config(&auth, config).await?;
        info!(user_id = %auth.user_id(), config_id = %created.id, "Prompt config saved");

        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    /// List the caller's saved configurations, newest-first
    async fn list_configs(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;
        let configs = resources.storage.list_configs(&auth).await?;
        Ok((StatusCode::OK, Json(configs)).into_response())
    }

    /// Delete one of the caller's configurations
    async fn delete_config(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<DeleteConfigRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.verifier.verify_headers(&headers).await?;

        let request = payload.map(|Json(body)| body).map_err(|e| {
            debug!(error = %e, "Delete-config body rejected");
            AppError::invalid_input(INVALID_BODY_MESSAGE)
        })?;
        let Some(config_id) = request.config_id else {
            return Err(AppError::missing_field(
                "Bad request: Missing required field (config_id)",
            ));
        };

        let deleted = resources.storage.delete_config(&auth, config_id).await?;
        if !deleted {
            return Err(AppError::not_found(
                "Configuration not found or not owned by user.",
            ));
        }

        info!(user_id = %auth.user_id(), config_id = %config_id, "Prompt config deleted");
        Ok((
            StatusCode::OK,
            Json(DeleteConfigResponse {
                message: "Configuration deleted successfully".to_owned(),
            }),
        )
            .into_response())
    }
}
