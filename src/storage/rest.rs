// ABOUTME: REST implementation of the storage provider against a hosted Auth+Storage service
// ABOUTME: Speaks GoTrue-style token verification and PostgREST-style row CRUD
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # REST Storage Provider
//!
//! Implementation of [`StorageProvider`] over the hosted provider's HTTP
//! surface:
//!
//! - `GET {base}/auth/v1/user` resolves a bearer token to a user.
//! - `{base}/rest/v1/<table>` serves row CRUD with `user_id=eq.<id>` filters
//!   and `order=created_at.desc` for newest-first listings.
//!
//! Every request carries the project anon key; row operations additionally
//! forward the caller's bearer token so provider-side row-level security
//! evaluates against the same identity we scope queries by.
//!
//! ## Configuration
//!
//! `DATASTORE_URL` and `DATASTORE_ANON_KEY` are read when the provider is
//! constructed. The constructor performs no network calls; a bad URL or key
//! surfaces on the first real request.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{tables, StorageProvider};
use crate::errors::{AppError, AppResult};
use crate::models::{
    AuthenticatedUser, HistoryEntry, NewHistoryEntry, NewPromptConfig, PromptConfig, PromptType,
    SavedPrompt, SavedVideoPrompt, User,
};

/// Environment variable for the provider base URL
const DATASTORE_URL_ENV: &str = "DATASTORE_URL";

/// Environment variable for the provider anon key
const DATASTORE_ANON_KEY_ENV: &str = "DATASTORE_ANON_KEY";

// ============================================================================
// Wire Types
// ============================================================================

/// User payload returned by the auth endpoint
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Error payload returned by the rest endpoints
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    message: Option<String>,
}

/// Insert row for `user_prompt_configs`
#[derive(Debug, Serialize)]
struct ConfigRow<'a> {
    user_id: Uuid,
    config_name: &'a str,
    prompt_type: PromptType,
    parameters: &'a serde_json::Value,
}

/// Insert row for `prompt_history`
#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    user_id: Uuid,
    prompt_type: PromptType,
    input_parameters: &'a serde_json::Value,
    generated_prompts: &'a serde_json::Value,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// REST-backed storage provider
pub struct RestStorageProvider {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl RestStorageProvider {
    /// Create a new provider for the given base URL and anon key
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            anon_key: anon_key.into(),
            client: Client::new(),
        }
    }

    /// Create a provider from `DATASTORE_URL` and `DATASTORE_ANON_KEY`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either variable is not set.
    pub fn from_env() -> AppResult<Self> {
        let base_url = env::var(DATASTORE_URL_ENV).map_err(|_| {
            AppError::config(format!("{DATASTORE_URL_ENV} environment variable not set"))
        })?;
        let anon_key = env::var(DATASTORE_ANON_KEY_ENV).map_err(|_| {
            AppError::config(format!(
                "{DATASTORE_ANON_KEY_ENV} environment variable not set"
            ))
        })?;
        Ok(Self::new(base_url, anon_key))
    }

    /// URL of the token-verification endpoint
    fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.base_url)
    }

    /// URL of a row collection
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Attach the anon key and the caller's bearer token
    fn authed(&self, builder: RequestBuilder, access_token: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    /// Turn a non-success response into a storage error carrying the
    /// provider's message when one is present
    async fn storage_error(context: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RestErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        AppError::storage(format!("{context} failed ({status}): {message}"))
    }

    /// Fetch all rows of `table` owned by the caller, newest-first
    async fn list_rows<T: serde::de::DeserializeOwned>(
        &self,
        ctx: &AuthenticatedUser,
        table: &str,
    ) -> AppResult<Vec<T>> {
        let owner_filter = format!("eq.{}", ctx.user_id());
        let request = self.client.get(self.table_url(table)).query(&[
            ("select", "*"),
            ("user_id", owner_filter.as_str()),
            ("order", "created_at.desc"),
        ]);
        let response = self
            .authed(request, &ctx.access_token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Query of {table} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::storage_error("Query", response).await);
        }
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::storage(format!("Malformed {table} response: {e}")))
    }
}

#[async_trait]
impl StorageProvider for RestStorageProvider {
    fn name(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip(self, access_token))]
    async fn get_user(&self, access_token: &str) -> AppResult<Option<User>> {
        let request = self.client.get(self.auth_url());
        let response = self
            .authed(request, access_token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Auth provider unreachable: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // The provider answered; the token just does not resolve to a user
            debug!(status = %status, "Token rejected by auth provider");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::storage_error("Token verification", response).await);
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| AppError::storage(format!("Malformed auth response: {e}")))?;
        Ok(Some(User {
            id: user.id,
            email: user.email,
        }))
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    async fn list_configs(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<PromptConfig>> {
        self.list_rows(ctx, tables::USER_PROMPT_CONFIGS).await
    }

    #[instrument(skip(self, ctx, config), fields(user_id = %ctx.user_id()))]
    async fn insert_config(
        &self,
        ctx: &AuthenticatedUser,
        config: NewPromptConfig,
    ) -> AppResult<PromptConfig> {
        let row = ConfigRow {
            user_id: ctx.user_id(),
            config_name: &config.config_name,
            prompt_type: config.prompt_type,
            parameters: &config.parameters,
        };
        let request = self
            .client
            .post(self.table_url(tables::USER_PROMPT_CONFIGS))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self
            .authed(request, &ctx.access_token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Config insert failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::storage_error("Config insert", response).await);
        }

        // The provider returns the representation as a one-element array
        let mut rows: Vec<PromptConfig> = response
            .json()
            .await
            .map_err(|e| AppError::storage(format!("Malformed insert response: {e}")))?;
        rows.pop()
            .ok_or_else(|| AppError::storage("Config insert returned no row"))
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id(), config_id = %config_id))]
    async fn delete_config(
        &self,
        ctx: &AuthenticatedUser,
        config_id: Uuid,
    ) -> AppResult<bool> {
        // id and user_id are matched in one call so a foreign row can never
        // be deleted, and its absence is indistinguishable from a miss
        let id_filter = format!("eq.{config_id}");
        let owner_filter = format!("eq.{}", ctx.user_id());
        let request = self
            .client
            .delete(self.table_url(tables::USER_PROMPT_CONFIGS))
            .header("Prefer", "return=representation")
            .query(&[
                ("id", id_filter.as_str()),
                ("user_id", owner_filter.as_str()),
            ]);
        let response = self
            .authed(request, &ctx.access_token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Config delete failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::storage_error("Config delete", response).await);
        }

        let deleted: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AppError::storage(format!("Malformed delete response: {e}")))?;
        if deleted.is_empty() {
            warn!("Delete matched no rows");
            return Ok(false);
        }
        Ok(true)
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    async fn list_history(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<HistoryEntry>> {
        self.list_rows(ctx, tables::PROMPT_HISTORY).await
    }

    #[instrument(skip(self, ctx, entry), fields(user_id = %ctx.user_id()))]
    async fn insert_history(
        &self,
        ctx: &AuthenticatedUser,
        entry: NewHistoryEntry,
    ) -> AppResult<()> {
        let row = HistoryRow {
            user_id: ctx.user_id(),
            prompt_type: entry.prompt_type,
            input_parameters: &entry.input_parameters,
            generated_prompts: &entry.generated_prompts,
        };
        let request = self
            .client
            .post(self.table_url(tables::PROMPT_HISTORY))
            .header("Prefer", "return=minimal")
            .json(&row);
        let response = self
            .authed(request, &ctx.access_token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("History insert failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::storage_error("History insert", response).await);
        }
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    async fn list_saved_prompts(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<SavedPrompt>> {
        self.list_rows(ctx, tables::SAVED_PROMPTS).await
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    async fn list_saved_video_prompts(
        &self,
        ctx: &AuthenticatedUser,
    ) -> AppResult<Vec<SavedVideoPrompt>> {
        self.list_rows(ctx, tables::SAVED_VIDEO_PROMPTS).await
    }
}

impl Debug for RestStorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RestStorageProvider")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
