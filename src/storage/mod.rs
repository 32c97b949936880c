// ABOUTME: Storage abstraction layer for the external Auth+Storage provider
// ABOUTME: Plugin architecture with a REST backend and an in-memory backend for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Auth+Storage Provider Interface
//!
//! The datastore and its authentication service are one external collaborator
//! exposing a narrow contract: verify-token, query-rows-by-owner, insert-row,
//! delete-row-by-owner. This module defines that contract as an async trait
//! so the REST backend and the in-memory test backend are interchangeable.
//!
//! Every row operation takes the caller's [`AuthenticatedUser`]: the verified
//! user id scopes the query, and the bearer token is forwarded so the
//! provider's own row-level security applies as a second fence.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{
    AuthenticatedUser, HistoryEntry, NewHistoryEntry, NewPromptConfig, PromptConfig, SavedPrompt,
    SavedVideoPrompt, User,
};

pub mod memory;
pub mod rest;

pub use memory::InMemoryStorageProvider;
pub use rest::RestStorageProvider;

/// Logical collection names in the datastore
pub mod tables {
    /// Saved form-parameter snapshots
    pub const USER_PROMPT_CONFIGS: &str = "user_prompt_configs";
    /// Append-only generation history
    pub const PROMPT_HISTORY: &str = "prompt_history";
    /// Kept image prompt pairs
    pub const SAVED_PROMPTS: &str = "saved_prompts";
    /// Kept video prompt pairs
    pub const SAVED_VIDEO_PROMPTS: &str = "saved_video_prompts";
}

/// Core storage abstraction trait.
///
/// All backends must implement this trait to provide a consistent interface
/// for the handlers and the synthesis gateway. Listings are newest-first by
/// `created_at`. Deletion matches `id` and `user_id` in a single operation;
/// a row owned by another user is indistinguishable from a missing row.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Backend identifier for logging
    fn name(&self) -> &'static str;

    // ================================
    // Token Verification
    // ================================

    /// Resolve a bearer token to a user via the Auth provider.
    ///
    /// `Ok(None)` means the provider answered but no user matched the token;
    /// callers must treat that as an authentication failure, never as a
    /// success with no user.
    async fn get_user(&self, access_token: &str) -> AppResult<Option<User>>;

    // ================================
    // Prompt Configs
    // ================================

    /// List the caller's saved configs, newest-first
    async fn list_configs(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<PromptConfig>>;

    /// Insert a new config owned by the caller, returning the created row
    async fn insert_config(
        &self,
        ctx: &AuthenticatedUser,
        config: NewPromptConfig,
    ) -> AppResult<PromptConfig>;

    /// Delete a config by id, scoped to the caller.
    ///
    /// Returns `false` when no row matched (absent or owned by someone else).
    async fn delete_config(&self, ctx: &AuthenticatedUser, config_id: uuid::Uuid)
        -> AppResult<bool>;

    // ================================
    // Prompt History
    // ================================

    /// List the caller's generation history, newest-first
    async fn list_history(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<HistoryEntry>>;

    /// Append one history entry owned by the caller
    async fn insert_history(&self, ctx: &AuthenticatedUser, entry: NewHistoryEntry)
        -> AppResult<()>;

    // ================================
    // Saved Prompts
    // ================================

    /// List the caller's kept image prompts, newest-first
    async fn list_saved_prompts(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<SavedPrompt>>;

    /// List the caller's kept video prompts, newest-first
    async fn list_saved_video_prompts(
        &self,
        ctx: &AuthenticatedUser,
    ) -> AppResult<Vec<SavedVideoPrompt>>;
}
