// ABOUTME: In-memory storage provider for tests and local development
// ABOUTME: Token registry plus per-user rows with call counting and failure injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # In-Memory Storage Provider
//!
//! A self-contained [`StorageProvider`] backend holding everything in process
//! memory. Used by the test suite and available for local development without
//! a hosted datastore.
//!
//! Rows keep insertion order internally; listings iterate in reverse so the
//! newest-first ordering contract holds. The auth call counter lets tests
//! assert that an empty token short-circuits before reaching the provider,
//! and `set_fail_inserts` simulates a provider outage for the best-effort
//! history path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StorageProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{
    AuthenticatedUser, HistoryEntry, NewHistoryEntry, NewPromptConfig, PromptConfig, SavedPrompt,
    SavedVideoPrompt, User,
};

/// Mutable collections behind the lock
#[derive(Default)]
struct State {
    tokens: HashMap<String, User>,
    configs: Vec<PromptConfig>,
    history: Vec<HistoryEntry>,
    saved_prompts: Vec<SavedPrompt>,
    saved_video_prompts: Vec<SavedVideoPrompt>,
}

/// In-memory storage backend
#[derive(Default)]
pub struct InMemoryStorageProvider {
    state: RwLock<State>,
    get_user_calls: AtomicUsize,
    fail_inserts: AtomicBool,
}

impl InMemoryStorageProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user reachable through `token`, returning the identity
    pub async fn register_user(&self, token: impl Into<String>, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_owned()),
        };
        self.state
            .write()
            .await
            .tokens
            .insert(token.into(), user.clone());
        user
    }

    /// How many times `get_user` has been called
    #[must_use]
    pub fn get_user_call_count(&self) -> usize {
        self.get_user_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent insert operations fail, simulating a provider outage
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Total history rows across all users (test observability)
    pub async fn total_history_rows(&self) -> usize {
        self.state.read().await.history.len()
    }

    /// Seed a kept image prompt for a user (test setup)
    pub async fn seed_saved_prompt(&self, user_id: Uuid, title: &str, dall_e: &str) {
        let mut state = self.state.write().await;
        state.saved_prompts.push(SavedPrompt {
            id: Uuid::new_v4(),
            user_id,
            prompt_title: Some(title.to_owned()),
            dall_e_prompt: Some(dall_e.to_owned()),
            midjourney_prompt: None,
            created_at: Utc::now(),
        });
    }

    /// Seed a kept video prompt for a user (test setup)
    pub async fn seed_saved_video_prompt(&self, user_id: Uuid, title: &str, kling: &str) {
        let mut state = self.state.write().await;
        state.saved_video_prompts.push(SavedVideoPrompt {
            id: Uuid::new_v4(),
            user_id,
            prompt_title: Some(title.to_owned()),
            kling_ai_veo_format: Some(kling.to_owned()),
            chatgpt_video_idea: None,
            created_at: Utc::now(),
        });
    }

    fn check_inserts(&self) -> AppResult<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated store outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorageProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, access_token: &str) -> AppResult<Option<User>> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.read().await.tokens.get(access_token).cloned())
    }

    async fn list_configs(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<PromptConfig>> {
        let state = self.state.read().await;
        Ok(state
            .configs
            .iter()
            .rev()
            .filter(|c| c.user_id == ctx.user_id())
            .cloned()
            .collect())
    }

    async fn insert_config(
        &self,
        ctx: &AuthenticatedUser,
        config: NewPromptConfig,
    ) -> AppResult<PromptConfig> {
        self.check_inserts()?;
        let now = Utc::now();
        let row = PromptConfig {
            id: Uuid::new_v4(),
            user_id: ctx.user_id(),
            config_name: config.config_name,
            prompt_type: config.prompt_type,
            parameters: config.parameters,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.configs.push(row.clone());
        Ok(row)
    }

    async fn delete_config(
        &self,
        ctx: &AuthenticatedUser,
        config_id: Uuid,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.configs.len();
        state
            .configs
            .retain(|c| !(c.id == config_id && c.user_id == ctx.user_id()));
        Ok(state.configs.len() < before)
    }

    async fn list_history(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<HistoryEntry>> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|h| h.user_id == ctx.user_id())
            .cloned()
            .collect())
    }

    async fn insert_history(
        &self,
        ctx: &AuthenticatedUser,
        entry: NewHistoryEntry,
    ) -> AppResult<()> {
        self.check_inserts()?;
        let row = HistoryEntry {
            id: Uuid::new_v4(),
            user_id: ctx.user_id(),
            prompt_type: entry.prompt_type,
            input_parameters: entry.input_parameters,
            generated_prompts: entry.generated_prompts,
            created_at: Utc::now(),
        };
        self.state.write().await.history.push(row);
        Ok(())
    }

    async fn list_saved_prompts(&self, ctx: &AuthenticatedUser) -> AppResult<Vec<SavedPrompt>> {
        let state = self.state.read().await;
        Ok(state
            .saved_prompts
            .iter()
            .rev()
            .filter(|p| p.user_id == ctx.user_id())
            .cloned()
            .collect())
    }

    async fn list_saved_video_prompts(
        &self,
        ctx: &AuthenticatedUser,
    ) -> AppResult<Vec<SavedVideoPrompt>> {
        let state = self.state.read().await;
        Ok(state
            .saved_video_prompts
            .iter()
            .rev()
            .filter(|p| p.user_id == ctx.user_id())
            .cloned()
            .collect())
    }
}
