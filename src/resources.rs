// ABOUTME: Shared server resources container with constructor-injected provider clients
// ABOUTME: Builds the token verifier and synthesis service over the injected providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Server Resources
//!
//! All handlers receive one [`ServerResources`] via axum state. Provider
//! clients are injected here as trait objects rather than instantiated at
//! module load, so tests substitute stubs and no hidden shared state exists
//! outside this container.

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::storage::{RestStorageProvider, StorageProvider};
use crate::synthesis::SynthesisService;

/// Shared application state available to all handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Auth+Storage provider client
    pub storage: Arc<dyn StorageProvider>,
    /// Text-generation provider client
    pub llm: Arc<dyn LlmProvider>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Token verifier over the storage provider
    pub verifier: TokenVerifier,
    /// Prompt synthesis gateway over both providers
    pub synthesis: SynthesisService,
}

impl ServerResources {
    /// Assemble resources from explicit provider clients
    #[must_use]
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        llm: Arc<dyn LlmProvider>,
        config: ServerConfig,
    ) -> Self {
        let verifier = TokenVerifier::new(Arc::clone(&storage));
        let synthesis = SynthesisService::new(Arc::clone(&llm), Arc::clone(&storage));
        Self {
            storage,
            llm,
            config: Arc::new(config),
            verifier,
            synthesis,
        }
    }

    /// Assemble production resources from the environment.
    ///
    /// Reads provider credentials without probing either provider over the
    /// network.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required variable is missing or
    /// invalid.
    pub fn from_env() -> AppResult<Self> {
        let config = ServerConfig::from_env()?;
        let storage = Arc::new(RestStorageProvider::from_env()?);
        let llm = Arc::new(GeminiProvider::from_env()?);
        Ok(Self::new(storage, llm, config))
    }
}
