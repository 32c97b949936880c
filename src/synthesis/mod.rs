// ABOUTME: Prompt synthesis gateway orchestrating the text-generation provider
// ABOUTME: Renders instructions, parses the strict JSON reply, and logs history detached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Prompt Synthesis Gateway
//!
//! One generation call: render the form into the instruction block, ask the
//! provider for a JSON-only reply, strip an optional Markdown code fence,
//! parse, and validate the two expected string keys. There is exactly one
//! provider attempt per request - a malformed reply is a failure, not a
//! retry trigger.
//!
//! History recording is deliberately decoupled from the response path: after
//! a successful generation, [`SynthesisService::log_history_detached`] spawns
//! a task that re-verifies the caller's token and appends the entry. The
//! response never waits for it, and its failures are logged and swallowed.

pub mod instruction;

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{
    AuthenticatedUser, GeneratedImagePrompts, GeneratedVideoPrompts, ImagePromptFormState,
    NewHistoryEntry, PromptType, VideoPromptFormState,
};
use crate::storage::StorageProvider;

/// User-facing message for an unparseable AI reply
const INVALID_FORMAT_MESSAGE: &str = "Gagal memproses respons dari AI. Format tidak valid.";

/// User-facing message for a reply missing the contract keys
const MISSING_FIELDS_MESSAGE: &str = "AI response missing expected fields";

/// Strip one optional Markdown code fence wrapping `text`.
///
/// Matches a leading ```` ``` ```` with an optional language tag and a
/// trailing ```` ``` ````; anything else is returned trimmed but otherwise
/// untouched.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        // The pattern is a compile-time constant
        #[allow(clippy::unwrap_used)]
        let pattern = Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").unwrap();
        pattern
    });

    let trimmed = text.trim();
    match fence.captures(trimmed).and_then(|c| c.get(2)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Synthesis gateway over injected provider clients
#[derive(Clone)]
pub struct SynthesisService {
    llm: Arc<dyn LlmProvider>,
    storage: Arc<dyn StorageProvider>,
}

impl SynthesisService {
    /// Create a service over the given providers
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { llm, storage }
    }

    /// Generate the DALL-E/Midjourney prompt pair for an image form
    ///
    /// # Errors
    ///
    /// Returns a generation error when the provider call fails and an
    /// invalid-AI-response error when the reply does not satisfy the JSON
    /// contract.
    pub async fn generate_image_prompts(
        &self,
        form: &ImagePromptFormState,
    ) -> AppResult<GeneratedImagePrompts> {
        let details = instruction::render_image_details(form);
        let value = self
            .request_json_object(
                instruction::IMAGE_SYSTEM_INSTRUCTION,
                &instruction::image_user_prompt(&details),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|_| AppError::invalid_ai_response(MISSING_FIELDS_MESSAGE))
    }

    /// Generate the Kling/Veo + ChatGPT prompt pair for a video form
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::generate_image_prompts`].
    pub async fn generate_video_prompts(
        &self,
        form: &VideoPromptFormState,
    ) -> AppResult<GeneratedVideoPrompts> {
        let details = instruction::render_video_details(form);
        let value = self
            .request_json_object(
                instruction::VIDEO_SYSTEM_INSTRUCTION,
                &instruction::video_user_prompt(&details),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|_| AppError::invalid_ai_response(MISSING_FIELDS_MESSAGE))
    }

    /// One provider round-trip returning the parsed JSON object
    async fn request_json_object(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> AppResult<serde_json::Value> {
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(system_instruction),
            ChatMessage::user(user_prompt),
        ]);
        if self.llm.capabilities().supports_json_mode() {
            request = request.with_response_mime_type("application/json");
        }

        let response = self.llm.complete(&request).await?;

        let stripped = strip_code_fence(&response.content);
        serde_json::from_str(stripped).map_err(|e| {
            warn!(error = %e, "AI reply was not valid JSON after fence stripping");
            AppError::invalid_ai_response(INVALID_FORMAT_MESSAGE)
        })
    }

    /// Record a generation exchange into history without blocking the caller.
    ///
    /// With no token, this is a no-op. Otherwise a detached task re-verifies
    /// the token and appends the entry; any failure along the way is logged
    /// and swallowed so the primary response is never delayed or failed by
    /// history bookkeeping.
    pub fn log_history_detached(
        &self,
        access_token: Option<String>,
        prompt_type: PromptType,
        input_parameters: serde_json::Value,
        generated_prompts: serde_json::Value,
    ) {
        let Some(token) = access_token else {
            debug!("History logging skipped, no token on request");
            return;
        };

        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            let user = match storage.get_user(&token).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!("History logging skipped, token no longer resolves to a user");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "History logging skipped, auth provider call failed");
                    return;
                }
            };

            let ctx = AuthenticatedUser {
                user,
                access_token: token,
            };
            let entry = NewHistoryEntry {
                prompt_type,
                input_parameters,
                generated_prompts,
            };
            match storage.insert_history(&ctx, entry).await {
                Ok(()) => {
                    debug!(user_id = %ctx.user_id(), prompt_type = %prompt_type, "History entry saved");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to save history entry");
                }
            }
        });
    }
}
