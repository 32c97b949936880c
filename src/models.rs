// ABOUTME: Core domain models for users, prompt configs, history, and generated prompts
// ABOUTME: Includes the tagged form-state variants validated at the request boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Domain models shared across handlers, the storage gateway, and synthesis.
//!
//! Form payloads are explicit tagged variants ([`ImagePromptFormState`] /
//! [`VideoPromptFormState`]) deserialized at the boundary; required fields
//! fail fast during body parsing, optional fields carry `Option` and render
//! as fixed fallback text during instruction synthesis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user identity resolved from a bearer token by the Auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user id
    pub id: Uuid,
    /// Email address, when the provider exposes one
    #[serde(default)]
    pub email: Option<String>,
}

/// A verified caller: the resolved user plus the bearer token that proved it.
///
/// The token is held only for the duration of one request and is forwarded to
/// the storage provider so row-level security applies on the provider side as
/// well as in our own `user_id` scoping.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Resolved user identity
    pub user: User,
    /// The caller's bearer token, forwarded on storage calls
    pub access_token: String,
}

impl AuthenticatedUser {
    /// The verified user id every row operation is scoped by
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Which generator a prompt targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    /// Image prompt (DALL-E / Midjourney)
    Image,
    /// Video prompt (Kling / Veo / ChatGPT concept)
    Video,
}

impl PromptType {
    /// String form used on the wire and in the datastore
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for PromptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, saved snapshot of form parameters a user can reload later.
///
/// Owned exclusively by `user_id`; inserted and deleted on explicit user
/// action, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Row id
    pub id: Uuid,
    /// Owning user; always equals the id resolved from the caller's token
    pub user_id: Uuid,
    /// User-chosen configuration name
    pub config_name: String,
    /// Which form the parameters belong to
    pub prompt_type: PromptType,
    /// Opaque form parameters; not validated beyond presence
    pub parameters: serde_json::Value,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a new prompt config
#[derive(Debug, Clone, Serialize)]
pub struct NewPromptConfig {
    /// User-chosen configuration name
    pub config_name: String,
    /// Which form the parameters belong to
    pub prompt_type: PromptType,
    /// Opaque form parameters
    pub parameters: serde_json::Value,
}

/// An immutable record of one generation request/response pair.
///
/// Appended automatically after a successful generation when a valid token is
/// present; never updated or deleted by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Which generator was used
    pub prompt_type: PromptType,
    /// The form state the prompts were generated from
    pub input_parameters: serde_json::Value,
    /// The generated prompt pair, as returned to the caller
    pub generated_prompts: serde_json::Value,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a history entry
#[derive(Debug, Clone, Serialize)]
pub struct NewHistoryEntry {
    /// Which generator was used
    pub prompt_type: PromptType,
    /// The form state the prompts were generated from
    pub input_parameters: serde_json::Value,
    /// The generated prompt pair
    pub generated_prompts: serde_json::Value,
}

/// A generated image prompt pair a user chose to keep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPrompt {
    /// Row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Optional user-chosen title
    #[serde(default)]
    pub prompt_title: Option<String>,
    /// Saved DALL-E prompt text
    #[serde(default)]
    pub dall_e_prompt: Option<String>,
    /// Saved Midjourney prompt text
    #[serde(default)]
    pub midjourney_prompt: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A generated video prompt pair a user chose to keep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedVideoPrompt {
    /// Row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Optional user-chosen title
    #[serde(default)]
    pub prompt_title: Option<String>,
    /// Saved Kling/Veo prompt text
    #[serde(default)]
    pub kling_ai_veo_format: Option<String>,
    /// Saved ChatGPT video concept text
    #[serde(default)]
    pub chatgpt_video_idea: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// The strict output contract for image generation.
///
/// The AI reply must deep-parse to exactly these two string fields; anything
/// else is a generation failure and is never persisted as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImagePrompts {
    /// Descriptive, narrative prompt for DALL-E
    pub dall_e_prompt: String,
    /// Keyword/parameter-oriented prompt for Midjourney
    pub midjourney_prompt: String,
}

/// The strict output contract for video generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedVideoPrompts {
    /// Cinematic prompt optimized for Kling AI / Google Veo
    pub kling_ai_veo_format: String,
    /// Narrative video concept for ChatGPT brainstorming
    pub chatgpt_video_idea: String,
}

/// Image prompt form state.
///
/// Field names follow the client's camelCase wire format. Required fields are
/// plain `String` so an incomplete body is rejected during parsing; optional
/// fields render fixed fallback text in the synthesized instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePromptFormState {
    /// Subject category (person, animal, object, ...)
    pub subject_type: String,
    /// Free-text subject description
    pub subject_description: String,
    /// How many subjects appear
    pub subject_count: String,
    /// Appearance details (clothing, expression, ...)
    #[serde(default)]
    pub subject_appearance_details: Option<String>,
    /// What the subject is doing
    pub action_description: String,
    /// Where the scene takes place
    pub setting_location: String,
    /// Time of day / era
    pub setting_time: String,
    /// Weather, when relevant
    #[serde(default)]
    pub setting_weather: Option<String>,
    /// Mood of the scene
    pub setting_atmosphere: String,
    /// Camera angle
    pub camera_angle: String,
    /// Shot distance (close-up, wide, ...)
    pub shot_distance: String,
    /// Artistic category (photography, painting, 3D, ...)
    pub artistic_category: String,
    /// Sub-style within the category
    #[serde(default)]
    pub artistic_sub_style: Option<String>,
    /// Artist whose style to evoke
    #[serde(default)]
    pub artist_inspiration: Option<String>,
    /// Lighting type
    pub lighting_type: String,
    /// Color palette description
    pub color_palette_description: String,
    /// Dominant color, when specified
    #[serde(default)]
    pub dominant_color: Option<String>,
    /// Detail level
    pub detail_level: String,
    /// Target aspect ratio
    pub aspect_ratio: String,
    /// Elements to exclude
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// Video prompt form state (camelCase wire format, same conventions as
/// [`ImagePromptFormState`])
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPromptFormState {
    /// Main scene description
    pub scene_description: String,
    /// Estimated clip duration
    pub estimated_duration: String,
    /// Primary camera movement
    pub main_camera_movement: String,
    /// Camera movement speed
    pub camera_movement_speed: String,
    /// Action intensity
    pub video_action_intensity: String,
    /// Overall mood of the video
    pub overall_video_mood: String,
    /// Subject category, when there is a subject
    #[serde(default)]
    pub subject_type: Option<String>,
    /// Subject description, when there is a subject
    #[serde(default)]
    pub subject_description: Option<String>,
    /// Setting location, when specified
    #[serde(default)]
    pub setting_location: Option<String>,
    /// Artistic category of the video
    pub artistic_category: String,
    /// Target aspect ratio
    pub aspect_ratio: String,
    /// Elements to exclude
    #[serde(default)]
    pub negative_prompt: Option<String>,
}
