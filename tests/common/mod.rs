// ABOUTME: Shared test fixtures: scripted LLM provider, in-memory storage, server resources
// ABOUTME: Builds routers over stub providers so tests run without any network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use tukang_prompt_server::config::ServerConfig;
use tukang_prompt_server::errors::AppError;
use tukang_prompt_server::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use tukang_prompt_server::models::User;
use tukang_prompt_server::resources::ServerResources;
use tukang_prompt_server::storage::InMemoryStorageProvider;

/// A scripted reply or failure for one `complete` call
enum Script {
    Reply(String),
    Fail(String),
}

/// Text-generation stub returning pre-scripted replies in order.
///
/// Captures every request so tests can assert on the system instruction and
/// the requested response MIME type.
pub struct ScriptedLlmProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
    capabilities: LlmCapabilities,
}

impl ScriptedLlmProvider {
    /// JSON-mode-capable stub (mirrors the production provider)
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            capabilities: LlmCapabilities::json_capable(),
        }
    }

    /// Stub without JSON mode, for the instruction-only path
    pub fn text_only() -> Self {
        Self {
            capabilities: LlmCapabilities::text_only(),
            ..Self::new()
        }
    }

    /// Queue a successful reply
    pub fn push_reply(&self, text: &str) {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Reply(text.to_owned()));
    }

    /// Queue a provider failure
    pub fn push_failure(&self, message: &str) {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Fail(message.to_owned()));
    }

    /// Requests seen so far
    pub fn captured_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-1"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["scripted-1"]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedLlmProvider ran out of scripted replies");
        match script {
            Script::Reply(content) => Ok(ChatResponse {
                content,
                model: "scripted-1".to_owned(),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Script::Fail(message) => Err(AppError::generation(message)),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Everything a route test needs: the resources plus handles to the stubs
pub struct TestEnvironment {
    pub resources: Arc<ServerResources>,
    pub storage: Arc<InMemoryStorageProvider>,
    pub llm: Arc<ScriptedLlmProvider>,
}

/// Build server resources over fresh stub providers
pub fn create_test_environment() -> TestEnvironment {
    create_test_environment_with(ScriptedLlmProvider::new())
}

/// Build server resources over a specific LLM stub
pub fn create_test_environment_with(llm: ScriptedLlmProvider) -> TestEnvironment {
    let storage = Arc::new(InMemoryStorageProvider::new());
    let llm = Arc::new(llm);
    let config = ServerConfig::from_env().expect("Test config should load from defaults");
    let resources = Arc::new(ServerResources::new(
        Arc::clone(&storage) as _,
        Arc::clone(&llm) as _,
        config,
    ));
    TestEnvironment {
        resources,
        storage,
        llm,
    }
}

impl TestEnvironment {
    /// Register a user and return it with its bearer token
    pub async fn create_user(&self, email: &str) -> (User, String) {
        let token = format!("test-token-{email}");
        let user = self.storage.register_user(token.clone(), email).await;
        (user, token)
    }

    /// Wait until the storage holds `expected` history rows in total
    pub async fn wait_for_history_rows(&self, expected: usize) {
        for _ in 0..200 {
            if self.storage.total_history_rows().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "history did not reach {expected} rows, have {}",
            self.storage.total_history_rows().await
        );
    }

    /// Assert, over a settling window, that no history row ever appears
    pub async fn assert_no_history_rows(&self) {
        for _ in 0..20 {
            assert_eq!(self.storage.total_history_rows().await, 0);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// A complete, valid image form body
pub fn valid_image_form() -> Value {
    json!({
        "subjectType": "Hewan",
        "subjectDescription": "Kucing oranye bermata hijau",
        "subjectCount": "1",
        "subjectAppearanceDetails": "Bulu tebal, syal merah",
        "actionDescription": "Melompat di antara atap",
        "settingLocation": "Kota tua di Eropa",
        "settingTime": "Senja",
        "settingWeather": "Gerimis",
        "settingAtmosphere": "Misterius",
        "cameraAngle": "Low angle",
        "shotDistance": "Medium shot",
        "artisticCategory": "Fotografi",
        "artisticSubStyle": "Cinematic",
        "artistInspiration": "Tidak ada",
        "lightingType": "Golden hour",
        "colorPaletteDescription": "Hangat dengan aksen jingga",
        "dominantColor": "Jingga",
        "detailLevel": "Sangat tinggi",
        "aspectRatio": "16:9",
        "negativePrompt": "blur, teks"
    })
}

/// A complete, valid video form body
pub fn valid_video_form() -> Value {
    json!({
        "sceneDescription": "Mobil klasik melaju di jalan pesisir",
        "estimatedDuration": "5 detik",
        "mainCameraMovement": "Tracking shot",
        "cameraMovementSpeed": "Sedang",
        "videoActionIntensity": "Sedang",
        "overallVideoMood": "Nostalgia",
        "subjectType": "Kendaraan",
        "subjectDescription": "Mobil konvertibel merah tahun 60-an",
        "settingLocation": "Pantai Mediterania",
        "artisticCategory": "Sinematik",
        "aspectRatio": "16:9",
        "negativePrompt": "glitch"
    })
}

/// A provider reply satisfying the image contract
pub fn image_reply() -> String {
    json!({
        "dall_e_prompt": "A ginger cat leaping across old European rooftops at dusk",
        "midjourney_prompt": "ginger cat, rooftops, dusk, cinematic --ar 16:9"
    })
    .to_string()
}

/// A provider reply satisfying the video contract
pub fn video_reply() -> String {
    json!({
        "kling_ai_veo_format": "Tracking shot of a red 60s convertible on a coastal road",
        "chatgpt_video_idea": "A nostalgic five-second clip following a classic car"
    })
    .to_string()
}
