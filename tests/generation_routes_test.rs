// ABOUTME: Integration tests for the image and video generation route handlers
// ABOUTME: Covers the JSON contract, fence stripping, history side effects, and failure codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{
    create_test_environment, create_test_environment_with, image_reply, valid_image_form,
    valid_video_form, video_reply, ScriptedLlmProvider,
};
use helpers::axum_test::AxumTestRequest;
use tukang_prompt_server::errors::ErrorResponse;
use tukang_prompt_server::models::{GeneratedImagePrompts, GeneratedVideoPrompts};
use tukang_prompt_server::routes;

// ============================================================================
// Success Paths
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_image_generation_returns_prompts_without_history() {
    let env = create_test_environment();
    env.llm.push_reply(&image_reply());
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .json(&valid_image_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let prompts: GeneratedImagePrompts = response.json();
    assert!(prompts.dall_e_prompt.contains("ginger cat"));
    assert!(prompts.midjourney_prompt.contains("--ar 16:9"));

    // No token means the history write short-circuits with no side effects
    env.assert_no_history_rows().await;
}

#[tokio::test]
async fn test_video_generation_returns_both_fields() {
    let env = create_test_environment();
    env.llm.push_reply(&video_reply());
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-video-prompt")
        .json(&valid_video_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let prompts: GeneratedVideoPrompts = response.json();
    assert!(!prompts.kling_ai_veo_format.is_empty());
    assert!(!prompts.chatgpt_video_idea.is_empty());
}

#[tokio::test]
async fn test_fenced_reply_is_stripped_before_parsing() {
    let env = create_test_environment();
    env.llm.push_reply(
        "```json\n{\"dall_e_prompt\":\"a\",\"midjourney_prompt\":\"b\"}\n```",
    );
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .json(&valid_image_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let prompts: GeneratedImagePrompts = response.json();
    assert_eq!(prompts.dall_e_prompt, "a");
    assert_eq!(prompts.midjourney_prompt, "b");
}

#[tokio::test]
async fn test_authenticated_generation_appends_matching_history() {
    let env = create_test_environment();
    let (user, token) = env.create_user("alice@example.com").await;
    env.llm.push_reply(&image_reply());
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .header("authorization", &format!("Bearer {token}"))
        .json(&valid_image_form())
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // The history write is detached; allow it to complete
    env.wait_for_history_rows(1).await;

    let history_response = AxumTestRequest::get("/api/get-prompt-history")
        .header("authorization", &format!("Bearer {token}"))
        .send(router)
        .await;
    assert_eq!(history_response.status_code(), StatusCode::OK);

    let history: Vec<tukang_prompt_server::models::HistoryEntry> = history_response.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, user.id);
    assert_eq!(history[0].input_parameters, valid_image_form());
    assert_eq!(
        history[0].generated_prompts,
        serde_json::from_str::<serde_json::Value>(&image_reply()).unwrap()
    );
}

// ============================================================================
// Provider Request Shaping
// ============================================================================

#[tokio::test]
async fn test_json_mode_is_requested_from_capable_providers() {
    let env = create_test_environment();
    env.llm.push_reply(&image_reply());
    let router = routes::api_routes(env.resources.clone());

    AxumTestRequest::post("/api/generate-image-prompt")
        .json(&valid_image_form())
        .send(router)
        .await;

    let requests = env.llm.captured_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].response_mime_type.as_deref(),
        Some("application/json")
    );
    // System instruction names the two output keys and forbids fences
    let system = &requests[0].messages[0].content;
    assert!(system.contains("dall_e_prompt"));
    assert!(system.contains("midjourney_prompt"));
    // The rendered user prompt carries every field line, fallbacks included
    let user_prompt = &requests[0].messages[1].content;
    assert!(user_prompt.contains("Tipe Subjek: Hewan"));
    assert!(user_prompt.contains("Prompt Negatif: blur, teks"));
}

#[tokio::test]
async fn test_json_mode_is_omitted_for_text_only_providers() {
    let env = create_test_environment_with(ScriptedLlmProvider::text_only());
    env.llm.push_reply(&image_reply());
    let router = routes::api_routes(env.resources.clone());

    AxumTestRequest::post("/api/generate-image-prompt")
        .json(&valid_image_form())
        .send(router)
        .await;

    let requests = env.llm.captured_requests();
    assert!(requests[0].response_mime_type.is_none());
}

// ============================================================================
// Failure Paths
// ============================================================================

#[tokio::test]
async fn test_invalid_json_reply_is_500_and_writes_no_history() {
    let env = create_test_environment();
    let (_user, token) = env.create_user("alice@example.com").await;
    env.llm.push_reply("this is not json at all");
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .header("authorization", &format!("Bearer {token}"))
        .json(&valid_image_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Gagal memproses respons dari AI. Format tidak valid.");

    // A failed generation is never persisted, token or not
    env.assert_no_history_rows().await;
}

#[tokio::test]
async fn test_reply_missing_expected_fields_is_500() {
    let env = create_test_environment();
    env.llm.push_reply("{\"dall_e_prompt\": \"only one key\"}");
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .json(&valid_image_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "AI response missing expected fields");
}

#[tokio::test]
async fn test_provider_failure_is_500_with_message() {
    let env = create_test_environment();
    env.llm.push_failure("Gemini API error (503): overloaded");
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-video-prompt")
        .json(&valid_video_form())
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("overloaded"));
    env.assert_no_history_rows().await;
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let env = create_test_environment();
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .raw_json_body("{not valid json")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Bad request: Invalid JSON body");
}

#[tokio::test]
async fn test_incomplete_form_is_400() {
    let env = create_test_environment();
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .json(&serde_json::json!({ "subjectType": "Hewan" }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method_is_405_with_error_body() {
    let env = create_test_environment();
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::get("/api/generate-image-prompt")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Method Not Allowed");
}

#[tokio::test]
async fn test_history_write_failure_never_fails_the_response() {
    let env = create_test_environment();
    let (_user, token) = env.create_user("alice@example.com").await;
    env.llm.push_reply(&image_reply());
    env.storage.set_fail_inserts(true);
    let router = routes::api_routes(env.resources.clone());

    let response = AxumTestRequest::post("/api/generate-image-prompt")
        .header("authorization", &format!("Bearer {token}"))
        .json(&valid_image_form())
        .send(router)
        .await;

    // The primary response succeeds even though the history insert fails
    assert_eq!(response.status_code(), StatusCode::OK);
    env.assert_no_history_rows().await;
}
