// ABOUTME: Instruction templates for the text-generation provider
// ABOUTME: Renders form state into the fixed Indonesian field-label block with fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Instruction Rendering
//!
//! Turns a validated form state into the natural-language block the model is
//! prompted with. Field labels are fixed; an omitted optional field renders
//! its fallback text (`Tidak ada` / `Tidak ditentukan`) instead of dropping
//! the line, so the model always sees a complete, uniformly shaped
//! description.

use std::fmt::Write as _;

use crate::models::{ImagePromptFormState, VideoPromptFormState};

/// Fallback for optional free-text fields
const FALLBACK_NONE: &str = "Tidak ada";

/// Fallback for optional selection fields
const FALLBACK_UNSPECIFIED: &str = "Tidak ditentukan";

/// System instruction for image prompt generation.
///
/// Names the two output keys, demands a bare JSON object with exactly those
/// two string keys, and forbids prose or code fences around it.
pub const IMAGE_SYSTEM_INSTRUCTION: &str = "Anda adalah asisten ahli dalam membuat prompt untuk model AI generatif gambar seperti DALL-E dan Midjourney. Berdasarkan detail input pengguna, buatkan dua prompt: satu untuk DALL-E (lebih deskriptif dan naratif) dan satu untuk Midjourney (lebih ke kata kunci dan parameter teknis). Kembalikan HANYA objek JSON dengan format {\"dall_e_prompt\": \"...\", \"midjourney_prompt\": \"...\"}. Jangan tambahkan teks lain atau markdown code fences di luar JSON.";

/// System instruction for video prompt generation
pub const VIDEO_SYSTEM_INSTRUCTION: &str = "Anda adalah asisten ahli dalam membuat prompt untuk model AI generatif video seperti Kling AI atau Google Veo, dan juga untuk menghasilkan ide konsep video untuk ChatGPT. Berdasarkan detail input pengguna, buatkan dua output: pertama, prompt video yang dioptimalkan untuk Kling/Veo (fokus pada deskripsi visual, gerakan, dan gaya sinematik), dan kedua, deskripsi ide video yang lebih naratif untuk ChatGPT yang bisa digunakan untuk brainstorming atau script. Kembalikan HANYA objek JSON dengan format {\"kling_ai_veo_format\": \"...\", \"chatgpt_video_idea\": \"...\"}. Jangan tambahkan teks lain atau markdown code fences di luar JSON.";

/// Render an optional field with its fallback text
fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}

/// Append one labeled line to the detail block
fn push_line(block: &mut String, label: &str, value: &str) {
    // Infallible for String targets
    let _ = writeln!(block, "{label}: {value}");
}

/// Render the image form into the labeled detail block
#[must_use]
pub fn render_image_details(form: &ImagePromptFormState) -> String {
    let mut block = String::new();
    push_line(&mut block, "Tipe Subjek", &form.subject_type);
    push_line(&mut block, "Deskripsi Subjek", &form.subject_description);
    push_line(&mut block, "Jumlah Subjek", &form.subject_count);
    push_line(
        &mut block,
        "Detail Penampilan Subjek",
        or_fallback(form.subject_appearance_details.as_deref(), FALLBACK_NONE),
    );
    push_line(&mut block, "Aksi/Pose", &form.action_description);
    push_line(&mut block, "Lokasi Setting", &form.setting_location);
    push_line(&mut block, "Waktu Setting", &form.setting_time);
    push_line(
        &mut block,
        "Cuaca Setting",
        or_fallback(form.setting_weather.as_deref(), FALLBACK_UNSPECIFIED),
    );
    push_line(&mut block, "Atmosfer Setting", &form.setting_atmosphere);
    push_line(&mut block, "Sudut Kamera", &form.camera_angle);
    push_line(&mut block, "Jarak Tembak", &form.shot_distance);
    push_line(&mut block, "Kategori Artistik", &form.artistic_category);
    push_line(
        &mut block,
        "Sub-Gaya Artistik",
        or_fallback(form.artistic_sub_style.as_deref(), FALLBACK_NONE),
    );
    push_line(
        &mut block,
        "Inspirasi Seniman",
        or_fallback(form.artist_inspiration.as_deref(), FALLBACK_NONE),
    );
    push_line(&mut block, "Tipe Pencahayaan", &form.lighting_type);
    push_line(
        &mut block,
        "Deskripsi Palet Warna",
        &form.color_palette_description,
    );
    push_line(
        &mut block,
        "Warna Dominan",
        or_fallback(form.dominant_color.as_deref(), FALLBACK_UNSPECIFIED),
    );
    push_line(&mut block, "Tingkat Detail", &form.detail_level);
    push_line(&mut block, "Aspect Ratio", &form.aspect_ratio);
    push_line(
        &mut block,
        "Prompt Negatif",
        or_fallback(form.negative_prompt.as_deref(), FALLBACK_NONE),
    );
    block
}

/// Render the video form into the labeled detail block
#[must_use]
pub fn render_video_details(form: &VideoPromptFormState) -> String {
    let mut block = String::new();
    push_line(&mut block, "Deskripsi Adegan Utama", &form.scene_description);
    push_line(&mut block, "Estimasi Durasi", &form.estimated_duration);
    push_line(&mut block, "Gerakan Kamera Utama", &form.main_camera_movement);
    push_line(
        &mut block,
        "Kecepatan Gerakan Kamera",
        &form.camera_movement_speed,
    );
    push_line(&mut block, "Intensitas Aksi", &form.video_action_intensity);
    push_line(&mut block, "Mood Video Keseluruhan", &form.overall_video_mood);
    push_line(
        &mut block,
        "Tipe Subjek (jika ada)",
        or_fallback(form.subject_type.as_deref(), FALLBACK_NONE),
    );
    push_line(
        &mut block,
        "Deskripsi Subjek (jika ada)",
        or_fallback(form.subject_description.as_deref(), FALLBACK_NONE),
    );
    push_line(
        &mut block,
        "Lokasi Setting",
        or_fallback(form.setting_location.as_deref(), FALLBACK_UNSPECIFIED),
    );
    push_line(
        &mut block,
        "Kategori Artistik Video",
        &form.artistic_category,
    );
    push_line(&mut block, "Aspect Ratio", &form.aspect_ratio);
    push_line(
        &mut block,
        "Prompt Negatif",
        or_fallback(form.negative_prompt.as_deref(), FALLBACK_NONE),
    );
    block
}

/// Wrap the image detail block in the user prompt
#[must_use]
pub fn image_user_prompt(details: &str) -> String {
    format!(
        "Berikut adalah detail untuk gambar yang ingin dibuat: {details}. Tolong generate prompt DALL-E dan Midjourney."
    )
}

/// Wrap the video detail block in the user prompt
#[must_use]
pub fn video_user_prompt(details: &str) -> String {
    format!(
        "Berikut adalah detail untuk video yang ingin dibuat: {details}. Tolong generate prompt format Kling/Veo dan ide video untuk ChatGPT."
    )
}
