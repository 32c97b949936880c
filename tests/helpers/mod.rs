// ABOUTME: Shared test helper modules
// ABOUTME: Re-exports the axum request harness for integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

pub mod axum_test;
