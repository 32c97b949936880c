// ABOUTME: Configuration module for environment-based server settings
// ABOUTME: Re-exports the environment configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Configuration management. Environment-only: there is no configuration
//! file, and provider credentials are read by the provider constructors, not
//! here.

pub mod environment;

pub use environment::ServerConfig;
