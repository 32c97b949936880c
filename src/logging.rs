// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Initializes the tracing subscriber with env-filter and text or JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Structured logging setup.
//!
//! Log verbosity is an environment concern (`RUST_LOG`), never a code
//! variant: differing diagnostic verbosity between deployments is handled by
//! the filter, not by duplicated code paths.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::environment::LogFormat;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "tukang_prompt_server=debug,tower_http=debug,info";

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise falls back to a filter that keeps
/// this crate and the HTTP layer at debug. Call once at binary startup.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
