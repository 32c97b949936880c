// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses host, port, CORS, timeout, and log format from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! Environment-based configuration management.
//!
//! This covers the HTTP server itself. Provider credentials
//! (`DATASTORE_URL`, `DATASTORE_ANON_KEY`, `GENERATION_API_KEY`) are read by
//! the provider constructors so that a missing credential surfaces when the
//! provider is needed; the server never probes provider endpoints at startup.

use std::env;

use crate::errors::{AppError, AppResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// Structured JSON output for log aggregation
    Json,
}

impl LogFormat {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `HTTP_PORT`            | `8080`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
/// | `LOG_FORMAT`           | `text`                  |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub http_port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Log output format
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a set variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let http_port = parse_var("HTTP_PORT", 8080)?;
        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 30)?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = LogFormat::from_str_or_default(
            &env::var("LOG_FORMAT").unwrap_or_default(),
        );

        Ok(Self {
            host,
            http_port,
            cors_origins,
            request_timeout_secs,
            log_format,
        })
    }
}

/// Parse an environment variable, falling back to a default when unset
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be a valid value, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        for var in ["HOST", "HTTP_PORT", "CORS_ORIGINS", "REQUEST_TIMEOUT_SECS", "LOG_FORMAT"] {
            std::env::remove_var(var);
        }
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_config_error() {
        std::env::set_var("HTTP_PORT", "not-a-port");
        let error = ServerConfig::from_env().unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::ConfigError);
        std::env::remove_var("HTTP_PORT");
    }

    #[test]
    #[serial]
    fn test_cors_origins_are_split_and_trimmed() {
        std::env::set_var("CORS_ORIGINS", "https://a.example.com , https://b.example.com,");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        std::env::remove_var("CORS_ORIGINS");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("fancy"), LogFormat::Text);
    }
}
