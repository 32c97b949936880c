// ABOUTME: Server binary wiring configuration, providers, middleware, and graceful shutdown
// ABOUTME: Binds the axum router over the injected provider clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! TukangPrompt server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use tukang_prompt_server::config::ServerConfig;
use tukang_prompt_server::errors::{AppError, AppResult};
use tukang_prompt_server::llm::LlmProvider;
use tukang_prompt_server::resources::ServerResources;
use tukang_prompt_server::storage::StorageProvider;
use tukang_prompt_server::{logging, routes};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Configuration first so logging knows its output format
    let config = ServerConfig::from_env()?;
    logging::init(config.log_format);

    tracing::info!(host = %config.host, port = config.http_port, "Loaded server configuration");

    // Providers read their own credentials; no network probing happens here
    let resources = Arc::new(ServerResources::from_env()?);
    tracing::info!(
        storage = resources.storage.name(),
        llm = resources.llm.name(),
        "Provider clients configured"
    );

    let cors = build_cors_layer(&config)?;
    let request_id_header = HeaderName::from_static("x-request-id");

    // Middleware stack applies bottom-up
    let app = routes::api_routes(Arc::clone(&resources))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors);

    let host = config
        .host
        .parse()
        .map_err(|e| AppError::config(format!("Invalid HOST address '{}': {e}", config.host)))?;
    let addr = SocketAddr::new(host, config.http_port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Build the CORS middleware layer from server configuration.
///
/// Fails fast at startup when a configured origin is invalid.
fn build_cors_layer(config: &ServerConfig) -> AppResult<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| AppError::config(format!("Invalid CORS origin '{origin}': {e}")))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600)))
}
