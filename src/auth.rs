// ABOUTME: Token verification against the external Auth provider
// ABOUTME: Extracts bearer tokens and resolves them to users with a uniform 401 policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

//! # Token Verifier
//!
//! Stateless, per-request verification of bearer tokens. Each call delegates
//! to the Auth provider's get-user operation exactly once; there is no retry
//! and no caching of identities across requests.
//!
//! Every non-success outcome - missing token, token the provider does not
//! recognize, or a provider failure - is represented uniformly so callers can
//! answer HTTP 401 without inspecting provider-specific error shapes. In
//! particular, a provider answering with no user and no explicit error is
//! always an authentication failure.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::models::AuthenticatedUser;
use crate::storage::StorageProvider;

/// Scheme prefix expected on the `Authorization` header
const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from an `Authorization` header value, if any.
///
/// Returns `None` for an absent header, a non-bearer scheme, or an empty
/// token. Used directly by routes where authentication is optional.
#[must_use]
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}

/// Stateless verifier resolving bearer tokens through the Auth provider
#[derive(Clone)]
pub struct TokenVerifier {
    storage: Arc<dyn StorageProvider>,
}

impl TokenVerifier {
    /// Create a verifier over the given provider
    #[must_use]
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Authenticate a request from its headers.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no bearer token is present and
    /// `AuthInvalid` for every other failure, so authenticated routes answer
    /// 401 uniformly.
    pub async fn verify_headers(
        &self,
        headers: &axum::http::HeaderMap,
    ) -> AppResult<AuthenticatedUser> {
        let Some(token) = bearer_token(headers) else {
            return Err(AppError::auth_required("Unauthorized: No token provided"));
        };
        self.verify_token(&token).await
    }

    /// Resolve a bearer token to a verified user.
    ///
    /// An empty token fails immediately without a provider call.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for an empty token and `AuthInvalid` otherwise:
    /// the provider not recognizing the token, answering with no user, or the
    /// call itself failing all collapse to the same outcome.
    pub async fn verify_token(&self, token: &str) -> AppResult<AuthenticatedUser> {
        if token.is_empty() {
            return Err(AppError::auth_required("Unauthorized: No token provided"));
        }

        match self.storage.get_user(token).await {
            Ok(Some(user)) => {
                debug!(user_id = %user.id, "Token verified");
                Ok(AuthenticatedUser {
                    user,
                    access_token: token.to_owned(),
                })
            }
            Ok(None) => {
                // No user and no explicit error is still an invalid token
                debug!("Auth provider resolved no user for token");
                Err(AppError::auth_invalid("Unauthorized: Invalid token"))
            }
            Err(e) => {
                warn!(error = %e, "Auth provider call failed during verification");
                Err(AppError::auth_invalid("Unauthorized: Invalid token"))
            }
        }
    }
}
