// ABOUTME: Main library entry point for the TukangPrompt prompt-generation gateway
// ABOUTME: Exposes auth, storage, LLM, synthesis, and HTTP route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TukangPrompt

#![deny(unsafe_code)]

//! # TukangPrompt Server
//!
//! An authenticated prompt-generation gateway for image- and video-generative
//! AI models. Users submit structured form state; the server synthesizes a
//! natural-language instruction, asks a hosted text-generation provider for
//! two prompt variants under a strict JSON contract, and returns them -
//! recording the exchange into per-user history when the caller is
//! authenticated.
//!
//! ## Architecture
//!
//! The server is a thin orchestration layer over two external collaborators:
//!
//! - **Auth+Storage provider** ([`storage`]): token verification plus
//!   user-scoped row CRUD for configs, history, and saved prompts.
//! - **Text generation provider** ([`llm`]): single-shot chat completion
//!   with constrained JSON output.
//!
//! Around them sit the [`auth`] token verifier, the [`synthesis`] gateway,
//! and per-capability [`routes`]. All provider clients are injected through
//! [`resources::ServerResources`]; no module-level clients exist.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tukang_prompt_server::errors::AppResult;
//! use tukang_prompt_server::llm::LlmProvider;
//! use tukang_prompt_server::resources::ServerResources;
//!
//! fn main() -> AppResult<()> {
//!     let resources = ServerResources::from_env()?;
//!     println!("configured text provider: {}", resources.llm.display_name());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod resources;
pub mod routes;
pub mod storage;
pub mod synthesis;
