// SPDX-License-Identifier: MIT

//! Zigler: a language-exchange social backend.
//!
//! This crate provides the REST API behind the Zigler single-page app:
//! cookie-session authentication, profile onboarding, the friend graph,
//! and chat-provider token issuance.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::ChatTokenService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub chat_tokens: ChatTokenService,
}
