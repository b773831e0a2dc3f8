// SPDX-License-Identifier: MIT

//! Chat routes.
//!
//! Messaging itself is delegated to the external chat provider; the only
//! server responsibility is vouching for the session user with a signed
//! provider token.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat/token", get(chat_token))
}

#[derive(Serialize)]
pub struct ChatTokenResponse {
    pub success: bool,
    pub token: String,
    /// Public provider key the browser uses alongside the token.
    pub api_key: String,
}

/// Issue a chat-provider token for the session user.
async fn chat_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ChatTokenResponse>> {
    let token = state.chat_tokens.issue_token(&auth.user_id)?;

    Ok(Json(ChatTokenResponse {
        success: true,
        token,
        api_key: state.chat_tokens.api_key().to_string(),
    }))
}
