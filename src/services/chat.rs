// SPDX-License-Identifier: MIT

//! Chat-provider token issuance.
//!
//! The browser connects to the chat provider directly; the server only
//! vouches for the user by signing a short-lived token with the provider
//! API secret. Message storage and delivery live entirely on the
//! provider side.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Chat tokens are valid for 24 hours; the client requests a fresh one
/// per session.
const CHAT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Claims the chat provider expects in a user token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatTokenClaims {
    pub user_id: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signs chat-provider user tokens with the provider API secret.
#[derive(Clone)]
pub struct ChatTokenService {
    api_key: String,
    api_secret: Vec<u8>,
}

impl ChatTokenService {
    pub fn new(api_key: String, api_secret: &str) -> Self {
        Self {
            api_key,
            api_secret: api_secret.as_bytes().to_vec(),
        }
    }

    /// Public API key the browser uses to identify the application.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Issue a token for a user.
    pub fn issue_token(&self, user_id: &str) -> anyhow::Result<String> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

        let claims = ChatTokenClaims {
            user_id: user_id.to_string(),
            iat: now,
            exp: now + CHAT_TOKEN_TTL_SECS as usize,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.api_secret),
        )?)
    }
}
