// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Deployment environment ("development" or "production")
    pub app_env: String,
    /// GCP project ID (or emulator project for local dev)
    pub gcp_project_id: String,
    /// Frontend origin for CORS and cookie policy
    pub frontend_url: String,
    /// JWT signing key for session cookies (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Public API key for the chat provider
    pub chat_api_key: String,
    /// Secret used to sign chat-provider user tokens
    pub chat_api_secret: String,
    /// Directory holding the compiled frontend bundle (production only)
    pub static_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present, so local development only needs
    /// the secrets set once.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            chat_api_key: env::var("CHAT_API_KEY")
                .map_err(|_| ConfigError::Missing("CHAT_API_KEY"))?,
            chat_api_secret: env::var("CHAT_API_SECRET")
                .map_err(|_| ConfigError::Missing("CHAT_API_SECRET"))?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
        })
    }

    /// True when running in production mode (serve the frontend bundle).
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            port: 5001,
            app_env: "development".to_string(),
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            chat_api_key: "test_chat_key".to_string(),
            chat_api_secret: "test_chat_secret".to_string(),
            static_dir: "frontend/dist".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
