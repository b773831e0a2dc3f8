// SPDX-License-Identifier: MIT

//! Zigler API Server
//!
//! Backend for the Zigler language-exchange app: cookie-session auth,
//! profile onboarding, the friend graph, and chat-provider tokens.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zigler::{config::Config, db::FirestoreDb, services::ChatTokenService, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, env = %config.app_env, "Starting Zigler API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    let chat_tokens = ChatTokenService::new(config.chat_api_key.clone(), &config.chat_api_secret);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        chat_tokens,
    });

    // Build router
    let app = zigler::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zigler=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
