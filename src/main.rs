// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admission Assistant API Server
//!
//! Serves OTP email verification, accounts, chat history and the LLM
//! completion relay for the admissions chatbot front end.

use admission_assistant::{
    config::Config,
    db::{Database, FirestoreDb},
    services::EmailService,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Admission Assistant API");

    // Initialize database
    let db = if config.use_in_memory_db {
        tracing::warn!("Using in-memory database, data will not survive a restart");
        Database::in_memory()
    } else {
        Database::Firestore(FirestoreDb::new(&config.gcp_project_id).await?)
    };

    if config.llm_api_key.is_none() {
        tracing::warn!("LLM API key not set, chat completions will fail");
    }
    tracing::info!(
        url = %config.llm_api_url,
        model = %config.llm_model,
        "LLM client configured"
    );

    // Initialize email
    let email = EmailService::new(&config.smtp)?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, email));

    // Build router
    let app = admission_assistant::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("admission_assistant=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
