// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use clear_path_node::{
    anchors::{AnchorStore, SqliteAnchorStore},
    api::{start_server, AppState},
    audio::{Transcriber, WhisperClient},
    cli::Cli,
    llm::{LanguageModel, LlmClient},
    session::NavigationSession,
    vision::VisionModelManager,
};
use std::{env, net::SocketAddr, path::Path, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing::info!("🚀 Starting Clear Path node v{}", env!("CARGO_PKG_VERSION"));

    // Anchors
    let db_path = Path::new(&config.storage.database_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let anchors: Arc<dyn AnchorStore> = Arc::new(SqliteAnchorStore::open(db_path)?);

    let state = AppState::new(
        NavigationSession::new(config.session.default_target.clone()),
        anchors,
    );

    // Object detector
    let manager = VisionModelManager::new(config.to_vision_config()).await?;
    if !manager.has_detector() {
        tracing::warn!("⚠️ No object detector loaded; frame endpoints will answer 503");
    }
    *state.vision_model_manager.write().await = Some(Arc::new(manager));

    // Guidance model
    match config.to_llm_config() {
        Some(llm_config) => {
            if llm_config.api_key.is_none() {
                tracing::warn!("⚠️ GEMINI_API_KEY is not set; guidance requests will likely fail");
            }
            let client = LlmClient::new(llm_config)?;
            if !client.health_check().await {
                tracing::warn!("⚠️ LLM endpoint {} is not reachable yet", client.endpoint());
            }
            *state.llm.write().await = Some(Arc::new(client) as Arc<dyn LanguageModel>);
        }
        None => tracing::info!("Guidance LLM disabled"),
    }

    // Voice targeting
    if let Some(whisper_config) = config.to_whisper_config() {
        let client = WhisperClient::new(whisper_config)?;
        *state.transcriber.write().await = Some(Arc::new(client) as Arc<dyn Transcriber>);
    } else {
        tracing::info!("No transcription endpoint configured; voice targeting disabled");
    }

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen_addr))?;

    start_server(addr, state, &config.server.cors_allowed_origins).await?;

    tracing::info!("👋 Clear Path node stopped");
    Ok(())
}
