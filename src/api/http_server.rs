// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::anchors::{delete_anchor_handler, get_anchor_handler, list_anchors_handler, save_anchor_handler};
use super::frame::process_frame_handler;
use super::target::{
    clear_target_handler, get_target_handler, set_target_from_audio_handler,
    set_target_text_handler,
};
use crate::anchors::{AnchorStore, SqliteAnchorStore};
use crate::audio::Transcriber;
use crate::llm::LanguageModel;
use crate::session::{NavigationSession, DEFAULT_TARGET};
use crate::vision::{ObjectDetector, VisionModelManager, MAX_FRAME_BYTES};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<NavigationSession>>,
    pub vision_model_manager: Arc<RwLock<Option<Arc<VisionModelManager>>>>,
    pub llm: Arc<RwLock<Option<Arc<dyn LanguageModel>>>>,
    pub transcriber: Arc<RwLock<Option<Arc<dyn Transcriber>>>>,
    pub anchors: Arc<dyn AnchorStore>,
}

impl AppState {
    pub fn new(session: NavigationSession, anchors: Arc<dyn AnchorStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            vision_model_manager: Arc::new(RwLock::new(None)),
            llm: Arc::new(RwLock::new(None)),
            transcriber: Arc::new(RwLock::new(None)),
            anchors,
        }
    }

    /// Default session, in-memory anchors and no models
    pub fn new_for_test() -> anyhow::Result<Self> {
        Ok(Self::new(
            NavigationSession::new(DEFAULT_TARGET),
            Arc::new(SqliteAnchorStore::open_in_memory()?),
        ))
    }

    pub async fn detector(&self) -> Option<Arc<dyn ObjectDetector>> {
        self.vision_model_manager
            .read()
            .await
            .as_ref()
            .and_then(|manager| manager.get_detector())
    }

    pub async fn language_model(&self) -> Option<Arc<dyn LanguageModel>> {
        self.llm.read().await.clone()
    }

    pub async fn transcriber(&self) -> Option<Arc<dyn Transcriber>> {
        self.transcriber.read().await.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub detector: Option<String>,
    pub llm: Option<String>,
    pub voice_targeting: bool,
    pub target: Option<String>,
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let detector = state.detector().await.map(|d| d.name().to_string());
    let llm = state
        .language_model()
        .await
        .map(|model| model.model_name().to_string());
    let voice_targeting = state.transcriber().await.is_some();
    let target = state.session.read().await.current_target().map(str::to_string);

    Json(HealthResponse {
        status: "ok".to_string(),
        detector,
        llm,
        voice_targeting,
        target,
    })
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Build the router with every API route, allowing any CORS origin
pub fn create_app(state: AppState) -> Router {
    create_app_with_cors(state, &[])
}

pub fn create_app_with_cors(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Target selection
        .route("/api/set_target_text", post(set_target_text_handler))
        .route("/api/set_target_from_audio", post(set_target_from_audio_handler))
        .route(
            "/api/target",
            get(get_target_handler).delete(clear_target_handler),
        )
        // Camera frames
        .route("/api/process_frame", post(process_frame_handler))
        // Anchors
        .route("/api/save_anchor", post(save_anchor_handler))
        .route("/api/anchors", get(list_anchors_handler))
        .route(
            "/api/anchors/:key",
            get(get_anchor_handler).delete(delete_anchor_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_FRAME_BYTES + 64 * 1024))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
    allowed_origins: &[String],
) -> anyhow::Result<()> {
    let app = create_app_with_cors(state, allowed_origins);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
