// src/server.rs
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::client::{check_text, Verifier};
use crate::error::CheckError;
use crate::normalize::normalize;
use crate::types::{CheckRequest, Normalized};

#[derive(Clone)]
pub struct Engine {
    pub verifier: Arc<dyn Verifier>,
}

pub async fn normalize_response(Json(raw): Json<Value>) -> Json<Normalized> {
    Json(normalize(&raw))
}

pub async fn verify(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<Normalized>, CheckError> {
    let out = check_text(engine.verifier.as_ref(), &req.text).await?;
    Ok(Json(out))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn router(engine: Engine) -> Router {
    Router::new()
        .route("/normalize", post(normalize_response))
        .route("/verify", post(verify))
        .route("/healthz", get(healthz))
        .with_state(Arc::new(engine))
}

pub async fn run_server(engine: Engine, addr: &str) -> anyhow::Result<()> {
    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
