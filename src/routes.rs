use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use bytes::Bytes;

use crate::{
    error::ClipError,
    models::{ClipRequest, ClipResult, HealthStatus},
    video_processor::ClipProcessor,
};

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ClipProcessor>,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health).post(process_clip))
        .with_state(state)
}

// Liveness probe
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "Clip processor ready",
    })
}

// The body is parsed by hand so absent fields become a 400 rather than
// the JSON extractor's 422
async fn process_clip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ClipResult>, ClipError> {
    let clip = ClipRequest::from_json(&body)?.validate()?;

    let result = state.processor.process(&clip).await?;
    Ok(Json(result))
}
