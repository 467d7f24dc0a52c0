use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use route_schedules::Dataset;

pub fn create_router(data: Arc<Dataset>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedules/:route_id", get(schedules))
        .with_state(data)
}

pub async fn run(data: Arc<Dataset>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    log::info!("listening on http://{}", addr);
    axum::serve(listener, create_router(data)).await?;
    Ok(())
}

async fn health(State(data): State<Arc<Dataset>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "routes": data.route_count(),
        "trips": data.trip_count(),
        "stop_times": data.stop_time_count(),
    }))
}

// Serialized here because the response borrows from `data`.
async fn schedules(
    Path(route_id): Path<String>,
    State(data): State<Arc<Dataset>>,
) -> Response {
    Json(data.lookup(&route_id)).into_response()
}
