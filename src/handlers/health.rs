// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

// GET /health — público, usado pelo app e por probes.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar"))
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
