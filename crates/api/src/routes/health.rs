//! Health endpoint.

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
///
/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
