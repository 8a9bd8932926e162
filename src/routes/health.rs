use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{app_state::AppState, error::Result};

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>> {
    state.db.ping().await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        }
    })))
}
