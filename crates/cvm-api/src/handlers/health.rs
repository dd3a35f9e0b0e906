use std::sync::atomic::Ordering;

use axum::{Json, extract::State};
use serde_json::json;
use tokio::time::{Duration, timeout};

use crate::SharedState;
use crate::error::ApiError;

const READINESS_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Not ready while draining for shutdown or when the profile store does not
/// answer a ping within [`READINESS_TIMEOUT`].
pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    let store = state.engine.store();
    match timeout(READINESS_TIMEOUT, store.ping()).await {
        Ok(Ok(())) => Ok(Json(json!({
            "status": "ok",
            "store": store.backend(),
            "application": env!("CARGO_PKG_NAME"),
        }))),
        Ok(Err(err)) => Err(ApiError::ServiceUnavailable(format!(
            "{} store ping failed: {err}",
            store.backend()
        ))),
        Err(_) => Err(ApiError::ServiceUnavailable("store_ping_timeout".into())),
    }
}
