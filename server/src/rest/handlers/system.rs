//! Status-Endpunkte

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::rest::AppState;

/// GET /health – Health-Check-Endpunkt
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "name": state.server_name,
            "version": env!("CARGO_PKG_VERSION"),
            "uptimeSecs": state.start.elapsed().as_secs(),
        })),
    )
}
