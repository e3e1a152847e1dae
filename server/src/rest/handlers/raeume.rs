//! REST-Handler fuer Raum-Endpunkte

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nachtfunk_core::{BenutzerId, RaumId};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::rest::{fehler_antwort, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumErstellenBody {
    pub name: String,
    pub password: String,
    pub salt: String,
    pub display_name: String,
    /// Optional vom Client mitgebracht, sonst vergibt der Server eine
    pub user_id: Option<Uuid>,
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<RaumErstellenBody>,
) -> Response {
    let benutzer_id = body.user_id.map(BenutzerId).unwrap_or_else(BenutzerId::new);
    match state.raeume.erstellen(
        &body.name,
        &body.password,
        &body.salt,
        benutzer_id,
        &body.display_name,
    ) {
        Ok(raum) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "room": raum, "userId": benutzer_id })),
        )
            .into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumBeitretenBody {
    pub password: String,
    pub display_name: String,
    pub user_id: Option<Uuid>,
}

pub async fn join_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RaumBeitretenBody>,
) -> Response {
    let benutzer_id = body.user_id.map(BenutzerId).unwrap_or_else(BenutzerId::new);
    match state.raeume.beitreten(
        &RaumId(id),
        benutzer_id,
        &body.password,
        &body.display_name,
    ) {
        Ok(raum) => (
            StatusCode::OK,
            Json(json!({ "success": true, "room": raum, "userId": benutzer_id })),
        )
            .into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}

pub async fn get_room(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.raeume.info(&RaumId(id)) {
        Ok(info) => (StatusCode::OK, Json(json!({ "success": true, "room": info })))
            .into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumVerlassenBody {
    pub user_id: Uuid,
}

pub async fn leave_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RaumVerlassenBody>,
) -> Response {
    match state
        .raeume
        .verlassen(&RaumId(id), &BenutzerId(body.user_id))
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}
