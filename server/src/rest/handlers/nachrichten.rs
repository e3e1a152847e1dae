//! REST-Handler fuer Nachrichten-Endpunkte

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use nachtfunk_core::{BenutzerId, NachtfunkError, RaumId};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::rest::{fehler_antwort, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NachrichtSendenBody {
    pub user_id: Uuid,
    pub encrypted_payload: String,
    pub nonce: String,
    pub salt: Option<String>,
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<NachrichtSendenBody>,
) -> Response {
    match state.nachrichten.senden(
        &RaumId(id),
        &BenutzerId(body.user_id),
        &body.encrypted_payload,
        &body.nonce,
        body.salt.as_deref(),
    ) {
        Ok(quittung) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "message": quittung })),
        )
            .into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NachrichtenQuery {
    pub user_id: Uuid,
    /// RFC-3339-Zeitstempel; nur striktere Nachrichten kommen zurueck
    pub since: Option<String>,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<NachrichtenQuery>,
) -> Response {
    let seit = match query.since.as_deref() {
        None => None,
        Some(roh) => match roh.parse::<DateTime<Utc>>() {
            Ok(zeit) => Some(zeit),
            Err(_) => {
                let fehler = NachtfunkError::Validierung(
                    "Parameter 'since' ist kein gueltiger RFC-3339-Zeitstempel".into(),
                );
                return fehler_antwort(&state, &fehler);
            }
        },
    };

    match state
        .nachrichten
        .auflisten(&RaumId(id), &BenutzerId(query.user_id), seit)
    {
        Ok(nachrichten) => (
            StatusCode::OK,
            Json(json!({ "success": true, "messages": nachrichten })),
        )
            .into_response(),
        Err(e) => fehler_antwort(&state, &e),
    }
}

pub async fn cleanup_messages(State(state): State<AppState>) -> Response {
    let entfernt = state.nachrichten.abgelaufene_entfernen();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "removedMessages": entfernt })),
    )
        .into_response()
}
