//! WebSocket-Endpunkt des Echtzeit-Kanals
//!
//! Handshake ueber `GET /v1/ws?roomId=...&userId=...`. Der Raum wird vor
//! dem Upgrade aufgeloest; ein fehlender oder abgelaufener Raum lehnt den
//! Handshake mit 404 ab. Nach dem Upgrade laufen zwei Richtungen:
//! eingehende Text-Frames werden woertlich an die uebrigen Verbindungen
//! des Raums weitergereicht, die Send-Queue der Verbindung wird auf den
//! Socket gepumpt.

use axum::{
    extract::ws::{Message, WebSocket},
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use futures_util::{SinkExt, StreamExt};
use nachtfunk_core::{BenutzerId, RaumId};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::rest::{fehler_antwort, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsParams {
    pub room_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let (Some(room_id), Some(user_id)) = (params.room_id, params.user_id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Parameter roomId und userId sind Pflicht"
            })),
        )
            .into_response();
    };
    let raum_id = RaumId(room_id);
    let benutzer_id = BenutzerId(user_id);

    // Raum vor dem Upgrade aufloesen, nicht erst beim ersten Frame
    if let Err(e) = state.raeume.info(&raum_id) {
        return fehler_antwort(&state, &e);
    }

    ws.on_upgrade(move |socket| verbindung_betreiben(state, socket, raum_id, benutzer_id))
}

/// Betreibt eine aufgebaute WebSocket-Verbindung bis zum Ende
async fn verbindung_betreiben(
    state: AppState,
    socket: WebSocket,
    raum_id: RaumId,
    benutzer_id: BenutzerId,
) {
    let (verbindungs_id, mut queue) = state
        .broadcaster
        .verbindung_registrieren(raum_id, benutzer_id);
    tracing::info!(
        raum_id = %raum_id,
        benutzer_id = %benutzer_id,
        verbindung = %verbindungs_id,
        "WebSocket-Verbindung aufgebaut"
    );

    let (mut sender, mut empfaenger) = socket.split();

    // Send-Queue -> Socket
    let mut sende_task = tokio::spawn(async move {
        while let Some(frame) = queue.recv().await {
            if sender.send(Message::Text(frame.als_text())).await.is_err() {
                break;
            }
        }
        // Queue zu: Raum geschlossen oder Verbindung abgemeldet
        let _ = sender.send(Message::Close(None)).await;
    });

    // Socket -> woertliches Weiterreichen an den Rest des Raums
    while let Some(Ok(nachricht)) = empfaenger.next().await {
        match nachricht {
            Message::Text(text) => {
                state.broadcaster.roh_weiterleiten(&raum_id, &verbindungs_id, text);
            }
            Message::Close(_) => break,
            // Ping/Pong beantwortet axum selbst, Binaer-Frames ignorieren wir
            _ => {}
        }
    }

    state
        .broadcaster
        .verbindung_entfernen(&raum_id, &verbindungs_id);
    sende_task.abort();
    let _ = (&mut sende_task).await;

    tracing::info!(
        raum_id = %raum_id,
        verbindung = %verbindungs_id,
        "WebSocket-Verbindung beendet"
    );
}
