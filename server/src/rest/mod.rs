//! REST-Interface des Nachtfunk-Servers

pub mod handlers;
pub mod routes;

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use nachtfunk_core::NachtfunkError;
use nachtfunk_relay::RaumBroadcaster;
use nachtfunk_rooms::{NachrichtenService, RaumService};
use serde_json::json;

/// Axum-State: alle Dienste plus ein paar Serverfakten
#[derive(Clone)]
pub struct AppState {
    pub raeume: RaumService,
    pub nachrichten: NachrichtenService,
    pub broadcaster: RaumBroadcaster,
    pub server_name: String,
    pub entwicklungsmodus: bool,
    pub start: Instant,
}

/// Baut die JSON-Fehlerantwort zu einem Dienstfehler
///
/// Clientfehler (4xx) tragen immer die konkrete Meldung; bei internen
/// Fehlern geht die Meldung nur im Entwicklungsmodus raus.
pub fn fehler_antwort(state: &AppState, fehler: &NachtfunkError) -> Response {
    let status = StatusCode::from_u16(fehler.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let meldung = if fehler.ist_clientfehler() || state.entwicklungsmodus {
        fehler.to_string()
    } else {
        tracing::error!(fehler = %fehler, "Interner Fehler bei REST-Anfrage");
        "Interner Serverfehler".to_string()
    };

    (status, Json(json!({ "success": false, "error": meldung }))).into_response()
}
