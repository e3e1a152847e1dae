//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    routing::{get, post},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den vollstaendigen Router (REST + Health + WebSocket)
pub fn v1_router() -> Router<AppState> {
    Router::new()
        // Raeume
        .route("/v1/rooms", post(handlers::raeume::create_room))
        .route("/v1/rooms/:id", get(handlers::raeume::get_room))
        .route("/v1/rooms/:id/join", post(handlers::raeume::join_room))
        .route("/v1/rooms/:id/leave", post(handlers::raeume::leave_room))
        // Nachrichten
        .route(
            "/v1/rooms/:id/messages",
            post(handlers::nachrichten::send_message).get(handlers::nachrichten::list_messages),
        )
        .route(
            "/v1/messages/cleanup",
            post(handlers::nachrichten::cleanup_messages),
        )
        // Echtzeit
        .route("/v1/ws", get(crate::ws::ws_handler))
        // Status
        .route("/health", get(handlers::system::health))
}
