//! nachtfunk-server – Bibliotheks-Root
//!
//! Verdrahtet Store, Broadcaster und Dienste zum lauffaehigen HTTP- und
//! WebSocket-Server. Alle Abhaengigkeiten werden hier explizit gebaut
//! und injiziert; es gibt keine globalen Registries.

pub mod config;
pub mod rest;
pub mod ws;

use std::time::{Duration, Instant};

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use nachtfunk_relay::RaumBroadcaster;
use nachtfunk_rooms::{Aufraeumdienst, NachrichtenConfig, NachrichtenService, RaumService};
use nachtfunk_store::{RaumStore, StoreConfig};
use rest::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den Axum-Router ueber dem gegebenen State
    pub fn router(state: AppState) -> Router {
        rest::routes::v1_router()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Store, Broadcaster und Dienste verdrahten
    /// 2. Aufraeumdienst starten
    /// 3. HTTP/WebSocket-Listener binden und bedienen
    /// 4. Auf Ctrl-C warten, dann Aufraeumdienst stoppen
    pub async fn starten(self) -> Result<()> {
        let store = RaumStore::neu(StoreConfig {
            raum_ttl_sek: self.config.aufbewahrung.raum_ttl_sek,
            nachricht_ttl_sek: self.config.aufbewahrung.nachricht_ttl_sek,
        });
        let broadcaster = RaumBroadcaster::neu();

        // Jeder entfernte Raum schliesst seine Echtzeit-Verbindungen,
        // egal ueber welchen Pfad die Entfernung lief
        let hook_broadcaster = broadcaster.clone();
        store.eviktions_hook_setzen(std::sync::Arc::new(move |raum_id| {
            hook_broadcaster.raum_schliessen(&raum_id);
        }));

        let state = AppState {
            raeume: RaumService::neu(store.clone(), broadcaster.clone()),
            nachrichten: NachrichtenService::neu(
                store.clone(),
                broadcaster.clone(),
                NachrichtenConfig {
                    max_groesse_bytes: self.config.nachrichten.max_groesse_bytes,
                    nonce_laenge_bytes: self.config.nachrichten.nonce_laenge_bytes,
                },
            ),
            broadcaster: broadcaster.clone(),
            server_name: self.config.server.name.clone(),
            entwicklungsmodus: self.config.server.entwicklungsmodus,
            start: Instant::now(),
        };

        let aufraeumdienst = Aufraeumdienst::starten(
            store,
            broadcaster,
            Duration::from_secs(self.config.aufbewahrung.sweep_intervall_sek),
        );

        let adresse = self.config.http_bind_adresse();
        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %adresse,
            "Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)..."
        );

        axum::serve(listener, Self::router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
        aufraeumdienst.stoppen().await;
        Ok(())
    }
}
