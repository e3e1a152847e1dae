//! Aufraeumdienst – periodischer Sweep fuer Raeume und Nachrichten
//!
//! Ablauf wird sonst nur lazy beim Zugriff durchgesetzt; der Dienst
//! sorgt dafuer, dass auch nie wieder angefasste Raeume verschwinden
//! und deren Echtzeit-Verbindungen geschlossen werden.

use std::time::Duration;

use nachtfunk_relay::RaumBroadcaster;
use nachtfunk_store::RaumStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle auf den laufenden Sweep-Task
pub struct Aufraeumdienst {
    handle: JoinHandle<()>,
    stopp_tx: watch::Sender<bool>,
}

impl Aufraeumdienst {
    /// Startet den Sweep-Task mit festem Intervall
    ///
    /// Ein Intervall unter einer Sekunde wird auf eine Sekunde angehoben
    /// (`tokio::time::interval` akzeptiert kein Null-Intervall).
    pub fn starten(store: RaumStore, broadcaster: RaumBroadcaster, intervall: Duration) -> Self {
        let intervall = if intervall < Duration::from_secs(1) {
            tracing::warn!(
                intervall_ms = intervall.as_millis() as u64,
                "Sweep-Intervall zu klein, angehoben auf 1s"
            );
            Duration::from_secs(1)
        } else {
            intervall
        };
        let (stopp_tx, mut stopp_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(intervall);
            // Erster Tick feuert sofort, der ist uninteressant
            ticker.tick().await;

            tracing::info!(intervall_sek = intervall.as_secs(), "Aufraeumdienst gestartet");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let bericht = store.abgelaufene_aufraeumen();
                        for raum_id in &bericht.entfernte_raeume {
                            broadcaster.raum_schliessen(raum_id);
                        }
                    }
                    _ = stopp_rx.changed() => {
                        if *stopp_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("Aufraeumdienst beendet");
        });

        Self { handle, stopp_tx }
    }

    /// Stoppt den Task und wartet auf sein Ende
    pub async fn stoppen(self) {
        // Empfaenger weg heisst Task bereits tot, dann reicht das Join
        let _ = self.stopp_tx.send(true);
        let _ = self.handle.await;
    }
}
