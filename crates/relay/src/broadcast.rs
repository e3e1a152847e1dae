//! RaumBroadcaster – verteilt Events an die Verbindungen eines Raums
//!
//! Haelt die Send-Queues aller offenen Echtzeit-Verbindungen, gruppiert
//! nach Raum. Leere Verbindungs-Sets werden sofort abgebaut, damit sich
//! keine Karteileichen ansammeln.
//!
//! ## Zustellgarantie
//! Best-effort, at-most-once pro Verbindung: volle oder geschlossene
//! Queues werden uebersprungen, nie wiederholt. Die Reihenfolge der
//! Events in eine einzelne Verbindung entspricht der Publikations-
//! Reihenfolge (begrenzte mpsc-Queue pro Verbindung).

use dashmap::DashMap;
use nachtfunk_core::{BenutzerId, RaumId, VerbindungsId};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::event::{AusgehendesFrame, RaumEvent};

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// VerbindungsSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer offenen Verbindung
#[derive(Clone, Debug)]
struct VerbindungsSender {
    benutzer_id: BenutzerId,
    tx: mpsc::Sender<AusgehendesFrame>,
}

impl VerbindungsSender {
    /// Reiht ein Frame nicht-blockierend ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    fn senden(&self, frame: AusgehendesFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(benutzer_id = %self.benutzer_id, "Send-Queue voll – Frame verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(benutzer_id = %self.benutzer_id, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RaumBroadcaster
// ---------------------------------------------------------------------------

/// Zentraler Broadcaster fuer alle Echtzeit-Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct RaumBroadcaster {
    inner: Arc<RaumBroadcasterInner>,
}

struct RaumBroadcasterInner {
    /// Send-Queues, indiziert nach VerbindungsId
    verbindungen: DashMap<VerbindungsId, VerbindungsSender>,
    /// Verbindungs-Set pro Raum: raum_id -> Vec<VerbindungsId>
    raum_verbindungen: DashMap<RaumId, Vec<VerbindungsId>>,
}

impl RaumBroadcaster {
    /// Erstellt einen neuen RaumBroadcaster
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(RaumBroadcasterInner {
                verbindungen: DashMap::new(),
                raum_verbindungen: DashMap::new(),
            }),
        }
    }

    /// Registriert eine neue Verbindung unter einem Raum
    ///
    /// Gibt die VerbindungsId und die Empfangs-Queue zurueck; der
    /// WebSocket-Task liest aus der Queue und sendet ueber den Draht.
    /// Das Raum-Set wird bei der ersten Verbindung lazy angelegt.
    pub fn verbindung_registrieren(
        &self,
        raum_id: RaumId,
        benutzer_id: BenutzerId,
    ) -> (VerbindungsId, mpsc::Receiver<AusgehendesFrame>) {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let verbindungs_id = VerbindungsId::new();

        self.inner
            .verbindungen
            .insert(verbindungs_id, VerbindungsSender { benutzer_id, tx });
        self.inner
            .raum_verbindungen
            .entry(raum_id)
            .or_default()
            .push(verbindungs_id);

        tracing::debug!(
            raum_id = %raum_id,
            benutzer_id = %benutzer_id,
            verbindungs_id = %verbindungs_id,
            "Verbindung registriert"
        );
        (verbindungs_id, rx)
    }

    /// Entfernt eine Verbindung aus ihrem Raum (synchron, ohne Gnadenfrist)
    ///
    /// Ein leeres Raum-Set wird dabei vollstaendig abgebaut.
    pub fn verbindung_entfernen(&self, raum_id: &RaumId, verbindungs_id: &VerbindungsId) {
        self.inner.verbindungen.remove(verbindungs_id);

        if let Some(mut ids) = self.inner.raum_verbindungen.get_mut(raum_id) {
            ids.retain(|vid| vid != verbindungs_id);
            let ist_leer = ids.is_empty();
            drop(ids);
            if ist_leer {
                self.inner.raum_verbindungen.remove(raum_id);
            }
        }
        tracing::debug!(raum_id = %raum_id, verbindungs_id = %verbindungs_id, "Verbindung entfernt");
    }

    /// Sendet ein Event an alle Verbindungen eines Raums
    ///
    /// Gibt die Anzahl der erfolgreichen Einreihungen zurueck.
    pub fn an_raum_senden(&self, raum_id: &RaumId, event: RaumEvent) -> usize {
        self.fanout(raum_id, AusgehendesFrame::Event(event), |_, _| true)
    }

    /// Sendet ein Event an alle Verbindungen eines Raums ausser denen
    /// eines bestimmten Benutzers
    ///
    /// Der Absender einer Nachricht bekommt sein eigenes Event nie
    /// zurueckgespiegelt – ueber keine seiner Verbindungen.
    pub fn an_raum_ausser_benutzer_senden(
        &self,
        raum_id: &RaumId,
        ausgeschlossen: &BenutzerId,
        event: RaumEvent,
    ) -> usize {
        let ausser = *ausgeschlossen;
        self.fanout(raum_id, AusgehendesFrame::Event(event), move |_, sender| {
            sender.benutzer_id != ausser
        })
    }

    /// Leitet ein rohes Client-Frame woertlich an die uebrigen
    /// Verbindungen des Raums weiter (ausser der Absender-Verbindung)
    pub fn roh_weiterleiten(
        &self,
        raum_id: &RaumId,
        absender: &VerbindungsId,
        text: String,
    ) -> usize {
        let ausser = *absender;
        self.fanout(raum_id, AusgehendesFrame::Roh(text), move |vid, _| {
            *vid != ausser
        })
    }

    /// Schliesst alle Verbindungen eines Raums (Raum geloescht/abgelaufen)
    ///
    /// Sendet vorher einen Systemhinweis; das Fallenlassen der Sender
    /// beendet die Empfangs-Queues und damit die WebSocket-Tasks.
    pub fn raum_schliessen(&self, raum_id: &RaumId) {
        let Some((_, ids)) = self.inner.raum_verbindungen.remove(raum_id) else {
            return;
        };

        let hinweis = AusgehendesFrame::Event(RaumEvent::system("Raum wurde geschlossen"));
        for vid in &ids {
            if let Some((_, sender)) = self.inner.verbindungen.remove(vid) {
                sender.senden(hinweis.clone());
            }
        }
        tracing::info!(raum_id = %raum_id, verbindungen = ids.len(), "Raum-Verbindungen geschlossen");
    }

    /// Anzahl der offenen Verbindungen in einem Raum
    pub fn verbindungs_anzahl(&self, raum_id: &RaumId) -> usize {
        self.inner
            .raum_verbindungen
            .get(raum_id)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, verbindungs_id: &VerbindungsId) -> bool {
        self.inner.verbindungen.contains_key(verbindungs_id)
    }

    // -----------------------------------------------------------------------
    // Interne Hilfsmethoden
    // -----------------------------------------------------------------------

    /// Fan-out an das Verbindungs-Set eines Raums (Snapshot, dann senden)
    fn fanout(
        &self,
        raum_id: &RaumId,
        frame: AusgehendesFrame,
        behalten: impl Fn(&VerbindungsId, &VerbindungsSender) -> bool,
    ) -> usize {
        // Snapshot der IDs, damit subscribe/unsubscribe waehrend des
        // Sendens das Set nicht unter uns wegmutiert
        let ids: Vec<VerbindungsId> = match self.inner.raum_verbindungen.get(raum_id) {
            Some(ids) => ids.clone(),
            None => return 0,
        };

        let mut gesendet = 0;
        for vid in &ids {
            if let Some(sender) = self.inner.verbindungen.get(vid) {
                if behalten(vid, &sender) && sender.senden(frame.clone()) {
                    gesendet += 1;
                }
            }
        }
        gesendet
    }
}

impl Default for RaumBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
