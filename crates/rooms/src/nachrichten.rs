//! NachrichtenService – opake Nachrichten annehmen, auflisten, aufraeumen
//!
//! Der Server validiert ausschliesslich die Kodierungsebene (Base64,
//! Nonce-Laenge, Groessenlimit) – den Klartext kann und will er nicht
//! pruefen. Angenommene Nachrichten werden sofort per `new_message` an
//! alle anderen Verbindungen des Raums gepusht.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use nachtfunk_core::{BenutzerId, NachrichtenId, NachtfunkError, RaumId, Result};
use nachtfunk_relay::{RaumBroadcaster, RaumEvent};
use nachtfunk_store::{Nachricht, RaumStore};

use crate::types::NachrichtenQuittung;
use crate::zugang;

/// Minimale Ciphertext-Laenge in Bytes (AEAD-Auth-Tag)
const MIN_CIPHERTEXT_BYTES: usize = 16;

/// Validierungs-Konfiguration fuer eingehende Nachrichten
#[derive(Debug, Clone)]
pub struct NachrichtenConfig {
    /// Maximale dekodierte Payload-Groesse in Bytes
    pub max_groesse_bytes: usize,
    /// Exakte Nonce-Laenge in Bytes (ciphre-spezifisch, z.B. 12 fuer
    /// AES-GCM, 24 fuer XChaCha20 – pro Deployment genau eine)
    pub nonce_laenge_bytes: usize,
}

impl Default for NachrichtenConfig {
    fn default() -> Self {
        Self {
            max_groesse_bytes: 10_000,
            nonce_laenge_bytes: 12,
        }
    }
}

/// Nimmt Nachrichten an und bedient gefilterte Lesezugriffe
#[derive(Clone)]
pub struct NachrichtenService {
    store: RaumStore,
    broadcaster: RaumBroadcaster,
    config: NachrichtenConfig,
}

impl NachrichtenService {
    /// Erstellt einen neuen NachrichtenService
    pub fn neu(store: RaumStore, broadcaster: RaumBroadcaster, config: NachrichtenConfig) -> Self {
        Self {
            store,
            broadcaster,
            config,
        }
    }

    /// Nimmt eine verschluesselte Nachricht an
    ///
    /// Der Absender muss verifiziertes Mitglied des Raums sein. Die
    /// Nachricht bekommt eine frische Id und eine eigene TTL; alle
    /// anderen Verbindungen des Raums bekommen sofort das
    /// `new_message`-Event (der Absender nie).
    pub fn senden(
        &self,
        raum_id: &RaumId,
        benutzer_id: &BenutzerId,
        inhalt: &str,
        nonce: &str,
        salt: Option<&str>,
    ) -> Result<NachrichtenQuittung> {
        self.payload_pruefen(inhalt, nonce, salt)?;

        let laeuft_ab = self.store.nachricht_ablauf();
        let nachricht =
            zugang::mit_aktivem_raum_mut(&self.store, &self.broadcaster, raum_id, |raum| {
                let mitglied = zugang::mitglied_pruefen(raum, benutzer_id)?;
                let nachricht = Nachricht {
                    id: NachrichtenId::new(),
                    raum_id: raum.id,
                    benutzer_id: *benutzer_id,
                    // Anzeigename wird beim Senden eingefroren
                    anzeigename: mitglied.anzeigename.clone(),
                    inhalt: inhalt.to_string(),
                    nonce: nonce.to_string(),
                    salt: salt.map(str::to_string),
                    zeitstempel: Utc::now(),
                    laeuft_ab,
                };
                raum.nachrichten.push(nachricht.clone());
                Ok(nachricht)
            })?;

        self.broadcaster.an_raum_ausser_benutzer_senden(
            raum_id,
            benutzer_id,
            RaumEvent::NewMessage {
                message: nachricht.clone(),
            },
        );

        tracing::debug!(
            raum_id = %raum_id,
            nachricht_id = %nachricht.id,
            "Nachricht angenommen"
        );
        Ok(NachrichtenQuittung {
            id: nachricht.id,
            timestamp: nachricht.zeitstempel,
        })
    }

    /// Listet die aktiven Nachrichten eines Raums in Ankunftsreihenfolge
    ///
    /// `seit` filtert auf Erstellzeit strikt groesser; abgelaufene
    /// Nachrichten sind unabhaengig von `seit` nie enthalten.
    pub fn auflisten(
        &self,
        raum_id: &RaumId,
        benutzer_id: &BenutzerId,
        seit: Option<DateTime<Utc>>,
    ) -> Result<Vec<Nachricht>> {
        zugang::mit_aktivem_raum(&self.store, &self.broadcaster, raum_id, |raum| {
            zugang::mitglied_pruefen(raum, benutzer_id)?;
            Ok(raum
                .nachrichten
                .iter()
                .filter(|n| !n.ist_abgelaufen())
                .filter(|n| seit.map(|s| n.zeitstempel > s).unwrap_or(true))
                .cloned()
                .collect())
        })
    }

    /// Entfernt abgelaufene Nachrichten aus allen Raeumen
    ///
    /// Administrativ auf Abruf und vom periodischen Sweep genutzt.
    /// Gibt die Gesamtzahl der entfernten Nachrichten zurueck.
    pub fn abgelaufene_entfernen(&self) -> usize {
        let mut entfernt = 0;
        for raum_id in self.store.raum_ids() {
            // Ein fehlender (inzwischen evakuierter) Raum ist kein Fehler
            if let Ok(anzahl) = self
                .store
                .mit_raum_mut(&raum_id, |r| r.abgelaufene_nachrichten_entfernen())
            {
                entfernt += anzahl;
            }
        }
        if entfernt > 0 {
            tracing::info!(anzahl = entfernt, "Abgelaufene Nachrichten entfernt");
        }
        entfernt
    }

    // -----------------------------------------------------------------------
    // Interne Hilfsmethoden
    // -----------------------------------------------------------------------

    /// Prueft die Kodierungsebene der Payload
    fn payload_pruefen(&self, inhalt: &str, nonce: &str, salt: Option<&str>) -> Result<()> {
        if inhalt.is_empty() || nonce.is_empty() {
            return Err(NachtfunkError::Validierung(
                "Pflichtfelder fehlen: encryptedPayload und nonce".into(),
            ));
        }

        let payload = BASE64.decode(inhalt).map_err(|_| {
            NachtfunkError::UngueltigeVerschluesselung("Payload ist kein gueltiges Base64".into())
        })?;
        let nonce_bytes = BASE64.decode(nonce).map_err(|_| {
            NachtfunkError::UngueltigeVerschluesselung("Nonce ist kein gueltiges Base64".into())
        })?;
        if let Some(salt) = salt {
            BASE64.decode(salt).map_err(|_| {
                NachtfunkError::UngueltigeVerschluesselung("Salt ist kein gueltiges Base64".into())
            })?;
        }

        if nonce_bytes.len() != self.config.nonce_laenge_bytes {
            return Err(NachtfunkError::UngueltigeVerschluesselung(format!(
                "Nonce muss exakt {} Bytes lang sein (war {})",
                self.config.nonce_laenge_bytes,
                nonce_bytes.len()
            )));
        }
        if payload.len() < MIN_CIPHERTEXT_BYTES {
            return Err(NachtfunkError::UngueltigeVerschluesselung(format!(
                "Ciphertext zu kurz: {} Bytes (Minimum: {MIN_CIPHERTEXT_BYTES})",
                payload.len()
            )));
        }
        if payload.len() > self.config.max_groesse_bytes {
            return Err(NachtfunkError::NachrichtZuGross {
                groesse: payload.len(),
                max: self.config.max_groesse_bytes,
            });
        }
        Ok(())
    }
}
