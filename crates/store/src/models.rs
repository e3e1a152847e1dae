//! Entitaeten des Stores: Raum, Benutzer, Nachricht
//!
//! Der Server behandelt Nachrichteninhalte als opake, Ende-zu-Ende
//! verschluesselte Blobs: Base64-Strings werden gespeichert und
//! weitergereicht, aber nie entschluesselt oder interpretiert.

use chrono::{DateTime, Duration, Utc};
use nachtfunk_core::{BenutzerId, NachrichtenId, RaumId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ein Mitglied eines Raums
///
/// Ein Benutzer gehoert zu genau einem Raum; raumuebergreifende
/// Mitgliedschaft ist nicht modelliert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benutzer {
    pub id: BenutzerId,
    pub raum_id: RaumId,
    pub anzeigename: String,
    pub beigetreten: DateTime<Utc>,
}

impl Benutzer {
    /// Erstellt einen neuen Benutzer mit Beitrittszeitpunkt jetzt
    pub fn neu(id: BenutzerId, raum_id: RaumId, anzeigename: impl Into<String>) -> Self {
        Self {
            id,
            raum_id,
            anzeigename: anzeigename.into(),
            beigetreten: Utc::now(),
        }
    }
}

/// Eine gespeicherte, verschluesselte Nachricht
///
/// `anzeigename` wird beim Senden eingefroren und spaeter nicht neu
/// aufgeloest – auch wenn das Mitglied den Raum laengst verlassen hat,
/// bleibt der damalige Name an der Nachricht.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nachricht {
    pub id: NachrichtenId,
    pub raum_id: RaumId,
    #[serde(rename = "userId")]
    pub benutzer_id: BenutzerId,
    #[serde(rename = "displayName")]
    pub anzeigename: String,
    /// Base64-kodierter Ciphertext (opak)
    #[serde(rename = "encryptedPayload")]
    pub inhalt: String,
    /// Base64-kodierte Nonce (opak)
    pub nonce: String,
    /// Optionales Base64-kodiertes Salt (opak)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(rename = "timestamp")]
    pub zeitstempel: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub laeuft_ab: DateTime<Utc>,
}

impl Nachricht {
    /// Prueft ob die Nachricht abgelaufen ist
    pub fn ist_abgelaufen(&self) -> bool {
        Utc::now() > self.laeuft_ab
    }
}

/// Ein Raum: benannter, passwortgeschuetzter, zeitlich begrenzter Chat-Kontext
#[derive(Debug, Clone)]
pub struct Raum {
    pub id: RaumId,
    /// Anzeigename, eindeutig (case-insensitiv) unter allen aktiven Raeumen
    pub name: String,
    /// Geteiltes Geheimnis, unveraendert gespeichert (opak, kein Hash)
    pub passwort: String,
    /// Opakes Salt fuer die clientseitige Schluesselableitung
    pub salt: String,
    pub erstellt: DateTime<Utc>,
    /// Fest bei Erstellung gesetzt; Aktivitaet verlaengert nicht
    pub laeuft_ab: DateTime<Utc>,
    pub mitglieder: HashMap<BenutzerId, Benutzer>,
    /// Einfuegereihenfolge = Ankunftsreihenfolge
    pub nachrichten: Vec<Nachricht>,
}

impl Raum {
    /// Erstellt einen neuen Raum mit TTL ab jetzt
    pub fn neu(
        name: impl Into<String>,
        passwort: impl Into<String>,
        salt: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let jetzt = Utc::now();
        Self {
            id: RaumId::new(),
            name: name.into(),
            passwort: passwort.into(),
            salt: salt.into(),
            erstellt: jetzt,
            laeuft_ab: jetzt + ttl,
            mitglieder: HashMap::new(),
            nachrichten: Vec::new(),
        }
    }

    /// Prueft ob der Raum abgelaufen ist
    pub fn ist_abgelaufen(&self) -> bool {
        Utc::now() > self.laeuft_ab
    }

    /// Anzahl der aktuellen Mitglieder
    pub fn mitglieder_anzahl(&self) -> usize {
        self.mitglieder.len()
    }

    /// Anzahl der gespeicherten Nachrichten (inkl. evtl. abgelaufener)
    pub fn nachrichten_anzahl(&self) -> usize {
        self.nachrichten.len()
    }

    /// Entfernt abgelaufene Nachrichten und gibt die Anzahl zurueck
    pub fn abgelaufene_nachrichten_entfernen(&mut self) -> usize {
        let vorher = self.nachrichten.len();
        self.nachrichten.retain(|n| !n.ist_abgelaufen());
        vorher - self.nachrichten.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raum_mit_positiver_ttl_ist_aktiv() {
        let raum = Raum::neu("Test", "geheim", "salz", Duration::seconds(3600));
        assert!(!raum.ist_abgelaufen());
        assert_eq!(raum.mitglieder_anzahl(), 0);
    }

    #[test]
    fn raum_mit_ttl_null_laeuft_sofort_ab() {
        let raum = Raum::neu("Test", "geheim", "salz", Duration::seconds(0));
        assert!(raum.ist_abgelaufen());
    }

    #[test]
    fn abgelaufene_nachrichten_werden_entfernt() {
        let mut raum = Raum::neu("Test", "geheim", "salz", Duration::seconds(3600));
        let jetzt = Utc::now();

        let frisch = Nachricht {
            id: NachrichtenId::new(),
            raum_id: raum.id,
            benutzer_id: BenutzerId::new(),
            anzeigename: "Alice".into(),
            inhalt: "aGFsbG8=".into(),
            nonce: "bm9uY2U=".into(),
            salt: None,
            zeitstempel: jetzt,
            laeuft_ab: jetzt + Duration::seconds(3600),
        };
        let alt = Nachricht {
            laeuft_ab: jetzt - Duration::seconds(1),
            ..frisch.clone()
        };

        raum.nachrichten.push(frisch);
        raum.nachrichten.push(alt);

        let entfernt = raum.abgelaufene_nachrichten_entfernen();
        assert_eq!(entfernt, 1);
        assert_eq!(raum.nachrichten_anzahl(), 1);
    }

    #[test]
    fn nachricht_serialisiert_mit_api_feldnamen() {
        let n = Nachricht {
            id: NachrichtenId::new(),
            raum_id: RaumId::new(),
            benutzer_id: BenutzerId::new(),
            anzeigename: "Alice".into(),
            inhalt: "aGFsbG8=".into(),
            nonce: "bm9uY2U=".into(),
            salt: None,
            zeitstempel: Utc::now(),
            laeuft_ab: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert!(json.get("encryptedPayload").is_some());
        assert!(json.get("displayName").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("salt").is_none(), "leeres Salt wird weggelassen");
    }
}
