//! Event-Frames des Echtzeit-Kanals
//!
//! Jedes Event wird als getaggtes JSON-Objekt (`"type": "..."`) an die
//! Clients gepusht. `new_message` traegt den vollstaendigen
//! Nachrichten-Datensatz inklusive Anzeigename, damit der Client ohne
//! zweiten Roundtrip rendern kann.

use chrono::{DateTime, Utc};
use nachtfunk_store::Nachricht;
use serde::{Deserialize, Serialize};

/// Event-Arten die der Server in einen Raum pusht
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RaumEvent {
    /// Neue Nachricht im Raum (vollstaendiger Datensatz)
    NewMessage { message: Nachricht },
    /// Ein Mitglied ist beigetreten
    #[serde(rename_all = "camelCase")]
    UserJoined {
        display_name: String,
        timestamp: DateTime<Utc>,
    },
    /// Ein Mitglied hat den Raum verlassen
    #[serde(rename_all = "camelCase")]
    UserLeft {
        display_name: String,
        timestamp: DateTime<Utc>,
    },
    /// Freitext-Hinweis des Servers
    System { notice: String },
}

impl RaumEvent {
    /// Beitritts-Event mit Zeitstempel jetzt
    pub fn beigetreten(display_name: impl Into<String>) -> Self {
        Self::UserJoined {
            display_name: display_name.into(),
            timestamp: Utc::now(),
        }
    }

    /// Austritts-Event mit Zeitstempel jetzt
    pub fn verlassen(display_name: impl Into<String>) -> Self {
        Self::UserLeft {
            display_name: display_name.into(),
            timestamp: Utc::now(),
        }
    }

    /// System-Hinweis
    pub fn system(notice: impl Into<String>) -> Self {
        Self::System {
            notice: notice.into(),
        }
    }
}

/// Was ueber die Send-Queue einer Verbindung laeuft
///
/// `Roh` sind Client-Frames die der Server woertlich an die uebrigen
/// Verbindungen im Raum weiterreicht (Peer-to-Peer-Passthrough) – sie
/// beruehren den Entity-Store nicht und werden nicht umkodiert.
#[derive(Debug, Clone)]
pub enum AusgehendesFrame {
    Event(RaumEvent),
    Roh(String),
}

impl AusgehendesFrame {
    /// Serialisiert das Frame fuer den Draht
    ///
    /// Rohe Frames gehen unveraendert raus, Events als getaggtes JSON.
    pub fn als_text(&self) -> String {
        match self {
            Self::Roh(text) => text.clone(),
            Self::Event(event) => {
                serde_json::to_string(event).unwrap_or_else(|e| {
                    tracing::error!(fehler = %e, "Event nicht serialisierbar");
                    String::from("{\"type\":\"system\",\"notice\":\"Interner Fehler\"}")
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tragen_den_richtigen_typ_tag() {
        let json = serde_json::to_value(RaumEvent::beigetreten("Alice")).unwrap();
        assert_eq!(json["type"], "user_joined");
        assert_eq!(json["displayName"], "Alice");

        let json = serde_json::to_value(RaumEvent::verlassen("Bob")).unwrap();
        assert_eq!(json["type"], "user_left");

        let json = serde_json::to_value(RaumEvent::system("Hinweis")).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["notice"], "Hinweis");
    }

    #[test]
    fn rohes_frame_bleibt_woertlich() {
        let frame = AusgehendesFrame::Roh("{\"eigenes\":\"protokoll\"}".into());
        assert_eq!(frame.als_text(), "{\"eigenes\":\"protokoll\"}");
    }
}
