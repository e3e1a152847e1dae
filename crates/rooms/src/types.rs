//! Oeffentliche Antwort-Typen der Raum- und Nachrichten-Dienste

use chrono::{DateTime, Utc};
use nachtfunk_core::{NachrichtenId, RaumId};
use serde::{Deserialize, Serialize};

/// Kompakte Raum-Zusammenfassung (Antwort auf Erstellen/Beitreten)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumUebersicht {
    pub id: RaumId,
    pub name: String,
    /// Opakes Salt fuer die clientseitige Schluesselableitung
    pub salt: String,
    pub user_count: usize,
    pub created: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Ein Mitglied in der Raum-Info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitgliedInfo {
    pub display_name: String,
}

/// Vollstaendige Raum-Info (Antwort auf get-room-info)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumInfo {
    pub id: RaumId,
    pub name: String,
    pub user_count: usize,
    pub users: Vec<MitgliedInfo>,
    pub message_count: usize,
    pub created: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Quittung fuer eine angenommene Nachricht
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NachrichtenQuittung {
    pub id: NachrichtenId,
    pub timestamp: DateTime<Utc>,
}
