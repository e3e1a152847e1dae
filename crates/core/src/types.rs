//! Gemeinsame Identifikationstypen fuer Nachtfunk
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Nach aussen
//! (JSON) serialisieren sie transparent als UUID-String.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Raum-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaumId(pub Uuid);

impl RaumId {
    /// Erstellt eine neue zufaellige RaumId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for RaumId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RaumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "raum:{}", self.0)
    }
}

/// Eindeutige Benutzer-ID
///
/// Stabil fuer die Dauer einer Sitzung; wird vom Client mitgebracht oder
/// beim Erstellen eines Raums frisch vergeben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenutzerId(pub Uuid);

impl BenutzerId {
    /// Erstellt eine neue zufaellige BenutzerId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for BenutzerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BenutzerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "benutzer:{}", self.0)
    }
}

/// Eindeutige Nachrichten-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NachrichtenId(pub Uuid);

impl NachrichtenId {
    /// Erstellt eine neue zufaellige NachrichtenId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for NachrichtenId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NachrichtenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nachricht:{}", self.0)
    }
}

/// Eindeutige Verbindungs-ID (Echtzeit-Kanal)
///
/// Identifiziert eine einzelne offene WebSocket-Verbindung. Ein Benutzer
/// kann mehrere Verbindungen in demselben Raum offen halten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbindungsId(pub Uuid);

impl VerbindungsId {
    /// Erstellt eine neue zufaellige VerbindungsId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for VerbindungsId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VerbindungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verbindung:{}", self.0)
    }
}
