//! Fehlertypen fuer Nachtfunk
//!
//! Zentraler Fehler-Enum der alle Fehlerzustaende des Relays abdeckt.
//! Jeder Fehler traegt eine menschenlesbare Begruendung; der zugehoerige
//! HTTP-Status wird ueber `http_status` abgeleitet.

use thiserror::Error;

/// Globaler Result-Alias fuer Nachtfunk
pub type Result<T> = std::result::Result<T, NachtfunkError>;

/// Alle moeglichen Fehler im Nachtfunk-System
#[derive(Debug, Error)]
pub enum NachtfunkError {
    // --- Eingabe ---
    #[error("Ungueltige Eingabe: {0}")]
    Validierung(String),

    #[error("Ungueltige Verschluesselungsparameter: {0}")]
    UngueltigeVerschluesselung(String),

    #[error("Nachricht zu gross: {groesse} Bytes (Maximum: {max} Bytes)")]
    NachrichtZuGross { groesse: usize, max: usize },

    // --- Ressourcen ---
    #[error("Raum nicht gefunden")]
    NichtGefunden,

    #[error("Raumname bereits vergeben: {0}")]
    Konflikt(String),

    // --- Zugriff ---
    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl NachtfunkError {
    /// Erstellt einen Validierungsfehler aus einer beliebigen Nachricht
    pub fn validierung(msg: impl Into<String>) -> Self {
        Self::Validierung(msg.into())
    }

    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// HTTP-Statuscode fuer die API-Antwort
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validierung(_) | Self::UngueltigeVerschluesselung(_) => 400,
            Self::ZugriffVerweigert(_) => 403,
            Self::NichtGefunden => 404,
            Self::Konflikt(_) => 409,
            Self::NachrichtZuGross { .. } => 413,
            Self::Intern(_) | Self::Anyhow(_) => 500,
        }
    }

    /// Gibt true zurueck wenn der Fehler vom Aufrufer verursacht wurde
    ///
    /// Clientfehler werden nie automatisch wiederholt und duerfen mit
    /// voller Begruendung an den Aufrufer zurueckgegeben werden.
    pub fn ist_clientfehler(&self) -> bool {
        self.http_status() < 500
    }
}
