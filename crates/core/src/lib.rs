//! nachtfunk-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Nachtfunk-Crates gemeinsam genutzt werden: ID-Newtypes und
//! die Fehler-Taxonomie des Servers.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{NachtfunkError, Result};
pub use types::{BenutzerId, NachrichtenId, RaumId, VerbindungsId};
