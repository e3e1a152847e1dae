//! nachtfunk-rooms – Raum-Lebenszyklus und Nachrichten-Annahme
//!
//! Dieses Crate implementiert:
//! - RaumService: Raeume erstellen, beitreten, verlassen, Info
//! - NachrichtenService: opake Nachrichten annehmen, auflisten, aufraeumen
//! - Zugangskontrolle: ein Pruefpunkt durch den jede raum- und
//!   nachrichtenbezogene Operation laeuft
//! - Aufraeumdienst: der periodische Sweep als eigener Task mit
//!   Start/Stopp-Lebenszyklus
//!
//! Der Broadcaster wird als Kollaborateur injiziert; die Abhaengigkeit
//! zeigt immer von hier zum Relay, nie zurueck.

pub mod nachrichten;
pub mod service;
pub mod sweep;
pub mod types;
pub mod zugang;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use nachrichten::{NachrichtenConfig, NachrichtenService};
pub use service::RaumService;
pub use sweep::Aufraeumdienst;
pub use types::{MitgliedInfo, NachrichtenQuittung, RaumInfo, RaumUebersicht};
