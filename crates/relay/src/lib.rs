//! nachtfunk-relay – Echtzeit-Broadcast-Gewebe
//!
//! Verwaltet pro Raum die Menge der offenen Echtzeit-Verbindungen und
//! verteilt Events (neue Nachricht, Beitritt, Austritt, Systemhinweis)
//! an alle Mitglieder. Zustellung ist best-effort, at-most-once, ohne
//! Wiederholung: wer nicht verbunden ist, holt sich den Stand spaeter
//! per Nachrichten-Abruf.

pub mod broadcast;
pub mod event;

// Bequeme Re-Exporte
pub use broadcast::RaumBroadcaster;
pub use event::{AusgehendesFrame, RaumEvent};
