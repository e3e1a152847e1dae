//! nachtfunk-store – In-Memory Entity-Store
//!
//! Autoritative Abbildung RaumId -> Raum. Jeder Raum besitzt exklusiv
//! seine Mitglieder und Nachrichten; der Store setzt die Ablauf-Politik
//! (feste TTL ab Erstellung) durch. Persistenz gibt es bewusst nicht –
//! ein Prozessneustart leert den Store vollstaendig.

pub mod models;
pub mod store;

// Bequeme Re-Exporte
pub use models::{Benutzer, Nachricht, Raum};
pub use store::{EviktionsHook, RaumStore, StoreConfig, SweepBericht};
