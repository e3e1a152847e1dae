//! Zugangskontrolle – der eine Pruefpunkt vor jeder Operation
//!
//! Reihenfolge der Pruefungen:
//! 1. Raum aufloesen; fehlt er -> `NichtGefunden`
//! 2. Abgelaufene Raeume werden dabei lazy evakuiert und melden nach
//!    aussen einheitlich `NichtGefunden` (nicht "abgelaufen")
//! 3. Fuer benutzerbezogene Operationen: Mitgliedschaft pruefen,
//!    sonst `ZugriffVerweigert`
//!
//! Der Pruefpunkt ist idempotent und frei von Nebeneffekten – mit der
//! einen Ausnahme der lazy Evakuierung, die auch etwaige Echtzeit-
//! Verbindungen des toten Raums schliesst.

use nachtfunk_core::{BenutzerId, NachtfunkError, RaumId, Result};
use nachtfunk_relay::RaumBroadcaster;
use nachtfunk_store::{Benutzer, Raum, RaumStore};

/// Fuehrt `f` unter dem Raum-Lock eines aktiven Raums aus (lesend)
pub fn mit_aktivem_raum<T>(
    store: &RaumStore,
    broadcaster: &RaumBroadcaster,
    raum_id: &RaumId,
    f: impl FnOnce(&Raum) -> Result<T>,
) -> Result<T> {
    match store.mit_raum(raum_id, f) {
        Ok(ergebnis) => ergebnis,
        Err(fehler) => {
            // Raum fehlt oder wurde soeben evakuiert: verbliebene
            // Echtzeit-Verbindungen zeigen ins Leere
            broadcaster.raum_schliessen(raum_id);
            Err(fehler)
        }
    }
}

/// Fuehrt `f` unter dem Raum-Lock eines aktiven Raums aus (schreibend)
pub fn mit_aktivem_raum_mut<T>(
    store: &RaumStore,
    broadcaster: &RaumBroadcaster,
    raum_id: &RaumId,
    f: impl FnOnce(&mut Raum) -> Result<T>,
) -> Result<T> {
    match store.mit_raum_mut(raum_id, f) {
        Ok(ergebnis) => ergebnis,
        Err(fehler) => {
            broadcaster.raum_schliessen(raum_id);
            Err(fehler)
        }
    }
}

/// Loest den handelnden Benutzer innerhalb der Raum-Mitgliedschaft auf
pub fn mitglied_pruefen<'a>(raum: &'a Raum, benutzer_id: &BenutzerId) -> Result<&'a Benutzer> {
    raum.mitglieder.get(benutzer_id).ok_or_else(|| {
        NachtfunkError::ZugriffVerweigert("Benutzer ist kein Mitglied des Raums".into())
    })
}
