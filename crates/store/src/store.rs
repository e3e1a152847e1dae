//! RaumStore – autoritative Registry aller aktiven Raeume
//!
//! Thread-safe via Arc + DashMap. Jede Mutation laeuft innerhalb eines
//! `mit_raum_mut`-Abschnitts und haelt dabei den Eintrag-Lock des Raums,
//! sodass der periodische Sweep nie einen Raum mitten in einer Mutation
//! beobachtet (ein logischer Schreiber pro Raum).
//!
//! ## Ablauf-Durchsetzung
//! - proaktiv: `abgelaufene_aufraeumen` (vom Aufraeumdienst aufgerufen)
//! - lazy: jeder Zugriff ueber `mit_raum`/`mit_raum_mut` evakuiert einen
//!   abgelaufenen Raum als Nebeneffekt und meldet `NichtGefunden`

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use nachtfunk_core::{NachtfunkError, RaumId, Result};
use std::sync::{Arc, OnceLock};

use crate::models::Raum;

/// Hook der bei jeder Raum-Entfernung feuert (Eviktion wie Loeschung)
///
/// Der Store bleibt frei von Abhaengigkeiten nach oben; die
/// Kompositionswurzel haengt hier das Schliessen der Echtzeit-
/// Verbindungen ein. Wird genau einmal gesetzt.
pub type EviktionsHook = Arc<dyn Fn(RaumId) + Send + Sync>;

/// TTL-Konfiguration des Stores
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Lebensdauer eines Raums ab Erstellung in Sekunden
    pub raum_ttl_sek: i64,
    /// Lebensdauer einer Nachricht ab Erstellung in Sekunden
    pub nachricht_ttl_sek: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            raum_ttl_sek: 3600,
            nachricht_ttl_sek: 3600,
        }
    }
}

/// Ergebnis eines Sweep-Durchlaufs
#[derive(Debug, Default)]
pub struct SweepBericht {
    /// IDs der entfernten (abgelaufenen) Raeume
    pub entfernte_raeume: Vec<RaumId>,
    /// Anzahl der aus ueberlebenden Raeumen entfernten Nachrichten
    pub entfernte_nachrichten: usize,
}

/// In-Memory-Registry RaumId -> Raum mit Namens-Index
///
/// Clone teilt den inneren Zustand (Arc).
#[derive(Clone)]
pub struct RaumStore {
    inner: Arc<RaumStoreInner>,
}

struct RaumStoreInner {
    config: StoreConfig,
    /// Alle Raeume, indiziert nach RaumId
    raeume: DashMap<RaumId, Raum>,
    /// Namens-Index: kleingeschriebener Name -> RaumId (Eindeutigkeit)
    namen: DashMap<String, RaumId>,
    /// Feuert fuer jeden tatsaechlich entfernten Raum
    eviktions_hook: OnceLock<EviktionsHook>,
}

impl RaumStore {
    /// Erstellt einen neuen, leeren RaumStore
    pub fn neu(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(RaumStoreInner {
                config,
                raeume: DashMap::new(),
                namen: DashMap::new(),
                eviktions_hook: OnceLock::new(),
            }),
        }
    }

    /// Registriert den Eviktions-Hook (einmalig, weitere Aufrufe wirkungslos)
    ///
    /// Laeuft fuer jeden entfernten Raum, egal auf welchem Pfad die
    /// Entfernung ausgeloest wurde (Sweep, lazy Eviktion, Namens-
    /// Rueckgewinnung, letztes Mitglied geht).
    pub fn eviktions_hook_setzen(&self, hook: EviktionsHook) {
        let _ = self.inner.eviktions_hook.set(hook);
    }

    /// Legt einen neuen Raum an
    ///
    /// Schlaegt mit `Konflikt` fehl wenn ein aktiver Raum mit demselben
    /// Namen (case-insensitiv) existiert. Ein abgelaufener Namensinhaber
    /// wird dabei lazy evakuiert und gibt den Namen frei.
    pub fn raum_anlegen(&self, name: &str, passwort: &str, salt: &str) -> Result<Raum> {
        let schluessel = name.to_lowercase();

        // Abgelaufenen Namensinhaber vor der Reservierung entfernen
        if let Some(bestehend) = self.inner.namen.get(&schluessel).map(|e| *e.value()) {
            let abgelaufen = self
                .inner
                .raeume
                .get(&bestehend)
                .map(|r| r.ist_abgelaufen())
                .unwrap_or(true);
            if abgelaufen {
                self.raum_loeschen(&bestehend);
            }
        }

        let raum = Raum::neu(
            name,
            passwort,
            salt,
            Duration::seconds(self.inner.config.raum_ttl_sek),
        );

        // Name atomar reservieren, erst danach den Raum eintragen
        match self.inner.namen.entry(schluessel) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(NachtfunkError::Konflikt(name.to_string()));
            }
            dashmap::mapref::entry::Entry::Vacant(frei) => {
                frei.insert(raum.id);
            }
        }
        self.inner.raeume.insert(raum.id, raum.clone());

        tracing::info!(raum_id = %raum.id, name = %raum.name, "Raum angelegt");
        Ok(raum)
    }

    /// Lesezugriff auf einen aktiven Raum
    ///
    /// Ein abgelaufener Raum wird als Nebeneffekt evakuiert; der Aufrufer
    /// sieht einheitlich `NichtGefunden`.
    pub fn mit_raum<T>(&self, id: &RaumId, f: impl FnOnce(&Raum) -> T) -> Result<T> {
        let abgelaufen = match self.inner.raeume.get(id) {
            Some(raum) => {
                if !raum.ist_abgelaufen() {
                    return Ok(f(&raum));
                }
                true
            }
            None => false,
        };
        if abgelaufen {
            tracing::debug!(raum_id = %id, "Abgelaufener Raum bei Zugriff evakuiert");
            self.raum_loeschen(id);
        }
        Err(NachtfunkError::NichtGefunden)
    }

    /// Schreibzugriff auf einen aktiven Raum
    ///
    /// Haelt waehrend `f` den Eintrag-Lock des Raums.
    pub fn mit_raum_mut<T>(&self, id: &RaumId, f: impl FnOnce(&mut Raum) -> T) -> Result<T> {
        let abgelaufen = match self.inner.raeume.get_mut(id) {
            Some(mut raum) => {
                if !raum.ist_abgelaufen() {
                    return Ok(f(&mut raum));
                }
                true
            }
            None => false,
        };
        if abgelaufen {
            tracing::debug!(raum_id = %id, "Abgelaufener Raum bei Zugriff evakuiert");
            self.raum_loeschen(id);
        }
        Err(NachtfunkError::NichtGefunden)
    }

    /// Entfernt einen Raum samt Namens-Index-Eintrag (idempotent)
    pub fn raum_loeschen(&self, id: &RaumId) {
        if let Some((_, raum)) = self.inner.raeume.remove(id) {
            self.inner
                .namen
                .remove_if(&raum.name.to_lowercase(), |_, inhaber| inhaber == id);
            // Keine Locks mehr gehalten; der Hook darf beliebig arbeiten
            if let Some(hook) = self.inner.eviktions_hook.get() {
                hook(*id);
            }
            tracing::info!(raum_id = %id, name = %raum.name, "Raum entfernt");
        }
    }

    /// Entfernt alle abgelaufenen Raeume und Nachrichten
    ///
    /// Die einzige Stelle, an der der Ablauf proaktiv durchgesetzt wird.
    /// Raeume werden einzeln behandelt, damit ein problematischer Raum
    /// den restlichen Durchlauf nicht abbricht.
    pub fn abgelaufene_aufraeumen(&self) -> SweepBericht {
        let mut bericht = SweepBericht::default();

        // Snapshot der IDs, dann einzeln bearbeiten (kein Iterieren
        // waehrend des Entfernens)
        let ids: Vec<RaumId> = self.inner.raeume.iter().map(|e| *e.key()).collect();

        for id in ids {
            let abgelaufen = match self.inner.raeume.get_mut(&id) {
                Some(mut raum) => {
                    if raum.ist_abgelaufen() {
                        true
                    } else {
                        bericht.entfernte_nachrichten += raum.abgelaufene_nachrichten_entfernen();
                        false
                    }
                }
                None => false,
            };
            if abgelaufen {
                self.raum_loeschen(&id);
                bericht.entfernte_raeume.push(id);
            }
        }

        if !bericht.entfernte_raeume.is_empty() || bericht.entfernte_nachrichten > 0 {
            tracing::info!(
                raeume = bericht.entfernte_raeume.len(),
                nachrichten = bericht.entfernte_nachrichten,
                "Sweep abgeschlossen"
            );
        }
        bericht
    }

    /// Snapshot aller aktuellen Raum-IDs
    pub fn raum_ids(&self) -> Vec<RaumId> {
        self.inner.raeume.iter().map(|e| *e.key()).collect()
    }

    /// Anzahl der gespeicherten Raeume (inkl. evtl. abgelaufener)
    pub fn raum_anzahl(&self) -> usize {
        self.inner.raeume.len()
    }

    /// Ablaufzeitpunkt fuer eine jetzt erstellte Nachricht
    pub fn nachricht_ablauf(&self) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(self.inner.config.nachricht_ttl_sek)
    }
}

impl Default for RaumStore {
    fn default() -> Self {
        Self::neu(StoreConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
