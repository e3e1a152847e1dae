//! RaumService – Erstellen, Beitreten, Verlassen, Info
//!
//! Zustandsmaschine pro Raum:
//! ```text
//! Aktiv --Ablauf--> Abgelaufen (terminal, Loeschung)
//! Aktiv --letztes Mitglied geht--> Leer -> Geloescht
//! ```

use nachtfunk_core::{BenutzerId, NachtfunkError, RaumId, Result};
use nachtfunk_relay::{RaumBroadcaster, RaumEvent};
use nachtfunk_store::{Benutzer, Raum, RaumStore};

use crate::types::{MitgliedInfo, RaumInfo, RaumUebersicht};
use crate::zugang;

/// Verwaltet den Lebenszyklus aller Raeume
///
/// Store und Broadcaster werden injiziert; Clone teilt beide Handles.
#[derive(Clone)]
pub struct RaumService {
    store: RaumStore,
    broadcaster: RaumBroadcaster,
}

impl RaumService {
    /// Erstellt einen neuen RaumService
    pub fn neu(store: RaumStore, broadcaster: RaumBroadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Erstellt einen Raum und traegt den Ersteller als erstes Mitglied ein
    ///
    /// Aus Client-Sicht atomar: der Raum wird erst beantwortet, wenn der
    /// Ersteller Mitglied ist; die RaumId ist vorher niemandem bekannt.
    pub fn erstellen(
        &self,
        name: &str,
        passwort: &str,
        salt: &str,
        ersteller_id: BenutzerId,
        anzeigename: &str,
    ) -> Result<RaumUebersicht> {
        pflichtfeld(name, "name")?;
        pflichtfeld(passwort, "password")?;
        pflichtfeld(salt, "salt")?;
        pflichtfeld(anzeigename, "displayName")?;

        let raum = self.store.raum_anlegen(name, passwort, salt)?;

        let uebersicht = self.store.mit_raum_mut(&raum.id, |r| {
            r.mitglieder
                .insert(ersteller_id, Benutzer::neu(ersteller_id, r.id, anzeigename));
            uebersicht_von(r)
        })?;

        tracing::info!(
            raum_id = %raum.id,
            benutzer_id = %ersteller_id,
            "Raum erstellt, Ersteller beigetreten"
        );
        Ok(uebersicht)
    }

    /// Tritt einem aktiven Raum bei
    ///
    /// Wiederbeitritt mit derselben BenutzerId ist idempotent und
    /// aktualisiert nur den Anzeigenamen. Die uebrigen Mitglieder
    /// bekommen ein `user_joined`-Event.
    pub fn beitreten(
        &self,
        raum_id: &RaumId,
        benutzer_id: BenutzerId,
        passwort: &str,
        anzeigename: &str,
    ) -> Result<RaumUebersicht> {
        pflichtfeld(passwort, "password")?;
        pflichtfeld(anzeigename, "displayName")?;

        let uebersicht =
            zugang::mit_aktivem_raum_mut(&self.store, &self.broadcaster, raum_id, |raum| {
                if raum.passwort != passwort {
                    return Err(NachtfunkError::ZugriffVerweigert("Falsches Passwort".into()));
                }
                raum.mitglieder
                    .insert(benutzer_id, Benutzer::neu(benutzer_id, raum.id, anzeigename));
                Ok(uebersicht_von(raum))
            })?;

        self.broadcaster.an_raum_ausser_benutzer_senden(
            raum_id,
            &benutzer_id,
            RaumEvent::beigetreten(anzeigename),
        );

        tracing::info!(raum_id = %raum_id, benutzer_id = %benutzer_id, "Benutzer beigetreten");
        Ok(uebersicht)
    }

    /// Verlaesst einen Raum
    ///
    /// Geht das letzte Mitglied, wird der Raum samt aller Nachrichten
    /// geloescht und seine Echtzeit-Verbindungen geschlossen. Das
    /// `user_left`-Event geht vor der Loeschpruefung raus.
    pub fn verlassen(&self, raum_id: &RaumId, benutzer_id: &BenutzerId) -> Result<()> {
        let (anzeigename, verbleibend) =
            zugang::mit_aktivem_raum_mut(&self.store, &self.broadcaster, raum_id, |raum| {
                let mitglied = raum.mitglieder.remove(benutzer_id).ok_or_else(|| {
                    NachtfunkError::ZugriffVerweigert("Benutzer ist kein Mitglied des Raums".into())
                })?;
                Ok((mitglied.anzeigename, raum.mitglieder_anzahl()))
            })?;

        self.broadcaster.an_raum_ausser_benutzer_senden(
            raum_id,
            benutzer_id,
            RaumEvent::verlassen(&anzeigename),
        );

        if verbleibend == 0 {
            self.store.raum_loeschen(raum_id);
            self.broadcaster.raum_schliessen(raum_id);
            tracing::info!(raum_id = %raum_id, "Letztes Mitglied gegangen, Raum geloescht");
        } else {
            tracing::info!(raum_id = %raum_id, benutzer_id = %benutzer_id, "Benutzer gegangen");
        }
        Ok(())
    }

    /// Liefert die vollstaendige Raum-Info (nur lesend)
    pub fn info(&self, raum_id: &RaumId) -> Result<RaumInfo> {
        zugang::mit_aktivem_raum(&self.store, &self.broadcaster, raum_id, |raum| {
            Ok(RaumInfo {
                id: raum.id,
                name: raum.name.clone(),
                user_count: raum.mitglieder_anzahl(),
                users: raum
                    .mitglieder
                    .values()
                    .map(|m| MitgliedInfo {
                        display_name: m.anzeigename.clone(),
                    })
                    .collect(),
                message_count: raum.nachrichten_anzahl(),
                created: raum.erstellt,
                expires_at: raum.laeuft_ab,
            })
        })
    }
}

/// Baut die kompakte Uebersicht aus einem Raum
fn uebersicht_von(raum: &Raum) -> RaumUebersicht {
    RaumUebersicht {
        id: raum.id,
        name: raum.name.clone(),
        salt: raum.salt.clone(),
        user_count: raum.mitglieder_anzahl(),
        created: raum.erstellt,
        expires_at: raum.laeuft_ab,
    }
}

/// Prueft ein Pflichtfeld auf nicht-leeren Inhalt
fn pflichtfeld(wert: &str, feld: &str) -> Result<()> {
    if wert.trim().is_empty() {
        return Err(NachtfunkError::Validierung(format!(
            "Pflichtfeld fehlt oder ist leer: {feld}"
        )));
    }
    Ok(())
}
