//! Unit-Tests fuer den RaumService

use nachtfunk_core::{BenutzerId, NachtfunkError};
use nachtfunk_relay::{AusgehendesFrame, RaumEvent};
use nachtfunk_store::StoreConfig;

use crate::tests::{test_umgebung, test_umgebung_mit, SALT};
use crate::NachrichtenConfig;

#[test]
fn test_raum_erstellen_mit_ersteller_als_mitglied() {
    let umgebung = test_umgebung();
    let alice = BenutzerId::new();

    let uebersicht = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, alice, "Alice")
        .expect("Raum erstellen fehlgeschlagen");

    assert_eq!(uebersicht.name, "Treffpunkt");
    assert_eq!(uebersicht.salt, SALT);
    assert_eq!(uebersicht.user_count, 1);
    assert!(uebersicht.expires_at > uebersicht.created);

    let info = umgebung.raeume.info(&uebersicht.id).expect("Info fehlgeschlagen");
    assert_eq!(info.users.len(), 1);
    assert_eq!(info.users[0].display_name, "Alice");
    assert_eq!(info.message_count, 0);
}

#[test]
fn test_pflichtfelder_werden_geprueft() {
    let umgebung = test_umgebung();
    let alice = BenutzerId::new();

    let fehler = umgebung
        .raeume
        .erstellen("  ", "geheim1", SALT, alice, "Alice")
        .unwrap_err();
    assert!(matches!(fehler, NachtfunkError::Validierung(_)));
    assert_eq!(fehler.http_status(), 400);

    let fehler = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, alice, "")
        .unwrap_err();
    assert!(matches!(fehler, NachtfunkError::Validierung(_)));
}

#[test]
fn test_doppelter_name_wird_abgelehnt() {
    let umgebung = test_umgebung();

    umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, BenutzerId::new(), "Alice")
        .expect("Erster Raum fehlgeschlagen");

    // Namensvergleich ignoriert Gross-/Kleinschreibung
    let fehler = umgebung
        .raeume
        .erstellen("TREFFPUNKT", "anderes", SALT, BenutzerId::new(), "Bob")
        .unwrap_err();
    assert!(matches!(fehler, NachtfunkError::Konflikt(_)));
    assert_eq!(fehler.http_status(), 409);
}

#[test]
fn test_beitritt_mit_falschem_passwort() {
    let umgebung = test_umgebung();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, BenutzerId::new(), "Alice")
        .expect("Raum erstellen fehlgeschlagen");

    let fehler = umgebung
        .raeume
        .beitreten(&raum.id, BenutzerId::new(), "falsch1", "Bob")
        .unwrap_err();
    assert!(matches!(fehler, NachtfunkError::ZugriffVerweigert(_)));
    assert_eq!(fehler.http_status(), 403);

    // Der Fehlversuch darf keine Mitgliedschaft hinterlassen
    let info = umgebung.raeume.info(&raum.id).expect("Info fehlgeschlagen");
    assert_eq!(info.user_count, 1);
}

#[test]
fn test_beitritt_informiert_bestehende_mitglieder() {
    let umgebung = test_umgebung();
    let alice = BenutzerId::new();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, alice, "Alice")
        .expect("Raum erstellen fehlgeschlagen");
    let (_alice_verbindung, mut alice_rx) =
        umgebung.broadcaster.verbindung_registrieren(raum.id, alice);

    let uebersicht = umgebung
        .raeume
        .beitreten(&raum.id, BenutzerId::new(), "geheim1", "Bob")
        .expect("Beitritt fehlgeschlagen");
    assert_eq!(uebersicht.user_count, 2);

    match alice_rx.try_recv().expect("Kein Event bei Alice angekommen") {
        AusgehendesFrame::Event(RaumEvent::UserJoined { display_name, .. }) => {
            assert_eq!(display_name, "Bob");
        }
        anderes => panic!("Unerwartetes Frame: {anderes:?}"),
    }
}

#[test]
fn test_wiederbeitritt_ist_idempotent() {
    let umgebung = test_umgebung();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, BenutzerId::new(), "Alice")
        .expect("Raum erstellen fehlgeschlagen");
    let bob = BenutzerId::new();

    umgebung
        .raeume
        .beitreten(&raum.id, bob, "geheim1", "Bob")
        .expect("Erster Beitritt fehlgeschlagen");
    let uebersicht = umgebung
        .raeume
        .beitreten(&raum.id, bob, "geheim1", "Bobby")
        .expect("Wiederbeitritt fehlgeschlagen");

    assert_eq!(uebersicht.user_count, 2);
    let info = umgebung.raeume.info(&raum.id).expect("Info fehlgeschlagen");
    assert!(info.users.iter().any(|m| m.display_name == "Bobby"));
    assert!(!info.users.iter().any(|m| m.display_name == "Bob"));
}

#[test]
fn test_verlassen_ohne_mitgliedschaft() {
    let umgebung = test_umgebung();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, BenutzerId::new(), "Alice")
        .expect("Raum erstellen fehlgeschlagen");

    let fehler = umgebung
        .raeume
        .verlassen(&raum.id, &BenutzerId::new())
        .unwrap_err();
    assert!(matches!(fehler, NachtfunkError::ZugriffVerweigert(_)));
}

#[test]
fn test_verlassen_informiert_verbleibende_mitglieder() {
    let umgebung = test_umgebung();
    let alice = BenutzerId::new();
    let bob = BenutzerId::new();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, alice, "Alice")
        .expect("Raum erstellen fehlgeschlagen");
    umgebung
        .raeume
        .beitreten(&raum.id, bob, "geheim1", "Bob")
        .expect("Beitritt fehlgeschlagen");
    let (_bob_verbindung, mut bob_rx) =
        umgebung.broadcaster.verbindung_registrieren(raum.id, bob);

    umgebung
        .raeume
        .verlassen(&raum.id, &alice)
        .expect("Verlassen fehlgeschlagen");

    match bob_rx.try_recv().expect("Kein Event bei Bob angekommen") {
        AusgehendesFrame::Event(RaumEvent::UserLeft { display_name, .. }) => {
            assert_eq!(display_name, "Alice");
        }
        anderes => panic!("Unerwartetes Frame: {anderes:?}"),
    }
}

#[test]
fn test_letztes_mitglied_loescht_den_raum() {
    let umgebung = test_umgebung();
    let alice = BenutzerId::new();
    let raum = umgebung
        .raeume
        .erstellen("Treffpunkt", "geheim1", SALT, alice, "Alice")
        .expect("Raum erstellen fehlgeschlagen");
    let (alice_verbindung, _alice_rx) =
        umgebung.broadcaster.verbindung_registrieren(raum.id, alice);

    umgebung
        .raeume
        .verlassen(&raum.id, &alice)
        .expect("Verlassen fehlgeschlagen");

    assert!(matches!(
        umgebung.raeume.info(&raum.id).unwrap_err(),
        NachtfunkError::NichtGefunden
    ));
    assert_eq!(umgebung.store.raum_anzahl(), 0);
    assert!(!umgebung.broadcaster.ist_registriert(&alice_verbindung));
}

#[test]
fn test_namensrueckgewinnung_schliesst_verbindungen_des_alten_inhabers() {
    let umgebung = test_umgebung_mit(
        StoreConfig {
            raum_ttl_sek: 0,
            nachricht_ttl_sek: 0,
        },
        NachrichtenConfig::default(),
    );
    let alt = umgebung
        .store
        .raum_anlegen("Alpha", "geheim1", SALT)
        .expect("Raum anlegen fehlgeschlagen");
    let (verbindung, _rx) = umgebung
        .broadcaster
        .verbindung_registrieren(alt.id, BenutzerId::new());

    // Der Name wird neu vergeben; der abgelaufene Inhaber wird dabei
    // entfernt und seine Verbindungen mit ihm
    let neu = umgebung
        .store
        .raum_anlegen("alpha", "geheim2", SALT)
        .expect("Namensrueckgewinnung fehlgeschlagen");
    assert_ne!(alt.id, neu.id);
    assert!(!umgebung.broadcaster.ist_registriert(&verbindung));
    assert_eq!(umgebung.broadcaster.verbindungs_anzahl(&alt.id), 0);
}

#[test]
fn test_abgelaufener_raum_meldet_nicht_gefunden() {
    let umgebung = test_umgebung_mit(
        StoreConfig {
            raum_ttl_sek: 0,
            nachricht_ttl_sek: 0,
        },
        NachrichtenConfig::default(),
    );
    // Direkt im Store anlegen: bei TTL 0 ist der Raum sofort abgelaufen
    let raum = umgebung
        .store
        .raum_anlegen("Fluechtig", "geheim1", SALT)
        .expect("Raum anlegen fehlgeschlagen");

    let fehler = umgebung.raeume.info(&raum.id).unwrap_err();
    assert!(matches!(fehler, NachtfunkError::NichtGefunden));
    assert_eq!(fehler.http_status(), 404);
    // Lazy-Eviktion hat den Raum tatsaechlich entfernt
    assert_eq!(umgebung.store.raum_anzahl(), 0);
}
