//! Unit-Tests fuer das rooms-Crate

mod raum_service_tests;

use nachtfunk_relay::RaumBroadcaster;
use nachtfunk_store::{RaumStore, StoreConfig};

use crate::{NachrichtenConfig, NachrichtenService, RaumService};

/// Gueltige Base64-Testwerte: 16-Byte-Payload, 12-Byte-Nonce, 16-Byte-Salt
pub(crate) const PAYLOAD: &str = "MDEyMzQ1Njc4OWFiY2RlZg==";
pub(crate) const NONCE: &str = "YWJjZGVmZ2hpamts";
pub(crate) const SALT: &str = "c2FsdHNhbHRzYWx0c2E=";

pub(crate) struct TestUmgebung {
    pub store: RaumStore,
    pub broadcaster: RaumBroadcaster,
    pub raeume: RaumService,
    pub nachrichten: NachrichtenService,
}

pub(crate) fn test_umgebung() -> TestUmgebung {
    test_umgebung_mit(StoreConfig::default(), NachrichtenConfig::default())
}

pub(crate) fn test_umgebung_mit(
    store_config: StoreConfig,
    nachrichten_config: NachrichtenConfig,
) -> TestUmgebung {
    let store = RaumStore::neu(store_config);
    let broadcaster = RaumBroadcaster::neu();

    // Verdrahtung wie in der Kompositionswurzel des Servers
    let hook_broadcaster = broadcaster.clone();
    store.eviktions_hook_setzen(std::sync::Arc::new(move |raum_id| {
        hook_broadcaster.raum_schliessen(&raum_id);
    }));
    TestUmgebung {
        raeume: RaumService::neu(store.clone(), broadcaster.clone()),
        nachrichten: NachrichtenService::neu(
            store.clone(),
            broadcaster.clone(),
            nachrichten_config,
        ),
        store,
        broadcaster,
    }
}
