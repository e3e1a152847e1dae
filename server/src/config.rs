//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Aufbewahrung (TTL und Sweep)
    pub aufbewahrung: AufbewahrungsEinstellungen,
    /// Validierung eingehender Nachrichten
    pub nachrichten: NachrichtenEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
    /// Gibt Fehlerdetails bei 500ern an Clients heraus
    pub entwicklungsmodus: bool,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Nachtfunk Relay".into(),
            entwicklungsmodus: false,
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP und WebSocket
    pub bind_adresse: String,
    /// Port fuer HTTP und WebSocket
    pub http_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            http_port: 3000,
        }
    }
}

/// Aufbewahrungs-Einstellungen (TTL und Sweep)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AufbewahrungsEinstellungen {
    /// Lebensdauer eines Raums ab Erstellung in Sekunden
    pub raum_ttl_sek: i64,
    /// Lebensdauer einer Nachricht ab Annahme in Sekunden
    pub nachricht_ttl_sek: i64,
    /// Intervall des periodischen Sweeps in Sekunden
    pub sweep_intervall_sek: u64,
}

impl Default for AufbewahrungsEinstellungen {
    fn default() -> Self {
        Self {
            raum_ttl_sek: 3600,
            nachricht_ttl_sek: 3600,
            sweep_intervall_sek: 60,
        }
    }
}

/// Validierungs-Einstellungen fuer eingehende Nachrichten
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NachrichtenEinstellungen {
    /// Maximale dekodierte Payload-Groesse in Bytes
    pub max_groesse_bytes: usize,
    /// Exakte Nonce-Laenge in Bytes
    pub nonce_laenge_bytes: usize,
}

impl Default for NachrichtenEinstellungen {
    fn default() -> Self {
        Self {
            max_groesse_bytes: 10_000,
            nonce_laenge_bytes: 12,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die vollstaendige Bind-Adresse fuer HTTP zurueck
    pub fn http_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.http_port, 3000);
        assert_eq!(cfg.aufbewahrung.raum_ttl_sek, 3600);
        assert_eq!(cfg.aufbewahrung.sweep_intervall_sek, 60);
        assert_eq!(cfg.nachrichten.max_groesse_bytes, 10_000);
        assert_eq!(cfg.nachrichten.nonce_laenge_bytes, 12);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.server.entwicklungsmodus);
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.http_bind_adresse(), "0.0.0.0:3000");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Testfunk"
            entwicklungsmodus = true

            [netzwerk]
            http_port = 8080

            [aufbewahrung]
            raum_ttl_sek = 120
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Testfunk");
        assert!(cfg.server.entwicklungsmodus);
        assert_eq!(cfg.netzwerk.http_port, 8080);
        assert_eq!(cfg.aufbewahrung.raum_ttl_sek, 120);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.aufbewahrung.nachricht_ttl_sek, 3600);
        assert_eq!(cfg.nachrichten.nonce_laenge_bytes, 12);
    }
}
