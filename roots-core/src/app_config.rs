use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Where and how order notifications are delivered
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotifierConfig {
    /// Shop's WhatsApp number; formatting characters are stripped before use
    pub destination_number: String,
    pub native_scheme: String,
    pub primary_host: String,
    pub fallback_host: String,
    /// Delay before the web fallback on mobile devices
    pub fallback_delay_ms: u64,
    /// How long a synthesized trigger lives before teardown
    pub trigger_lifetime_ms: u64,
    /// Prepended to numeric order ids (`NN42`)
    pub order_prefix: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            destination_number: "919845651468".to_string(),
            native_scheme: "whatsapp".to_string(),
            primary_host: "api.whatsapp.com".to_string(),
            fallback_host: "wa.me".to_string(),
            fallback_delay_ms: 700,
            trigger_lifetime_ms: 1000,
            order_prefix: "NN".to_string(),
        }
    }
}

impl NotifierConfig {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn trigger_lifetime(&self) -> Duration {
        Duration::from_millis(self.trigger_lifetime_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment specific overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `ROOTS_NOTIFIER__DESTINATION_NUMBER=919800000000`
            .add_source(config::Environment::with_prefix("ROOTS").separator("__"))
            .build()?;

        tracing::debug!("Configuration loaded for run mode {}", run_mode);
        s.try_deserialize()
    }

    /// Build from an inline TOML document, without files or environment
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
