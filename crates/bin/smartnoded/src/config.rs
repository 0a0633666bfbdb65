//! Configuration loading: TOML file with environment variable and
//! command-line overrides.
//!
//! Looks for `smartnode.toml` in the working directory unless a path is
//! given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values, and flags over
//! both.

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use smartnode_adapter_mqtt::MqttConfig;
use smartnode_app::engine::Timing;

use crate::cli::Cli;
use crate::profile::Profile;

const DEFAULT_PATH: &str = "smartnode.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Which resource to serve and where its hardware lives.
    pub resource: ResourceConfig,
    /// Hub bridge; hub-backed profiles run in simulation without it.
    pub hub: Option<MqttConfig>,
    /// Notify loop and shutdown delays.
    pub timing: TimingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Resource selection and hardware wiring.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub profile: Profile,
    /// Synthesize values instead of binding hardware or the hub.
    pub simulation: bool,
    /// GPIO pin of the motion sensor.
    pub gpio_pin: u32,
    /// IIO device of the thermistor ADC.
    pub adc_device: u32,
    /// ADC channel of the thermistor.
    pub adc_channel: u32,
    /// Hub device to drive; the profile's default when absent.
    pub hub_device_id: Option<u32>,
}

/// Delays in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_delay_ms: u64,
    pub period_ms: u64,
    pub shutdown_grace_ms: u64,
}

impl Config {
    /// Load configuration from the file named by `cli` (or `smartnode.toml`
    /// if present), then apply environment and command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicitly named
    /// file cannot be read, or if the result fails validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(DEFAULT_PATH), false)?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("SMARTNODE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("SMARTNODE_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("SMARTNODE_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SMARTNODE_PROFILE") {
            match Profile::from_str(&val, true) {
                Ok(profile) => self.resource.profile = profile,
                Err(_) => tracing::warn!(value = %val, "ignoring unknown SMARTNODE_PROFILE"),
            }
        }
        if let Some(val) = var("SMARTNODE_SIMULATION") {
            self.resource.simulation = matches!(val.as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(val) = var("SMARTNODE_MQTT_HOST") {
            self.hub.get_or_insert_with(MqttConfig::default).broker_host = val;
        }
        if let Some(val) = var("SMARTNODE_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.hub.get_or_insert_with(MqttConfig::default).broker_port = port;
        }
        if let Some(val) = var("SMARTNODE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if cli.simulation {
            self.resource.simulation = true;
        }
        if let Some(profile) = cli.profile {
            self.resource.profile = profile;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.timing.period_ms == 0 {
            return Err(ConfigError::Validation(
                "notify period must be non-zero".to_string(),
            ));
        }
        if self.timing.shutdown_grace_ms == 0 {
            return Err(ConfigError::Validation(
                "shutdown grace must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl TimingConfig {
    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            period: Duration::from_millis(self.period_ms),
        }
    }

    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smartnoded=info,smartnode=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            simulation: false,
            gpio_pin: 5,
            adc_device: 0,
            adc_channel: 1,
            hub_device_id: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 200,
            period_ms: 2000,
            shutdown_grace_ms: 1000,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
