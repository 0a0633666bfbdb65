//! MQTT hub bridge configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the hub bridge broker lives and how to talk to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker host name or address.
    pub broker_host: String,
    /// Broker TCP port.
    pub broker_port: u16,
    /// Client id presented to the broker.
    pub client_id: String,
    /// Topic prefix under which the bridge listens for device commands.
    pub base_topic: String,
    /// Seconds between pings on an idle session.
    pub keep_alive_secs: u16,
    /// How long to wait for the broker to acknowledge the connection, in
    /// seconds.
    pub connect_timeout_secs: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "smartnode".to_string(),
            base_topic: "tradfri".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 5,
            username: None,
            password: None,
        }
    }
}

impl MqttConfig {
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    /// Topic the bridge listens on for commands to `device_id`.
    #[must_use]
    pub fn command_topic(&self, device_id: u32) -> String {
        format!("{}/{device_id}/set", self.base_topic)
    }
}
