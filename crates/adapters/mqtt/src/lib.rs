//! # smartnode-adapter-mqtt
//!
//! MQTT adapter: forwards actuator commands to a lighting hub through an
//! MQTT bridge.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the session alive in a background
//!   task
//! - Implement the `HubClient` port: each command is published as JSON to
//!   `<base_topic>/<device_id>/set`
//!
//! ## Dependency rule
//! Same as other adapters: depends on `smartnode-app` and `smartnode-domain`.

pub mod config;
pub mod error;
pub mod hub;
pub mod payload;

pub use config::MqttConfig;
pub use error::MqttError;
pub use hub::MqttHub;
