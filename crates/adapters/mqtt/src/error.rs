//! MQTT adapter error types.

use smartnode_domain::error::SmartNodeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// No session with the broker has been established yet.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The broker did not acknowledge the connection in time.
    #[error("MQTT broker did not acknowledge the connection")]
    ConnectTimeout,

    /// The broker refused the connection.
    #[error("MQTT connection refused: {0:?}")]
    Refused(rumqttc::ConnectReturnCode),

    /// The network connection to the broker failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to encode an outgoing payload as JSON.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),
}

impl MqttError {
    /// Convert into a [`SmartNodeError::Hub`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> SmartNodeError {
        SmartNodeError::Hub(Box::new(self))
    }
}

impl From<MqttError> for SmartNodeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
