//! Hub client backed by an MQTT bridge.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Packet, QoS,
};
use smartnode_app::ports::HubClient;
use smartnode_domain::command::DeviceCommand;
use smartnode_domain::error::SmartNodeError;
use tokio::sync::Mutex;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::payload::SetPayload;

/// Capacity of the outgoing request queue between client and event loop.
const REQUEST_CAPACITY: usize = 100;
/// Pause before polling again after the connection dropped.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Publishes device commands to `<base_topic>/<device_id>/set`.
pub struct MqttHub {
    config: MqttConfig,
    client: AsyncClient,
    event_loop: Mutex<Option<EventLoop>>,
    connected: Arc<AtomicBool>,
}

impl MqttHub {
    /// Create a client; nothing is sent until [`HubClient::connect`].
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(config.keep_alive());
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);

        Self {
            config,
            client,
            event_loop: Mutex::new(Some(event_loop)),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn open(&self) -> Result<(), MqttError> {
        let mut slot = self.event_loop.lock().await;
        let Some(mut event_loop) = slot.take() else {
            // already handed to the background task
            return Ok(());
        };

        let outcome =
            match tokio::time::timeout(self.config.connect_timeout(), wait_for_ack(&mut event_loop))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(MqttError::ConnectTimeout),
            };
        if let Err(err) = outcome {
            *slot = Some(event_loop);
            return Err(err);
        }

        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            "connected to hub bridge"
        );
        self.connected.store(true, Ordering::SeqCst);
        tokio::spawn(drive(event_loop, Arc::clone(&self.connected)));
        Ok(())
    }

    async fn publish(&self, device_id: u32, command: DeviceCommand) -> Result<(), MqttError> {
        if !self.is_connected() {
            return Err(MqttError::NotConnected);
        }
        let topic = self.config.command_topic(device_id);
        let body =
            serde_json::to_vec(&SetPayload::from(&command)).map_err(MqttError::PayloadEncode)?;
        tracing::debug!(topic = %topic, ?command, "publishing hub command");
        self.client
            .publish(topic, QoS::AtLeastOnce, false, body)
            .await
            .map_err(MqttError::Client)
    }
}

impl HubClient for MqttHub {
    fn connect(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
        async move { self.open().await.map_err(MqttError::into_domain) }
    }

    fn set_device(
        &self,
        device_id: u32,
        command: DeviceCommand,
    ) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
        async move {
            self.publish(device_id, command)
                .await
                .map_err(MqttError::into_domain)
        }
    }
}

async fn wait_for_ack(event_loop: &mut EventLoop) -> Result<(), MqttError> {
    loop {
        let event = event_loop.poll().await.map_err(MqttError::Connection)?;
        if let Event::Incoming(Packet::ConnAck(ack)) = event {
            return match ack.code {
                ConnectReturnCode::Success => Ok(()),
                code => Err(MqttError::Refused(code)),
            };
        }
    }
}

/// Keep the session alive until every client handle is dropped.
async fn drive(mut event_loop: EventLoop, connected: Arc<AtomicBool>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                if !connected.swap(true, Ordering::SeqCst) {
                    tracing::info!("reconnected to hub bridge");
                }
            }
            Ok(_) => {}
            Err(ConnectionError::RequestsDone) => break,
            Err(err) => {
                connected.store(false, Ordering::SeqCst);
                tracing::warn!(error = %err, "hub bridge connection lost");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
    tracing::debug!("hub bridge event loop stopped");
}
