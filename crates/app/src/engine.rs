//! Observable resource engine.
//!
//! The engine owns one [`Resource`] together with its sensor binding,
//! observer registry and notify timer. It runs as an actor: every request
//! and every timer round is processed to completion before the next one
//! starts, so no locking is needed around the state.
//!
//! ## Notify loop
//! - A retrieve that subscribes arms the first round after
//!   [`Timing::initial_delay`] when no round is pending.
//! - A successful write with observers present makes sure a round happens
//!   within [`Timing::initial_delay`].
//! - Each round clears the timer, samples, pushes the payload if it changed
//!   since the last push, and rearms after [`Timing::period`] only while
//!   observers remain.
//! - A push the transport reports as reaching nobody resets the observer
//!   count, which stops the loop until the next subscribe.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use smartnode_domain::error::SmartNodeError;
use smartnode_domain::resource::Resource;
use smartnode_domain::state::ResourceState;
use tokio::sync::mpsc;

use crate::handle::{Command, Observe};
use crate::notify_timer::NotifyTimer;
use crate::observer::ObserverRegistry;
use crate::ports::{HubClient, RegisteredResource};
use crate::sensor::SensorAdapter;

/// Notify loop delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay before the first round after a subscribe or a write.
    pub initial_delay: Duration,
    /// Delay between rounds while observers remain.
    pub period: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            period: Duration::from_millis(2000),
        }
    }
}

/// A hub client together with the device it drives.
#[derive(Debug)]
pub struct HubBinding<H> {
    pub client: H,
    pub device_id: u32,
}

/// What the next round has to push.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Pending {
    #[default]
    Nothing,
    /// Push if the state differs from the last push.
    Changed,
    /// Push regardless, e.g. for a new observer.
    Forced,
}

/// Per-resource context driven by the actor loop.
pub struct ResourceEngine<R, H> {
    resource: Resource,
    sensor: SensorAdapter,
    observers: ObserverRegistry,
    timer: NotifyTimer,
    timing: Timing,
    last_notified: Option<ResourceState>,
    pending: Pending,
    transport: Arc<R>,
    hub: Option<HubBinding<H>>,
}

impl<R, H> ResourceEngine<R, H>
where
    R: RegisteredResource,
    H: HubClient,
{
    #[must_use]
    pub fn new(
        resource: Resource,
        sensor: SensorAdapter,
        transport: Arc<R>,
        hub: Option<HubBinding<H>>,
        timing: Timing,
    ) -> Self {
        Self {
            resource,
            sensor,
            observers: ObserverRegistry::new(),
            timer: NotifyTimer::new(),
            timing,
            last_notified: None,
            pending: Pending::Nothing,
            transport,
            hub,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    #[must_use]
    pub fn observers(&self) -> usize {
        self.observers.count()
    }

    #[must_use]
    pub fn timer(&self) -> &NotifyTimer {
        &self.timer
    }

    /// Snapshot of the last successful push.
    #[must_use]
    pub fn last_notified(&self) -> Option<ResourceState> {
        self.last_notified
    }

    /// Sample the sensor and encode the current payload.
    pub fn retrieve(&mut self) -> Value {
        self.sample();
        self.resource.encode()
    }

    /// Apply the observe intent of a retrieve that has already been answered.
    pub fn observe(&mut self, observe: Observe) {
        let count = match observe {
            Observe::Subscribe => {
                self.mark(Pending::Forced);
                self.observers.subscribe()
            }
            Observe::Unsubscribe => self.observers.unsubscribe(),
        };
        tracing::debug!(
            path = %self.resource.descriptor().path,
            observers = count,
            "observer count changed"
        );
        if count > 0 && self.timer.arm_if_idle(self.timing.initial_delay) {
            tracing::debug!("notify loop armed");
        }
    }

    /// Validate and apply a write, forward it to the hub and encode the
    /// resulting payload.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected payload. Hub failures are
    /// logged and never fail the write.
    pub async fn update(&mut self, payload: &Value) -> Result<Value, SmartNodeError> {
        let applied = self.resource.apply(payload).inspect_err(|err| {
            tracing::debug!(error = %err, "write rejected");
        })?;
        if applied.changed {
            self.mark(Pending::Changed);
        }

        match applied.target {
            Some(target) if self.sensor.is_simulated() => {
                if self.resource.seed(target) {
                    self.mark(Pending::Changed);
                }
            }
            _ => self.sample(),
        }

        if let (Some(command), Some(hub)) = (applied.command, &self.hub)
            && let Err(err) = hub.client.set_device(hub.device_id, command).await
        {
            tracing::warn!(device_id = hub.device_id, error = %err, "hub update failed");
        }

        if self.observers.has_observers() {
            self.timer.arm_within(self.timing.initial_delay);
        }
        Ok(self.resource.encode())
    }

    /// Encode the current state in another unit without sampling.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidUnit`] or
    /// [`SmartNodeError::TranslateUnsupported`].
    pub fn translate(&self, units: Option<&str>) -> Result<Value, SmartNodeError> {
        self.resource.translate(units)
    }

    /// Run one notify round.
    pub async fn tick(&mut self) {
        self.timer.disarm();
        self.sample();

        let state = self.resource.state();
        let publish = match self.pending {
            Pending::Forced => true,
            Pending::Changed => state.differs_from(self.last_notified.as_ref()),
            Pending::Nothing => false,
        };
        if publish {
            match self.transport.notify(self.resource.encode()).await {
                Ok(()) => {
                    tracing::debug!(path = %self.resource.descriptor().path, "observers notified");
                    self.last_notified = Some(state);
                    self.pending = Pending::Nothing;
                }
                Err(SmartNodeError::Delivery(err)) if err.lost_all_observers() => {
                    tracing::info!("no observers left, stopping notify loop");
                    self.observers.reset();
                    self.timer.disarm();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to notify observers");
                }
            }
        } else if self.pending == Pending::Changed {
            self.pending = Pending::Nothing;
        }

        if self.observers.has_observers() {
            self.timer.arm(self.timing.period);
        }
    }

    /// Process commands and timer rounds until shut down.
    ///
    /// Dropping every handle stops the loop as well.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Retrieve { observe, reply }) => {
                        let _ = reply.send(self.retrieve());
                        if let Some(observe) = observe {
                            self.observe(observe);
                        }
                    }
                    Some(Command::Update { payload, reply }) => {
                        let result = self.update(&payload).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Translate { units, reply }) => {
                        let _ = reply.send(self.translate(units.as_deref()));
                    }
                    Some(Command::Shutdown { done }) => {
                        self.timer.disarm();
                        let _ = done.send(());
                        break;
                    }
                    None => break,
                },
                () = self.timer.expired() => self.tick().await,
            }
        }
        tracing::debug!(path = %self.resource.descriptor().path, "engine stopped");
    }

    fn sample(&mut self) {
        if self.sensor.sample(&mut self.resource) {
            self.mark(Pending::Changed);
        }
    }

    fn mark(&mut self, pending: Pending) {
        self.pending = self.pending.max(pending);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use smartnode_domain::command::DeviceCommand;
    use smartnode_domain::descriptor::ResourceDescriptor;
    use smartnode_domain::error::DeliveryError;
    use smartnode_domain::resource::{DimmableLight, MotionSensor, TemperatureSensor};
    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::handle::{Command, ResourceHandle};

    #[derive(Default)]
    struct RecordingTransport {
        notified: Mutex<Vec<Value>>,
        remaining_observers: Mutex<Option<usize>>,
    }

    impl RecordingTransport {
        fn notified(&self) -> Vec<Value> {
            self.notified.lock().unwrap().clone()
        }

        fn fail_with(&self, observers: usize) {
            *self.remaining_observers.lock().unwrap() = Some(observers);
        }
    }

    impl RegisteredResource for RecordingTransport {
        fn bind(&self, _handle: ResourceHandle) {}

        fn notify(
            &self,
            payload: Value,
        ) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            let result = match *self.remaining_observers.lock().unwrap() {
                Some(observers) => Err(DeliveryError { observers }.into()),
                None => {
                    self.notified.lock().unwrap().push(payload);
                    Ok(())
                }
            };
            async { result }
        }

        fn unregister(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct RecordingHub {
        commands: Mutex<Vec<(u32, DeviceCommand)>>,
        offline: bool,
    }

    impl HubClient for RecordingHub {
        fn connect(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            async { Ok(()) }
        }

        fn set_device(
            &self,
            device_id: u32,
            command: DeviceCommand,
        ) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            let result = if self.offline {
                Err(SmartNodeError::Hub("offline".into()))
            } else {
                self.commands.lock().unwrap().push((device_id, command));
                Ok(())
            };
            async { result }
        }
    }

    fn motion() -> Resource {
        Resource::Motion(MotionSensor::new(
            ResourceDescriptor::builder()
                .path("/a/pir")
                .resource_type("oic.r.sensor.motion")
                .interface("oic.if.baseline")
                .build()
                .unwrap(),
            Some("motionSensor".to_string()),
            false,
        ))
    }

    fn temperature() -> Resource {
        Resource::Temperature(TemperatureSensor::new(
            ResourceDescriptor::builder()
                .path("/a/temperature")
                .resource_type("oic.r.temperature")
                .interface("oic.if.baseline")
                .build()
                .unwrap(),
            "temperature",
        ))
    }

    fn light() -> Resource {
        Resource::Light(DimmableLight::new(
            ResourceDescriptor::builder()
                .path("/light/")
                .resource_type("oic.wk.col")
                .resource_type("oic.r.light")
                .interface("oic.if.baseline")
                .build()
                .unwrap(),
        ))
    }

    fn engine(
        resource: Resource,
        sensor: SensorAdapter,
    ) -> (
        ResourceEngine<RecordingTransport, RecordingHub>,
        Arc<RecordingTransport>,
    ) {
        let transport = Arc::new(RecordingTransport::default());
        let engine = ResourceEngine::new(
            resource,
            sensor,
            Arc::clone(&transport),
            None,
            Timing::default(),
        );
        (engine, transport)
    }

    fn spawn(
        engine: ResourceEngine<RecordingTransport, RecordingHub>,
    ) -> (ResourceHandle, tokio::task::JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(8);
        let handle = ResourceHandle::new(
            engine.resource().id(),
            engine.resource().kind(),
            sender,
        );
        (handle, tokio::spawn(engine.run(receiver)))
    }

    #[tokio::test(start_paused = true)]
    async fn should_arm_first_round_after_initial_delay_on_subscribe() {
        let (mut engine, _) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        assert_eq!(engine.observers(), 1);
        assert_eq!(
            engine.timer().deadline(),
            Some(Instant::now() + Duration::from_millis(200))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_rearm_pending_round_on_second_subscribe() {
        let (mut engine, _) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        let first = engine.timer().deadline();
        sleep(Duration::from_millis(100)).await;
        engine.observe(Observe::Subscribe);
        assert_eq!(engine.timer().deadline(), first);
        assert_eq!(engine.observers(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_count_at_zero_on_stray_unsubscribe() {
        let (mut engine, _) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Unsubscribe);
        assert_eq!(engine.observers(), 0);
        assert!(!engine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_notify_flipped_value_once_and_record_it() {
        let (mut engine, transport) = engine(motion(), SensorAdapter::Simulated);
        let before = engine.retrieve();
        engine.observe(Observe::Subscribe);

        engine.tick().await;

        let notified = transport.notified();
        assert_eq!(notified.len(), 1);
        assert_ne!(notified[0]["value"], before["value"]);
        assert_eq!(
            engine.last_notified(),
            Some(ResourceState::Binary(notified[0]["value"] == true))
        );
        assert_eq!(
            engine.timer().deadline(),
            Some(Instant::now() + Duration::from_millis(2000))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_stay_silent_when_nothing_changed() {
        let (mut engine, transport) = engine(light(), SensorAdapter::Passive);
        engine.observe(Observe::Subscribe);
        engine.tick().await;
        engine.tick().await;
        assert_eq!(transport.notified().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_rearming_after_last_unsubscribe() {
        let (mut engine, _) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        engine.observe(Observe::Unsubscribe);
        assert!(engine.timer().is_armed());

        engine.tick().await;
        assert!(!engine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_reset_observers_when_delivery_reaches_nobody() {
        let (mut engine, transport) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        engine.observe(Observe::Subscribe);
        transport.fail_with(0);

        engine.tick().await;

        assert_eq!(engine.observers(), 0);
        assert!(!engine.timer().is_armed());
        assert_eq!(engine.last_notified(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_looping_when_some_observers_remain() {
        let (mut engine, transport) = engine(motion(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        engine.observe(Observe::Subscribe);
        transport.fail_with(1);

        engine.tick().await;

        assert_eq!(engine.observers(), 2);
        assert!(engine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_invalid_write_without_mutation() {
        let (mut engine, _) = engine(temperature(), SensorAdapter::Simulated);
        let before = engine.resource().state();
        let err = engine
            .update(&json!({"temperature": 500, "units": "C"}))
            .await
            .unwrap_err();
        assert!(matches!(err, SmartNodeError::InvalidInput(_)));
        assert_eq!(engine.resource().state(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_written_temperature_in_fahrenheit() {
        let (mut engine, _) = engine(temperature(), SensorAdapter::Simulated);
        let payload = engine
            .update(&json!({"temperature": 30, "units": "C"}))
            .await
            .unwrap();
        assert_eq!(payload["temperature"], json!(30.0));

        let translated = engine.translate(Some("F")).unwrap();
        assert_eq!(translated["temperature"], json!(86.0));
        assert_eq!(translated["units"], "F");
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_unknown_unit_on_update_and_translate() {
        let (mut engine, _) = engine(temperature(), SensorAdapter::Simulated);
        let before = engine.resource().state();
        let err = engine
            .update(&json!({"temperature": 20, "units": "X"}))
            .await
            .unwrap_err();
        assert!(matches!(err, SmartNodeError::InvalidUnit(_)));
        assert!(matches!(
            engine.translate(Some("X")),
            Err(SmartNodeError::InvalidUnit(_))
        ));
        assert_eq!(engine.resource().state(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn should_pull_round_forward_after_write_with_observers() {
        let (mut engine, _) = engine(light(), SensorAdapter::Passive);
        engine.observe(Observe::Subscribe);
        engine.tick().await;
        assert_eq!(
            engine.timer().deadline(),
            Some(Instant::now() + Duration::from_millis(2000))
        );

        engine.update(&json!({"value": true})).await.unwrap();
        assert_eq!(
            engine.timer().deadline(),
            Some(Instant::now() + Duration::from_millis(200))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_arm_after_write_without_observers() {
        let (mut engine, _) = engine(light(), SensorAdapter::Passive);
        engine.update(&json!({"value": true})).await.unwrap();
        assert!(!engine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_forward_light_write_to_hub() {
        let transport = Arc::new(RecordingTransport::default());
        let mut engine = ResourceEngine::new(
            light(),
            SensorAdapter::Passive,
            transport,
            Some(HubBinding {
                client: RecordingHub::default(),
                device_id: 65542,
            }),
            Timing::default(),
        );
        engine
            .update(&json!({"value": true, "dimming": 50, "ramptime": 5}))
            .await
            .unwrap();

        let hub = engine.hub.as_ref().unwrap();
        let commands = hub.client.commands.lock().unwrap().clone();
        assert_eq!(
            commands,
            vec![(
                65542,
                DeviceCommand {
                    on: Some(true),
                    dimming: Some(50),
                    transition_time: Some(5),
                }
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_accept_write_when_hub_is_offline() {
        let transport = Arc::new(RecordingTransport::default());
        let mut engine = ResourceEngine::new(
            light(),
            SensorAdapter::Passive,
            transport,
            Some(HubBinding {
                client: RecordingHub {
                    offline: true,
                    ..RecordingHub::default()
                },
                device_id: 65542,
            }),
            Timing::default(),
        );
        let payload = engine.update(&json!({"value": true})).await.unwrap();
        assert_eq!(payload[0]["rep"]["value"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn should_return_identical_payloads_without_drift() {
        let (mut engine, _) = engine(light(), SensorAdapter::Passive);
        assert_eq!(engine.retrieve(), engine.retrieve());
    }

    #[tokio::test(start_paused = true)]
    async fn should_increase_simulated_temperature_per_round() {
        let (mut engine, transport) = engine(temperature(), SensorAdapter::Simulated);
        engine.observe(Observe::Subscribe);
        engine.tick().await;
        engine.tick().await;
        engine.tick().await;

        let readings: Vec<f64> = transport
            .notified()
            .iter()
            .map(|payload| payload["temperature"].as_f64().unwrap())
            .collect();
        assert_eq!(readings.len(), 3);
        assert!(readings.windows(2).all(|w| (w[1] - w[0] - 0.1).abs() < 1e-9));
    }

    #[tokio::test(start_paused = true)]
    async fn should_drive_notify_loop_from_actor() {
        let (engine, transport) = engine(motion(), SensorAdapter::Simulated);
        let (handle, task) = spawn(engine);

        handle.retrieve(Some(Observe::Subscribe)).await.unwrap();
        sleep(Duration::from_millis(199)).await;
        assert!(transport.notified().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(transport.notified().len(), 1);

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(transport.notified().len(), 2);

        // the pending round still runs once, then the loop stops
        handle.retrieve(Some(Observe::Unsubscribe)).await.unwrap();
        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(transport.notified().len(), 2);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_on_shutdown_and_refuse_further_requests() {
        let (engine, transport) = engine(motion(), SensorAdapter::Simulated);
        let (handle, task) = spawn(engine);

        handle.retrieve(Some(Observe::Subscribe)).await.unwrap();
        handle.shutdown().await;
        task.await.unwrap();

        sleep(Duration::from_secs(5)).await;
        assert!(transport.notified().is_empty());
        assert!(matches!(
            handle.retrieve(None).await,
            Err(SmartNodeError::NotRunning)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_when_every_handle_is_dropped() {
        let (engine, _) = engine(motion(), SensorAdapter::Simulated);
        let (sender, receiver) = mpsc::channel::<Command>(1);
        let task = tokio::spawn(engine.run(receiver));
        drop(sender);
        task.await.unwrap();
    }
}
