//! Resource lifecycle: registration on start, teardown on shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use smartnode_domain::resource::Resource;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until, timeout_at};

use crate::engine::{HubBinding, ResourceEngine, Timing};
use crate::handle::ResourceHandle;
use crate::ports::{HubClient, RegisteredResource, Transport};
use crate::sensor::SensorAdapter;

/// Delay between the start of teardown and process exit.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(1000);

const COMMAND_BUFFER: usize = 32;

/// Everything a node needs to bring its resource up.
pub struct NodeConfig<H> {
    pub resource: Resource,
    pub sensor: SensorAdapter,
    pub hub: Option<HubBinding<H>>,
    pub timing: Timing,
    pub shutdown_grace: Duration,
}

struct Running<R> {
    registered: Arc<R>,
    handle: ResourceHandle,
    task: JoinHandle<()>,
}

/// One served resource, from registration to teardown.
///
/// A node whose registration failed stays inert: it serves nothing and its
/// shutdown only waits for the grace delay.
pub struct Node<R> {
    running: Option<Running<R>>,
    teardown_started: AtomicBool,
    shutdown_grace: Duration,
}

impl<R: RegisteredResource> Node<R> {
    /// Compute the initial payload, register the resource and start its
    /// engine.
    pub async fn start<T, H>(transport: &T, config: NodeConfig<H>) -> Self
    where
        T: Transport<Resource = R>,
        H: HubClient,
    {
        let NodeConfig {
            mut resource,
            mut sensor,
            hub,
            timing,
            shutdown_grace,
        } = config;

        sensor.sample(&mut resource);
        let descriptor = resource.descriptor().clone();
        let path = descriptor.path.clone();

        let registered = match transport.register(descriptor, resource.encode()).await {
            Ok(registered) => Arc::new(registered),
            Err(err) => {
                tracing::error!(path = %path, error = %err, "resource registration failed");
                return Self::inert(shutdown_grace);
            }
        };
        tracing::info!(
            path = %path,
            kind = ?resource.kind(),
            source = %sensor,
            "resource registered"
        );

        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let handle = ResourceHandle::new(resource.id(), resource.kind(), sender);
        let engine =
            ResourceEngine::new(resource, sensor, Arc::clone(&registered), hub, timing);
        let task = tokio::spawn(engine.run(receiver));
        registered.bind(handle.clone());

        Self {
            running: Some(Running {
                registered,
                handle,
                task,
            }),
            teardown_started: AtomicBool::new(false),
            shutdown_grace,
        }
    }

    fn inert(shutdown_grace: Duration) -> Self {
        Self {
            running: None,
            teardown_started: AtomicBool::new(false),
            shutdown_grace,
        }
    }

    /// Whether the resource was registered and is being served.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    #[must_use]
    pub fn handle(&self) -> Option<&ResourceHandle> {
        self.running.as_ref().map(|running| &running.handle)
    }

    /// Stop the engine, unregister the resource and wait out the grace
    /// delay.
    ///
    /// Only the first call does anything; later calls return `false`
    /// immediately. The grace delay is honoured whatever the unregister
    /// outcome, and bounds how long teardown may take.
    pub async fn shutdown(&self) -> bool {
        if self.teardown_started.swap(true, Ordering::SeqCst) {
            return false;
        }
        let deadline = Instant::now() + self.shutdown_grace;

        if let Some(running) = &self.running {
            let path = running.handle.id();
            tracing::info!(resource = path, "tearing down resource");
            let teardown = async {
                running.handle.shutdown().await;
                running.registered.unregister().await
            };
            match timeout_at(deadline, teardown).await {
                Ok(Ok(())) => tracing::info!(resource = path, "resource unregistered"),
                Ok(Err(err)) => {
                    tracing::warn!(resource = path, error = %err, "unregister failed");
                }
                Err(_) => tracing::warn!(resource = path, "teardown exceeded the grace delay"),
            }
            running.task.abort();
        }

        sleep_until(deadline).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use serde_json::Value;
    use smartnode_domain::command::DeviceCommand;
    use smartnode_domain::descriptor::ResourceDescriptor;
    use smartnode_domain::error::SmartNodeError;
    use smartnode_domain::resource::{MotionSensor, TemperatureSensor};

    use super::*;
    use crate::handle::Observe;

    #[derive(Default)]
    struct StubResource {
        bound: Mutex<Option<ResourceHandle>>,
        notified: Mutex<Vec<Value>>,
        unregistered: AtomicUsize,
        fail_unregister: bool,
    }

    impl RegisteredResource for StubResource {
        fn bind(&self, handle: ResourceHandle) {
            *self.bound.lock().unwrap() = Some(handle);
        }

        fn notify(
            &self,
            payload: Value,
        ) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            self.notified.lock().unwrap().push(payload);
            async { Ok(()) }
        }

        fn unregister(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail_unregister;
            async move {
                if fail {
                    Err(SmartNodeError::Transport("gone".into()))
                } else {
                    Ok(())
                }
            }
        }
    }

    #[derive(Default)]
    struct StubTransport {
        refuse: bool,
        fail_unregister: bool,
        registered: Mutex<Vec<(ResourceDescriptor, Value)>>,
    }

    impl Transport for StubTransport {
        type Resource = StubResource;

        fn register(
            &self,
            descriptor: ResourceDescriptor,
            initial: Value,
        ) -> impl Future<Output = Result<StubResource, SmartNodeError>> + Send {
            let result = if self.refuse {
                Err(SmartNodeError::Transport("refused".into()))
            } else {
                self.registered.lock().unwrap().push((descriptor, initial));
                Ok(StubResource {
                    fail_unregister: self.fail_unregister,
                    ..StubResource::default()
                })
            };
            async { result }
        }
    }

    struct NoHub;

    impl HubClient for NoHub {
        fn connect(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            async { Ok(()) }
        }

        fn set_device(
            &self,
            _device_id: u32,
            _command: DeviceCommand,
        ) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
            async { Ok(()) }
        }
    }

    fn config(resource: Resource) -> NodeConfig<NoHub> {
        NodeConfig {
            resource,
            sensor: SensorAdapter::Simulated,
            hub: None,
            timing: Timing::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
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

    #[tokio::test(start_paused = true)]
    async fn should_register_with_sampled_initial_payload() {
        let transport = StubTransport::default();
        let node = Node::start(&transport, config(temperature())).await;

        assert!(node.is_running());
        let registered = transport.registered.lock().unwrap();
        let (descriptor, initial) = &registered[0];
        assert_eq!(descriptor.path, "/a/temperature");
        assert_eq!(initial["temperature"], serde_json::json!(0.1));
    }

    #[tokio::test(start_paused = true)]
    async fn should_bind_handle_after_registration() {
        let transport = StubTransport::default();
        let node = Node::start(&transport, config(motion())).await;

        let handle = node.handle().unwrap();
        assert_eq!(handle.id(), "motionSensor");
        let payload = handle.retrieve(None).await.unwrap();
        assert_eq!(payload["id"], "motionSensor");
    }

    #[tokio::test(start_paused = true)]
    async fn should_stay_inert_when_registration_fails() {
        let transport = StubTransport {
            refuse: true,
            ..StubTransport::default()
        };
        let node = Node::start(&transport, config(motion())).await;
        assert!(!node.is_running());
        assert!(node.handle().is_none());

        let start = Instant::now();
        assert!(node.shutdown().await);
        assert_eq!(start.elapsed(), DEFAULT_SHUTDOWN_GRACE);
    }

    #[tokio::test(start_paused = true)]
    async fn should_unregister_once_and_wait_for_grace_delay() {
        let transport = StubTransport::default();
        let node = Node::start(&transport, config(motion())).await;

        let start = Instant::now();
        assert!(node.shutdown().await);
        assert_eq!(start.elapsed(), DEFAULT_SHUTDOWN_GRACE);
        assert!(!node.shutdown().await);

        let running = node.running.as_ref().unwrap();
        assert_eq!(running.registered.unregistered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_for_grace_delay_even_when_unregister_fails() {
        let transport = StubTransport {
            fail_unregister: true,
            ..StubTransport::default()
        };
        let node = Node::start(&transport, config(motion())).await;

        let start = Instant::now();
        assert!(node.shutdown().await);
        assert_eq!(start.elapsed(), DEFAULT_SHUTDOWN_GRACE);
    }

    #[tokio::test(start_paused = true)]
    async fn should_cancel_pending_notify_round_on_shutdown() {
        let transport = StubTransport::default();
        let node = Node::start(&transport, config(motion())).await;
        let handle = node.handle().unwrap().clone();
        handle.retrieve(Some(Observe::Subscribe)).await.unwrap();

        node.shutdown().await;

        let running = node.running.as_ref().unwrap();
        assert!(running.registered.notified.lock().unwrap().is_empty());
        assert!(matches!(
            handle.retrieve(None).await,
            Err(SmartNodeError::NotRunning)
        ));
    }
}
