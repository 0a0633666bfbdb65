//! HTTP implementation of the transport port.

use std::sync::Arc;

use axum::Router;
use serde_json::Value;
use smartnode_app::handle::ResourceHandle;
use smartnode_app::ports::{RegisteredResource, Transport};
use smartnode_domain::descriptor::ResourceDescriptor;
use smartnode_domain::error::{DeliveryError, SmartNodeError};
use smartnode_domain::platform::{DeviceInfo, PlatformInfo};

use crate::router;
use crate::state::{AppState, Registry, Slot};

/// Serves registered resources over HTTP.
///
/// Cloning is cheap; every clone shares the same registry.
#[derive(Clone)]
pub struct HttpTransport {
    state: AppState,
}

impl HttpTransport {
    #[must_use]
    pub fn new(device: DeviceInfo, platform: PlatformInfo) -> Self {
        Self {
            state: AppState::new(Arc::new(Registry::default()), device, platform),
        }
    }

    /// Build the axum router serving every resource registered so far and
    /// in the future.
    #[must_use]
    pub fn router(&self) -> Router {
        router::build(self.state.clone())
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.state.registry
    }
}

impl Transport for HttpTransport {
    type Resource = HttpResource;

    fn register(
        &self,
        descriptor: ResourceDescriptor,
        initial: Value,
    ) -> impl Future<Output = Result<HttpResource, SmartNodeError>> + Send {
        let result = descriptor.validate().and_then(|()| {
            let path = descriptor.path.clone();
            let slot = Arc::new(Slot::new(descriptor));
            if !self.state.registry.insert(Arc::clone(&slot)) {
                return Err(SmartNodeError::Transport(
                    format!("a resource is already registered at {path}").into(),
                ));
            }
            tracing::debug!(path = %path, initial = %initial, "resource added to router");
            Ok(HttpResource {
                slot,
                registry: Arc::clone(&self.state.registry),
            })
        });
        async { result }
    }
}

/// A resource mounted on the HTTP router.
#[derive(Debug)]
pub struct HttpResource {
    slot: Arc<Slot>,
    registry: Arc<Registry>,
}

impl RegisteredResource for HttpResource {
    fn bind(&self, handle: ResourceHandle) {
        if !self.slot.bind(handle) {
            tracing::warn!(path = %self.slot.descriptor.path, "resource already bound");
        }
    }

    fn notify(&self, payload: Value) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
        let delivered = self.slot.publish(payload);
        let result = if delivered == 0 {
            Err(DeliveryError { observers: 0 }.into())
        } else {
            tracing::trace!(path = %self.slot.descriptor.path, delivered, "notification pushed");
            Ok(())
        };
        async { result }
    }

    fn unregister(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send {
        let result = if self.registry.remove(&self.slot) {
            Ok(())
        } else {
            Err(SmartNodeError::Transport(
                format!("{} is not registered", self.slot.descriptor.path).into(),
            ))
        };
        async { result }
    }
}
