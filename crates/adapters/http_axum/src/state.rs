//! Shared state for axum handlers: the registered resources and the
//! device/platform metadata served by discovery.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde_json::Value;
use smartnode_app::handle::ResourceHandle;
use smartnode_domain::descriptor::ResourceDescriptor;
use smartnode_domain::platform::{DeviceInfo, PlatformInfo};
use tokio::sync::broadcast;

/// Buffered notifications per observer before a slow stream starts lagging.
const OBSERVER_BUFFER: usize = 16;

/// One registered resource as the HTTP layer sees it.
#[derive(Debug)]
pub struct Slot {
    pub descriptor: ResourceDescriptor,
    handle: OnceLock<ResourceHandle>,
    updates: broadcast::Sender<Value>,
}

impl Slot {
    pub(crate) fn new(descriptor: ResourceDescriptor) -> Self {
        let (updates, _) = broadcast::channel(OBSERVER_BUFFER);
        Self {
            descriptor,
            handle: OnceLock::new(),
            updates,
        }
    }

    /// The engine handle, once the resource has been bound.
    #[must_use]
    pub fn handle(&self) -> Option<&ResourceHandle> {
        self.handle.get()
    }

    /// Returns `false` when a handle was already bound.
    pub(crate) fn bind(&self, handle: ResourceHandle) -> bool {
        self.handle.set(handle).is_ok()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.updates.subscribe()
    }

    /// Push `payload` to every open observation stream, returning how many
    /// received it.
    pub(crate) fn publish(&self, payload: Value) -> usize {
        self.updates.send(payload).unwrap_or(0)
    }

    #[must_use]
    pub fn observer_streams(&self) -> usize {
        self.updates.receiver_count()
    }
}

/// Resources currently served, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    slots: RwLock<Vec<Arc<Slot>>>,
}

impl Registry {
    /// Look up the resource addressed by `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<Arc<Slot>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|slot| slot.descriptor.matches(path))
            .cloned()
    }

    /// Add `slot` unless its path is already taken.
    pub(crate) fn insert(&self, slot: Arc<Slot>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots
            .iter()
            .any(|existing| existing.descriptor.matches(&slot.descriptor.path))
        {
            return false;
        }
        slots.push(slot);
        true
    }

    /// Remove `slot`, returning whether it was registered.
    pub(crate) fn remove(&self, slot: &Arc<Slot>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|existing| !Arc::ptr_eq(existing, slot));
        slots.len() != before
    }

    /// Descriptors of every discoverable resource.
    #[must_use]
    pub fn discoverable(&self) -> Vec<ResourceDescriptor> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|slot| slot.descriptor.discoverable)
            .map(|slot| slot.descriptor.clone())
            .collect()
    }
}

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so only the `Arc` wrappers are cloned.
pub struct AppState {
    pub registry: Arc<Registry>,
    pub device: Arc<DeviceInfo>,
    pub platform: Arc<PlatformInfo>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            device: Arc::clone(&self.device),
            platform: Arc::clone(&self.platform),
        }
    }
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<Registry>, device: DeviceInfo, platform: PlatformInfo) -> Self {
        Self {
            registry,
            device: Arc::new(device),
            platform: Arc::new(platform),
        }
    }
}
