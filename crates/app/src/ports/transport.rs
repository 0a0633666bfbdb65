//! Transport port: how a resource is exposed to clients.
//!
//! A transport registers one resource at a path, dispatches client requests
//! to the bound [`ResourceHandle`], and pushes notifications to whoever is
//! currently observing.

use std::future::Future;

use serde_json::Value;
use smartnode_domain::descriptor::ResourceDescriptor;
use smartnode_domain::error::SmartNodeError;

use crate::handle::ResourceHandle;

/// Registers resources with a client-facing transport.
pub trait Transport {
    /// The transport's view of a registered resource.
    type Resource: RegisteredResource;

    /// Register a resource and publish its initial payload.
    ///
    /// Requests arriving before [`RegisteredResource::bind`] is called are
    /// answered with [`SmartNodeError::NotRunning`].
    fn register(
        &self,
        descriptor: ResourceDescriptor,
        initial: Value,
    ) -> impl Future<Output = Result<Self::Resource, SmartNodeError>> + Send;
}

/// A resource the transport has accepted.
pub trait RegisteredResource: Send + Sync + 'static {
    /// Route retrieve, update and translate requests to `handle`.
    fn bind(&self, handle: ResourceHandle);

    /// Push `payload` to every current observer.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::Delivery`] with the number of observers
    /// still reachable when the push did not reach everyone.
    fn notify(&self, payload: Value) -> impl Future<Output = Result<(), SmartNodeError>> + Send;

    /// Withdraw the resource from the transport.
    fn unregister(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send;
}
