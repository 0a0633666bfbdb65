//! Hub port: forwards actuator commands to a lighting hub.

use std::future::Future;

use smartnode_domain::command::DeviceCommand;
use smartnode_domain::error::SmartNodeError;

/// A lighting hub that owns the physical device behind a resource.
pub trait HubClient: Send + Sync + 'static {
    /// Open the session to the hub.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::Hub`] when the hub cannot be reached.
    fn connect(&self) -> impl Future<Output = Result<(), SmartNodeError>> + Send;

    /// Apply `command` to the hub device `device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::Hub`] when the command could not be sent.
    fn set_device(
        &self,
        device_id: u32,
        command: DeviceCommand,
    ) -> impl Future<Output = Result<(), SmartNodeError>> + Send;
}
