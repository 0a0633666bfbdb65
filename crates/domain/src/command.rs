//! Commands forwarded to a lighting hub after a successful write.

use serde::{Deserialize, Serialize};

/// Partial device update sent to a hub.
///
/// Every field is optional; absent fields leave the device untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub on: Option<bool>,
    pub dimming: Option<u32>,
    pub transition_time: Option<u32>,
}

impl DeviceCommand {
    /// Whether the command carries nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.dimming.is_none() && self.transition_time.is_none()
    }
}
