//! Binary motion sensor.

use serde_json::{Map, Value, json};

use super::{Applied, bool_field};
use crate::command::DeviceCommand;
use crate::descriptor::ResourceDescriptor;
use crate::error::{SmartNodeError, ValidationError};

/// A motion sensor reporting a single boolean.
///
/// PIR sensors are read-only and announce `{rt, id, value}`. Hub-backed
/// sensors have no payload id, announce `{value}` and accept writes.
#[derive(Debug, Clone)]
pub struct MotionSensor {
    descriptor: ResourceDescriptor,
    payload_id: Option<String>,
    writable: bool,
    value: bool,
}

impl MotionSensor {
    #[must_use]
    pub fn new(
        descriptor: ResourceDescriptor,
        payload_id: Option<String>,
        writable: bool,
    ) -> Self {
        Self {
            descriptor,
            payload_id,
            writable,
            value: false,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn payload_id(&self) -> Option<&str> {
        self.payload_id.as_deref()
    }

    #[must_use]
    pub fn value(&self) -> bool {
        self.value
    }

    pub(super) fn encode(&self) -> Value {
        match &self.payload_id {
            Some(id) => json!({
                "rt": self.descriptor.resource_types.first(),
                "id": id,
                "value": self.value,
            }),
            None => json!({ "value": self.value }),
        }
    }

    pub(super) fn toggle(&mut self) -> bool {
        self.value = !self.value;
        true
    }

    pub(super) fn set(&mut self, value: bool) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    pub(super) fn apply(&mut self, payload: &Value) -> Result<Applied, SmartNodeError> {
        if !self.writable {
            return Err(SmartNodeError::ReadOnly);
        }
        let object: &Map<String, Value> = payload
            .as_object()
            .ok_or(ValidationError::MalformedPayload)?;
        let Some(value) = bool_field(object, "value")? else {
            return Ok(Applied::default());
        };
        Ok(Applied {
            changed: self.set(value),
            command: Some(DeviceCommand {
                on: Some(value),
                ..DeviceCommand::default()
            }),
            target: None,
        })
    }
}
