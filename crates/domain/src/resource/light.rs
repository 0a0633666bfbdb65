//! Composite dimmable light (on/off, level, ramp time).

use serde_json::{Map, Value, json};

use super::{Applied, bool_field, u32_field};
use crate::command::DeviceCommand;
use crate::descriptor::ResourceDescriptor;
use crate::error::{SmartNodeError, ValidationError};
use crate::state::LightState;

/// A dimmable light exposed as a batch collection of three sub-resources.
#[derive(Debug, Clone)]
pub struct DimmableLight {
    descriptor: ResourceDescriptor,
    state: LightState,
}

/// Fields carried by one write. Absent fields are left unchanged.
#[derive(Debug, Default, PartialEq, Eq)]
struct LightUpdate {
    on: Option<bool>,
    dimming: Option<u32>,
    ramp_time: Option<u32>,
}

impl DimmableLight {
    #[must_use]
    pub fn new(descriptor: ResourceDescriptor) -> Self {
        Self {
            descriptor,
            state: LightState::default(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn light_state(&self) -> LightState {
        self.state
    }

    pub(super) fn encode(&self) -> Value {
        json!([
            { "href": "onoff", "rep": { "value": self.state.on } },
            { "href": "level", "rep": { "dimming": self.state.dimming } },
            { "href": "ramptime", "rep": { "value": self.state.ramp_time } },
        ])
    }

    pub(super) fn apply(&mut self, payload: &Value) -> Result<Applied, SmartNodeError> {
        let update = match payload {
            Value::Array(entries) => decode_batch(entries)?,
            Value::Object(object) => decode_flat(object)?,
            _ => return Err(ValidationError::MalformedPayload.into()),
        };

        let before = self.state;
        if let Some(on) = update.on {
            self.state.on = on;
        }
        if let Some(dimming) = update.dimming {
            self.state.dimming = dimming;
        }
        if let Some(ramp_time) = update.ramp_time {
            self.state.ramp_time = ramp_time;
        }

        // the hub only takes a level together with an explicit switch-on
        let command = DeviceCommand {
            on: update.on,
            dimming: update.dimming.filter(|_| update.on == Some(true)),
            transition_time: update.ramp_time,
        };
        Ok(Applied {
            changed: before != self.state,
            command: (!command.is_empty()).then_some(command),
            target: None,
        })
    }
}

fn decode_flat(object: &Map<String, Value>) -> Result<LightUpdate, ValidationError> {
    Ok(LightUpdate {
        on: bool_field(object, "value")?,
        dimming: u32_field(object, "dimming")?,
        ramp_time: u32_field(object, "ramptime")?,
    })
}

fn decode_batch(entries: &[Value]) -> Result<LightUpdate, ValidationError> {
    let mut update = LightUpdate::default();
    for entry in entries {
        let href = entry
            .get("href")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MalformedPayload)?;
        let rep = entry
            .get("rep")
            .and_then(Value::as_object)
            .ok_or(ValidationError::MalformedPayload)?;
        match href {
            "onoff" => update.on = bool_field(rep, "value")?.or(update.on),
            "level" => update.dimming = u32_field(rep, "dimming")?.or(update.dimming),
            "ramptime" => {
                let ramp_time = match u32_field(rep, "ramptime")? {
                    Some(ramp_time) => Some(ramp_time),
                    None => u32_field(rep, "value")?,
                };
                update.ramp_time = ramp_time.or(update.ramp_time);
            }
            _ => {}
        }
    }
    Ok(update)
}
