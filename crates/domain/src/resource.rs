//! Resource: one addressable unit of device state.
//!
//! A process serves exactly one resource. The [`Resource`] enum selects the
//! kind-specific behaviour (payload codec, validation, simulation and change
//! detection) so that the engine driving it stays kind-agnostic.

mod light;
mod motion;
mod temperature;

pub use light::DimmableLight;
pub use motion::MotionSensor;
pub use temperature::TemperatureSensor;

use serde_json::Value;

use crate::command::DeviceCommand;
use crate::descriptor::ResourceDescriptor;
use crate::error::{SmartNodeError, ValidationError};
use crate::state::ResourceState;
use crate::unit::TemperatureUnit;

/// Shape of a resource's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    BinarySensor,
    NumericSensor,
    CompositeActuator,
}

/// A raw value read from hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// GPIO level.
    Digital(bool),
    /// 10-bit ADC sample.
    Analog(u16),
}

/// A per-unit threshold accepted by a numeric write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub unit: TemperatureUnit,
    pub value: f64,
}

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Applied {
    /// The resource state differs from before the write.
    pub changed: bool,
    /// Command to forward to a hub, if the write touched hub-backed fields.
    pub command: Option<DeviceCommand>,
    /// Threshold recorded by a numeric write.
    pub target: Option<Target>,
}

/// The resource served by a process.
#[derive(Debug, Clone)]
pub enum Resource {
    Motion(MotionSensor),
    Temperature(TemperatureSensor),
    Light(DimmableLight),
}

impl Resource {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Motion(_) => ResourceKind::BinarySensor,
            Self::Temperature(_) => ResourceKind::NumericSensor,
            Self::Light(_) => ResourceKind::CompositeActuator,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        match self {
            Self::Motion(r) => r.descriptor(),
            Self::Temperature(r) => r.descriptor(),
            Self::Light(r) => r.descriptor(),
        }
    }

    /// Identifier echoed in error payloads: the payload `id` when the
    /// resource has one, its path otherwise.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Motion(r) => r.payload_id().unwrap_or(r.descriptor().path.as_str()),
            Self::Temperature(r) => r.payload_id(),
            Self::Light(r) => &r.descriptor().path,
        }
    }

    #[must_use]
    pub fn state(&self) -> ResourceState {
        match self {
            Self::Motion(r) => ResourceState::Binary(r.value()),
            Self::Temperature(r) => ResourceState::Numeric(r.celsius()),
            Self::Light(r) => ResourceState::Composite(r.light_state()),
        }
    }

    /// Encode the current state as its wire payload.
    #[must_use]
    pub fn encode(&self) -> Value {
        match self {
            Self::Motion(r) => r.encode(),
            Self::Temperature(r) => r.encode_in(TemperatureUnit::Celsius),
            Self::Light(r) => r.encode(),
        }
    }

    /// Encode the current state in the unit named by `units` (Celsius when
    /// absent). Does not touch stored thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidUnit`] for a unit outside `{C, F, K}`
    /// and [`SmartNodeError::TranslateUnsupported`] for resources without
    /// units.
    pub fn translate(&self, units: Option<&str>) -> Result<Value, SmartNodeError> {
        match self {
            Self::Temperature(r) => {
                let unit =
                    units.map_or(Ok(TemperatureUnit::Celsius), str::parse::<TemperatureUnit>)?;
                Ok(r.encode_in(unit))
            }
            Self::Motion(_) | Self::Light(_) => Err(SmartNodeError::TranslateUnsupported),
        }
    }

    /// Advance the simulated value by one step.
    ///
    /// Returns whether the step is worth notifying.
    pub fn simulate(&mut self) -> bool {
        match self {
            Self::Motion(r) => r.toggle(),
            Self::Temperature(r) => r.step(),
            Self::Light(_) => false,
        }
    }

    /// Store a hardware sample.
    ///
    /// Returns whether the new value is worth notifying. Samples of the wrong
    /// shape for this resource are ignored.
    pub fn record(&mut self, sample: Sample) -> bool {
        match (self, sample) {
            (Self::Motion(r), Sample::Digital(level)) => r.set(level),
            (Self::Temperature(r), Sample::Analog(raw)) => r.record_adc(raw),
            _ => false,
        }
    }

    /// Validate and apply a write payload.
    ///
    /// Nothing is mutated when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::ReadOnly`] for sensors that do not accept
    /// writes, [`SmartNodeError::InvalidUnit`] for an unknown unit and
    /// [`SmartNodeError::InvalidInput`] for any other rejected payload.
    pub fn apply(&mut self, payload: &Value) -> Result<Applied, SmartNodeError> {
        match self {
            Self::Motion(r) => r.apply(payload),
            Self::Temperature(r) => r.apply(payload),
            Self::Light(r) => r.apply(payload),
        }
    }

    /// Drive a simulated reading to an accepted threshold.
    ///
    /// Returns whether the reading changed.
    pub fn seed(&mut self, target: Target) -> bool {
        match self {
            Self::Temperature(r) => r.seed(target.unit.to_celsius(target.value)),
            Self::Motion(_) | Self::Light(_) => false,
        }
    }
}

/// Read an optional boolean field.
fn bool_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or(ValidationError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

/// Read an optional non-negative integer field.
fn u32_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Option<u32>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or(ValidationError::WrongType {
                field,
                expected: "a non-negative integer",
            }),
    }
}
