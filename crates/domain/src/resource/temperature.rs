//! Numeric temperature sensor with unit translation and per-unit thresholds.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use super::{Applied, Target};
use crate::descriptor::ResourceDescriptor;
use crate::error::{SmartNodeError, ValidationError};
use crate::thermistor::kelvin_from_adc;
use crate::unit::{KELVIN_OFFSET, TemperatureUnit, round2};

/// A thermistor temperature sensor.
///
/// The reading is kept in Celsius at full precision and rounded once per unit
/// when encoded. Writes do not move the reading; they store a threshold for
/// their unit, and a new reading is only worth notifying once it reaches one
/// of the stored thresholds.
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    descriptor: ResourceDescriptor,
    payload_id: String,
    celsius: f64,
    targets: HashMap<TemperatureUnit, f64>,
}

impl TemperatureSensor {
    #[must_use]
    pub fn new(descriptor: ResourceDescriptor, payload_id: impl Into<String>) -> Self {
        Self {
            descriptor,
            payload_id: payload_id.into(),
            celsius: 0.0,
            targets: HashMap::new(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn payload_id(&self) -> &str {
        &self.payload_id
    }

    /// Current reading in degrees Celsius, unrounded.
    #[must_use]
    pub fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Threshold stored for `unit`, if any.
    #[must_use]
    pub fn target(&self, unit: TemperatureUnit) -> Option<f64> {
        self.targets.get(&unit).copied()
    }

    pub(super) fn encode_in(&self, unit: TemperatureUnit) -> Value {
        json!({
            "rt": self.descriptor.resource_types.first(),
            "id": self.payload_id,
            "temperature": unit.from_celsius(self.celsius),
            "units": unit,
            "range": unit.range_string(),
        })
    }

    pub(super) fn step(&mut self) -> bool {
        self.celsius = round2(self.celsius + 0.1);
        true
    }

    pub(super) fn record_adc(&mut self, raw: u16) -> bool {
        let Some(kelvin) = kelvin_from_adc(raw) else {
            return false;
        };
        let celsius = kelvin - KELVIN_OFFSET;
        let changed = (celsius - self.celsius).abs() > f64::EPSILON;
        self.celsius = celsius;
        changed && self.threshold_reached()
    }

    pub(super) fn seed(&mut self, celsius: f64) -> bool {
        let changed = (celsius - self.celsius).abs() > f64::EPSILON;
        self.celsius = celsius;
        changed
    }

    /// Store a threshold. `0` is a valid temperature; only a missing or
    /// `null` value is rejected.
    pub(super) fn apply(&mut self, payload: &Value) -> Result<Applied, SmartNodeError> {
        let object: &Map<String, Value> = payload
            .as_object()
            .ok_or(ValidationError::MalformedPayload)?;

        let unit = match object.get("units") {
            None | Some(Value::Null) => TemperatureUnit::Celsius,
            Some(Value::String(units)) => units.parse::<TemperatureUnit>()?,
            Some(_) => {
                return Err(ValidationError::WrongType {
                    field: "units",
                    expected: "a string",
                }
                .into());
            }
        };

        let value = match object.get("temperature") {
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingValue {
                    field: "temperature",
                }
                .into());
            }
            Some(value) => value.as_f64().ok_or(ValidationError::WrongType {
                field: "temperature",
                expected: "a number",
            })?,
        };

        if !unit.contains(value) {
            let (min, max) = unit.range();
            return Err(ValidationError::OutOfRange {
                value,
                min,
                max,
                unit,
            }
            .into());
        }

        self.targets.insert(unit, value);
        Ok(Applied {
            changed: false,
            command: None,
            target: Some(Target { unit, value }),
        })
    }

    /// No thresholds, or the reading has reached at least one of them.
    fn threshold_reached(&self) -> bool {
        self.targets.is_empty()
            || self
                .targets
                .iter()
                .any(|(unit, target)| unit.from_celsius(self.celsius) >= *target)
    }
}
