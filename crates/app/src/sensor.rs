//! Sensor binding: where a resource's value comes from.

use std::fmt;

use smartnode_domain::error::SmartNodeError;
use smartnode_domain::resource::{Resource, Sample};

use crate::ports::{AnalogInput, DigitalInput};

/// Value source chosen once at startup and never changed afterwards.
pub enum SensorAdapter {
    /// GPIO pin read on every sample.
    Digital(Box<dyn DigitalInput>),
    /// ADC channel read on every sample.
    Analog(Box<dyn AnalogInput>),
    /// Values synthesized from the previous state.
    Simulated,
    /// State changes only through writes.
    Passive,
}

impl SensorAdapter {
    /// Try to bind hardware, falling back to simulation on any failure.
    pub fn bind_or_simulate<F>(path: &str, bind: F) -> Self
    where
        F: FnOnce() -> Result<Self, SmartNodeError>,
    {
        match bind() {
            Ok(adapter) => {
                tracing::info!(path, source = %adapter, "sensor bound");
                adapter
            }
            Err(err) => {
                tracing::warn!(
                    path,
                    error = %err,
                    "hardware unavailable, switching to simulation"
                );
                Self::Simulated
            }
        }
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated)
    }

    /// Take one sample into `resource`.
    ///
    /// Returns whether the new value is worth notifying. A failed hardware
    /// read leaves the resource untouched.
    pub fn sample(&mut self, resource: &mut Resource) -> bool {
        match self {
            Self::Digital(input) => match input.read() {
                Ok(level) => resource.record(Sample::Digital(level)),
                Err(err) => {
                    tracing::warn!(error = %err, "digital read failed");
                    false
                }
            },
            Self::Analog(input) => match input.read() {
                Ok(raw) => resource.record(Sample::Analog(raw)),
                Err(err) => {
                    tracing::warn!(error = %err, "analog read failed");
                    false
                }
            },
            Self::Simulated => resource.simulate(),
            Self::Passive => false,
        }
    }
}

impl fmt::Display for SensorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digital(_) => f.write_str("gpio"),
            Self::Analog(_) => f.write_str("adc"),
            Self::Simulated => f.write_str("simulation"),
            Self::Passive => f.write_str("passive"),
        }
    }
}

impl fmt::Debug for SensorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensorAdapter({self})")
    }
}
