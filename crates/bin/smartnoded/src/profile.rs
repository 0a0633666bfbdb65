//! Device profiles: the resource a process serves and how it announces
//! itself.

use clap::ValueEnum;
use serde::Deserialize;

use smartnode_domain::descriptor::ResourceDescriptor;
use smartnode_domain::error::SmartNodeError;
use smartnode_domain::platform::{DeviceInfo, PlatformInfo};
use smartnode_domain::resource::{DimmableLight, MotionSensor, Resource, TemperatureSensor};
use smartnode_domain::time::{Timestamp, utc};

const BASELINE: &str = "oic.if.baseline";

/// Which resource this process serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// PIR motion sensor on a GPIO pin.
    #[default]
    Motion,
    /// Thermistor on an ADC channel.
    Temperature,
    /// Hub-backed dimmable light.
    Light,
    /// Hub-backed motion sensor.
    TradfriMotion,
}

/// Where a profile's value comes from when not simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Gpio,
    Adc,
    Hub { default_device_id: u32 },
}

impl Profile {
    #[must_use]
    pub fn backend(self) -> Backend {
        match self {
            Self::Motion => Backend::Gpio,
            Self::Temperature => Backend::Adc,
            Self::Light => Backend::Hub {
                default_device_id: 65542,
            },
            Self::TradfriMotion => Backend::Hub {
                default_device_id: 65537,
            },
        }
    }

    /// Build the resource in its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidInput`] if the built-in descriptor
    /// is rejected.
    pub fn resource(self) -> Result<Resource, SmartNodeError> {
        let resource = match self {
            Self::Motion => Resource::Motion(MotionSensor::new(
                ResourceDescriptor::builder()
                    .path("/a/pir")
                    .resource_type("oic.r.sensor.motion")
                    .interface(BASELINE)
                    .build()?,
                Some("motionSensor".to_string()),
                false,
            )),
            Self::Temperature => Resource::Temperature(TemperatureSensor::new(
                ResourceDescriptor::builder()
                    .path("/a/temperature")
                    .resource_type("oic.r.temperature")
                    .interface(BASELINE)
                    .build()?,
                "temperature",
            )),
            Self::Light => Resource::Light(DimmableLight::new(
                ResourceDescriptor::builder()
                    .path("/light/")
                    .resource_type("oic.wk.col")
                    .resource_type("oic.r.light")
                    .interface(BASELINE)
                    .interface("oic.if.b")
                    .interface("oic.if.ll")
                    .build()?,
            )),
            Self::TradfriMotion => Resource::Motion(MotionSensor::new(
                ResourceDescriptor::builder()
                    .path("/motion")
                    .resource_type("oic.r.sensor.motion")
                    .interface(BASELINE)
                    .build()?,
                None,
                true,
            )),
        };
        Ok(resource)
    }

    #[must_use]
    pub fn device_info(self) -> DeviceInfo {
        DeviceInfo::new(match self {
            Self::Motion => "Smart Home Motion Sensor",
            Self::Temperature => "Smart Home Temperature Sensor",
            Self::Light => "batch light",
            Self::TradfriMotion => "Tradfri motion",
        })
    }

    #[must_use]
    pub fn platform_info(self) -> PlatformInfo {
        let (manufacturer, date) = match self {
            Self::Motion | Self::Temperature => ("Intel", intel_release()),
            Self::Light => ("iotivity-node", intel_release()),
            Self::TradfriMotion => ("iotivity-node", utc(2017, 7, 4, 7, 0, 0)),
        };
        PlatformInfo::new(manufacturer, date)
    }
}

fn intel_release() -> Option<Timestamp> {
    utc(2015, 10, 30, 8, 4, 17)
}
