//! # smartnode-adapter-sysfs
//!
//! Hardware adapter reading sensors through the Linux sysfs interfaces.
//!
//! ## Responsibilities
//! - Implement the `DigitalInput` port on a GPIO pin exported under
//!   `/sys/class/gpio`
//! - Implement the `AnalogInput` port on an IIO ADC channel under
//!   `/sys/bus/iio/devices`
//! - Probe the hardware once when opening so that a missing pin is detected
//!   at startup, where the caller can fall back to simulation
//!
//! ## Dependency rule
//! Depends on `smartnode-app` (for port traits) and `smartnode-domain` (for
//! the error type). Every sysfs root is injectable so tests can point at a
//! temporary directory.

pub mod adc;
mod attribute;
pub mod error;
pub mod gpio;

pub use adc::IioAnalog;
pub use error::SysfsError;
pub use gpio::SysfsGpio;
