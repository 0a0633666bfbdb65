//! GPIO digital input through `/sys/class/gpio`.

use std::fs;
use std::path::{Path, PathBuf};

use smartnode_app::ports::DigitalInput;
use smartnode_domain::error::SmartNodeError;

use crate::attribute;
use crate::error::SysfsError;

/// Default sysfs GPIO root.
pub const GPIO_ROOT: &str = "/sys/class/gpio";

/// A GPIO pin configured as input.
#[derive(Debug)]
pub struct SysfsGpio {
    pin: u32,
    value: PathBuf,
}

impl SysfsGpio {
    /// Export `pin` under the default root and configure it as input.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError`] when the pin cannot be exported, configured or
    /// read.
    pub fn open(pin: u32) -> Result<Self, SysfsError> {
        Self::open_in(Path::new(GPIO_ROOT), pin)
    }

    /// Same as [`open`](Self::open) with an explicit sysfs root.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError`] when the pin cannot be exported, configured or
    /// read.
    pub fn open_in(root: &Path, pin: u32) -> Result<Self, SysfsError> {
        let dir = root.join(format!("gpio{pin}"));
        if !dir.exists() {
            fs::write(root.join("export"), pin.to_string())
                .map_err(|source| SysfsError::Export { pin, source })?;
        }
        attribute::write(&dir.join("direction"), "in")?;

        let gpio = Self {
            pin,
            value: dir.join("value"),
        };
        let level = gpio.level()?;
        tracing::debug!(pin, level, "gpio opened");
        Ok(gpio)
    }

    #[must_use]
    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn level(&self) -> Result<bool, SysfsError> {
        match attribute::read(&self.value)?.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(SysfsError::InvalidValue {
                path: self.value.clone(),
                value: other.to_string(),
            }),
        }
    }
}

impl DigitalInput for SysfsGpio {
    fn read(&mut self) -> Result<bool, SmartNodeError> {
        Ok(self.level()?)
    }
}
