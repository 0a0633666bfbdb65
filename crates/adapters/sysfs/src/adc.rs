//! ADC analog input through the Linux IIO subsystem.

use std::path::{Path, PathBuf};

use smartnode_app::ports::AnalogInput;
use smartnode_domain::error::SmartNodeError;

use crate::attribute;
use crate::error::SysfsError;

/// Default IIO devices root.
pub const IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Largest sample a 10-bit converter produces.
pub const MAX_SAMPLE: u16 = 1023;

/// One voltage channel of an IIO device.
#[derive(Debug)]
pub struct IioAnalog {
    raw: PathBuf,
}

impl IioAnalog {
    /// Open `in_voltage<channel>_raw` of `iio:device<device>`.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError`] when the channel cannot be read.
    pub fn open(device: u32, channel: u32) -> Result<Self, SysfsError> {
        Self::open_in(Path::new(IIO_ROOT), device, channel)
    }

    /// Same as [`open`](Self::open) with an explicit IIO root.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError`] when the channel cannot be read.
    pub fn open_in(root: &Path, device: u32, channel: u32) -> Result<Self, SysfsError> {
        let raw = root
            .join(format!("iio:device{device}"))
            .join(format!("in_voltage{channel}_raw"));
        let adc = Self { raw };
        let sample = adc.sample()?;
        tracing::debug!(device, channel, sample, "adc channel opened");
        Ok(adc)
    }

    fn sample(&self) -> Result<u16, SysfsError> {
        let value = attribute::read_number(&self.raw)?;
        u16::try_from(value)
            .ok()
            .filter(|sample| *sample <= MAX_SAMPLE)
            .ok_or(SysfsError::OutOfRange { value })
    }
}

impl AnalogInput for IioAnalog {
    fn read(&mut self) -> Result<u16, SmartNodeError> {
        Ok(self.sample()?)
    }
}
