//! Sysfs adapter error types.

use std::io;
use std::path::PathBuf;

use smartnode_domain::error::SmartNodeError;

/// Errors specific to the sysfs adapter.
#[derive(Debug, thiserror::Error)]
pub enum SysfsError {
    /// The kernel refused to export the GPIO pin.
    #[error("failed to export gpio {pin}")]
    Export {
        pin: u32,
        #[source]
        source: io::Error,
    },

    /// A sysfs attribute could not be read or written.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An attribute held something other than the expected number.
    #[error("unexpected value {value:?} in {}", path.display())]
    InvalidValue { path: PathBuf, value: String },

    /// The ADC returned a sample wider than 10 bits.
    #[error("sample {value} exceeds the 10-bit ADC range")]
    OutOfRange { value: u32 },
}

impl SysfsError {
    /// Convert into a [`SmartNodeError::AdapterUnavailable`] for propagation
    /// across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> SmartNodeError {
        SmartNodeError::AdapterUnavailable(Box::new(self))
    }
}

impl From<SysfsError> for SmartNodeError {
    fn from(err: SysfsError) -> Self {
        err.into_domain()
    }
}
