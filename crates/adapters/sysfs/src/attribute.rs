//! Reading and writing single-value sysfs attributes.

use std::fs;
use std::path::Path;

use crate::error::SysfsError;

pub(crate) fn read(path: &Path) -> Result<String, SysfsError> {
    fs::read_to_string(path)
        .map(|value| value.trim().to_string())
        .map_err(|source| SysfsError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn read_number(path: &Path) -> Result<u32, SysfsError> {
    let value = read(path)?;
    value.parse().map_err(|_| SysfsError::InvalidValue {
        path: path.to_path_buf(),
        value,
    })
}

pub(crate) fn write(path: &Path, value: &str) -> Result<(), SysfsError> {
    fs::write(path, value).map_err(|source| SysfsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
