//! OCF device and platform metadata announced alongside a resource.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, PlatformId};
use crate::time::Timestamp;

/// Core specification version every device announces.
pub const CORE_SPEC_VERSION: &str = "core.1.1.0";

/// Data model version every device announces.
pub const DATA_MODEL_VERSION: &str = "res.1.1.0";

/// Device information served at `/oic/d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "di")]
    pub id: DeviceId,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "icv")]
    pub core_spec_version: String,
    #[serde(rename = "dmv")]
    pub data_models: Vec<String>,
}

impl DeviceInfo {
    /// Device info with a fresh id and the current core and data model versions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            core_spec_version: CORE_SPEC_VERSION.to_string(),
            data_models: vec![DATA_MODEL_VERSION.to_string()],
        }
    }
}

/// Platform information served at `/oic/p`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    #[serde(rename = "pi")]
    pub id: PlatformId,
    #[serde(rename = "mnmn")]
    pub manufacturer_name: String,
    #[serde(rename = "mndt", skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<Timestamp>,
    #[serde(rename = "mnpv")]
    pub platform_version: String,
    #[serde(rename = "mnfv")]
    pub firmware_version: String,
}

impl PlatformInfo {
    /// Platform info with a fresh id, version `1.1.0` and firmware `0.0.1`.
    #[must_use]
    pub fn new(manufacturer_name: impl Into<String>, manufacture_date: Option<Timestamp>) -> Self {
        Self {
            id: PlatformId::new(),
            manufacturer_name: manufacturer_name.into(),
            manufacture_date,
            platform_version: "1.1.0".to_string(),
            firmware_version: "0.0.1".to_string(),
        }
    }
}
