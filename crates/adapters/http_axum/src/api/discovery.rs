//! OCF discovery: resource links, device and platform information.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use smartnode_domain::descriptor::ResourceDescriptor;
use smartnode_domain::platform::{DeviceInfo, PlatformInfo};

use crate::state::AppState;

const DISCOVERABLE: u8 = 0x01;
const OBSERVABLE: u8 = 0x02;

/// Link policy; `bm` is the discoverable/observable bitmask.
#[derive(Debug, Serialize)]
pub struct Policy {
    pub bm: u8,
}

/// One entry of `/oic/res`.
#[derive(Debug, Serialize)]
pub struct Link {
    pub href: String,
    pub rt: Vec<String>,
    #[serde(rename = "if")]
    pub interfaces: Vec<String>,
    pub p: Policy,
}

impl From<ResourceDescriptor> for Link {
    fn from(descriptor: ResourceDescriptor) -> Self {
        let mut bm = 0;
        if descriptor.discoverable {
            bm |= DISCOVERABLE;
        }
        if descriptor.observable {
            bm |= OBSERVABLE;
        }
        Self {
            href: descriptor.path,
            rt: descriptor.resource_types,
            interfaces: descriptor.interfaces,
            p: Policy { bm },
        }
    }
}

/// `GET /oic/res`
pub async fn resources(State(state): State<AppState>) -> Json<Vec<Link>> {
    Json(
        state
            .registry
            .discoverable()
            .into_iter()
            .map(Link::from)
            .collect(),
    )
}

/// `GET /oic/d`
pub async fn device(State(state): State<AppState>) -> Json<DeviceInfo> {
    Json(DeviceInfo::clone(&state.device))
}

/// `GET /oic/p`
pub async fn platform(State(state): State<AppState>) -> Json<PlatformInfo> {
    Json(PlatformInfo::clone(&state.platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_policy_bitmask() {
        let mut descriptor = ResourceDescriptor::builder()
            .path("/light/")
            .resource_type("oic.wk.col")
            .resource_type("oic.r.light")
            .interface("oic.if.baseline")
            .build()
            .unwrap();
        assert_eq!(Link::from(descriptor.clone()).p.bm, 3);

        descriptor.observable = false;
        let link = Link::from(descriptor);
        assert_eq!(link.p.bm, 1);
        assert_eq!(link.href, "/light/");
        assert_eq!(link.rt, ["oic.wk.col", "oic.r.light"]);
    }

    #[test]
    fn should_serialize_interfaces_under_if_key() {
        let descriptor = ResourceDescriptor::builder()
            .path("/a/pir")
            .resource_type("oic.r.sensor.motion")
            .interface("oic.if.baseline")
            .build()
            .unwrap();
        let json = serde_json::to_value(Link::from(descriptor)).unwrap();
        assert_eq!(json["if"], serde_json::json!(["oic.if.baseline"]));
        assert_eq!(json["p"]["bm"], 3);
    }
}
