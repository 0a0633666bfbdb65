//! Resource state snapshots used for change detection.

use serde::{Deserialize, Serialize};

/// On/off, dimming level and transition time of a dimmable light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub on: bool,
    pub dimming: u32,
    pub ramp_time: u32,
}

/// Snapshot of a resource's current value.
///
/// The notify loop keeps the last snapshot it pushed and compares new
/// snapshots against it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResourceState {
    Binary(bool),
    /// Reading in degrees Celsius.
    Numeric(f64),
    Composite(LightState),
}

impl ResourceState {
    /// Whether `self` has to be pushed to observers that last saw `other`.
    #[must_use]
    pub fn differs_from(&self, other: Option<&Self>) -> bool {
        other != Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_differ_from_nothing() {
        assert!(ResourceState::Binary(false).differs_from(None));
    }

    #[test]
    fn should_not_differ_from_equal_snapshot() {
        let state = ResourceState::Numeric(21.5);
        assert!(!state.differs_from(Some(&ResourceState::Numeric(21.5))));
    }

    #[test]
    fn should_differ_when_light_level_changes() {
        let before = ResourceState::Composite(LightState::default());
        let after = ResourceState::Composite(LightState {
            dimming: 40,
            ..LightState::default()
        });
        assert!(after.differs_from(Some(&before)));
    }
}
