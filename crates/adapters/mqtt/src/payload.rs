//! JSON body understood by the hub bridge.

use serde::Serialize;
use smartnode_domain::command::DeviceCommand;

/// Set request for one hub device. Absent fields are left untouched by the
/// bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<u32>,
}

impl From<&DeviceCommand> for SetPayload {
    fn from(command: &DeviceCommand) -> Self {
        Self {
            state: command.on.map(|on| if on { "ON" } else { "OFF" }),
            brightness: command.dimming,
            transition: command.transition_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_encode_full_command() {
        let command = DeviceCommand {
            on: Some(true),
            dimming: Some(80),
            transition_time: Some(5),
        };
        let json = serde_json::to_value(SetPayload::from(&command)).unwrap();
        assert_eq!(
            json,
            json!({"state": "ON", "brightness": 80, "transition": 5})
        );
    }

    #[test]
    fn should_omit_absent_fields() {
        let command = DeviceCommand {
            on: Some(false),
            ..DeviceCommand::default()
        };
        let json = serde_json::to_value(SetPayload::from(&command)).unwrap();
        assert_eq!(json, json!({"state": "OFF"}));
    }
}
