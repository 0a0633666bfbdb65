//! Node assembly: pick the value source for the configured profile and
//! start the resource on a transport.

use smartnode_adapter_http_axum::{HttpResource, HttpTransport};
use smartnode_adapter_mqtt::MqttHub;
use smartnode_adapter_sysfs::{IioAnalog, SysfsError, SysfsGpio};
use smartnode_app::engine::HubBinding;
use smartnode_app::lifecycle::{Node, NodeConfig};
use smartnode_app::ports::HubClient;
use smartnode_app::sensor::SensorAdapter;
use smartnode_domain::error::SmartNodeError;

use crate::config::Config;
use crate::profile::{Backend, Profile};

/// Transport announcing the device and platform of `profile`.
#[must_use]
pub fn transport(profile: Profile) -> HttpTransport {
    HttpTransport::new(profile.device_info(), profile.platform_info())
}

/// Build the configured resource and register it on `transport`.
///
/// Hardware that cannot be bound and a hub that cannot be reached both
/// degrade to simulation.
///
/// # Errors
///
/// Returns [`SmartNodeError`] if the profile's resource cannot be built.
pub async fn start(
    config: &Config,
    transport: &HttpTransport,
) -> Result<Node<HttpResource>, SmartNodeError> {
    let profile = config.resource.profile;
    let resource = profile.resource()?;
    let path = resource.descriptor().path.clone();

    let (sensor, hub) = if config.resource.simulation {
        tracing::info!(path = %path, "simulation requested");
        (simulated(profile), None)
    } else {
        bind(config, &path).await
    };

    let node = Node::start(
        transport,
        NodeConfig {
            resource,
            sensor,
            hub,
            timing: config.timing.timing(),
            shutdown_grace: config.timing.shutdown_grace(),
        },
    )
    .await;
    Ok(node)
}

/// Value source used when nothing real is bound. Hub-backed resources only
/// change through writes.
#[must_use]
pub fn simulated(profile: Profile) -> SensorAdapter {
    match profile.backend() {
        Backend::Hub { .. } => SensorAdapter::Passive,
        Backend::Gpio | Backend::Adc => SensorAdapter::Simulated,
    }
}

async fn bind(config: &Config, path: &str) -> (SensorAdapter, Option<HubBinding<MqttHub>>) {
    let settings = &config.resource;
    match config.resource.profile.backend() {
        Backend::Gpio => {
            let sensor = SensorAdapter::bind_or_simulate(path, || {
                let gpio = SysfsGpio::open(settings.gpio_pin).map_err(SysfsError::into_domain)?;
                Ok(SensorAdapter::Digital(Box::new(gpio)))
            });
            (sensor, None)
        }
        Backend::Adc => {
            let sensor = SensorAdapter::bind_or_simulate(path, || {
                let adc = IioAnalog::open(settings.adc_device, settings.adc_channel)
                    .map_err(SysfsError::into_domain)?;
                Ok(SensorAdapter::Analog(Box::new(adc)))
            });
            (sensor, None)
        }
        Backend::Hub { default_device_id } => {
            let Some(hub_config) = &config.hub else {
                tracing::warn!(path, "hub not configured, switching to simulation");
                return (SensorAdapter::Passive, None);
            };
            let client = MqttHub::new(hub_config.clone());
            match client.connect().await {
                Ok(()) => {
                    let device_id = settings.hub_device_id.unwrap_or(default_device_id);
                    tracing::info!(path, device_id, "resource bound to hub device");
                    (
                        SensorAdapter::Passive,
                        Some(HubBinding { client, device_id }),
                    )
                }
                Err(err) => {
                    tracing::warn!(
                        path,
                        error = %err,
                        "hub unreachable, switching to simulation"
                    );
                    (SensorAdapter::Passive, None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_hub_profiles_passive_in_simulation() {
        assert!(matches!(
            simulated(Profile::TradfriMotion),
            SensorAdapter::Passive
        ));
        assert!(matches!(simulated(Profile::Light), SensorAdapter::Passive));
    }

    #[test]
    fn should_synthesize_readings_for_hardware_profiles_in_simulation() {
        assert!(simulated(Profile::Motion).is_simulated());
        assert!(simulated(Profile::Temperature).is_simulated());
    }

    #[tokio::test]
    async fn should_stay_passive_when_hub_is_not_configured() {
        let mut config = Config::default();
        config.resource.profile = Profile::TradfriMotion;
        config.hub = None;

        let (sensor, hub) = bind(&config, "/motion").await;

        assert!(matches!(sensor, SensorAdapter::Passive));
        assert!(hub.is_none());
    }
}
