//! Static appliance registry.
//!
//! Each appliance maps to one telemetry channel. The list is fixed at build
//! time apart from the channel id, which comes from configuration.

use serde::Serialize;

use crate::Config;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    // ---
    pub device_id: &'static str,
    pub appliance_name: &'static str,
    pub appliance_id: &'static str,
    #[serde(skip)]
    pub channel_id: String,
    pub icon: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Nameplate power in watts.
    pub rated_power: u32,
}

/// All registered appliances.
pub fn appliances(config: &Config) -> Vec<Appliance> {
    // ---
    vec![Appliance {
        device_id: "ESP001",
        appliance_name: "Bulb",
        appliance_id: "LOAD_01",
        channel_id: config.channel_id.clone(),
        icon: "💡",
        kind: "lighting",
        rated_power: 60,
    }]
}

pub fn find(config: &Config, appliance_id: &str) -> Option<Appliance> {
    appliances(config)
        .into_iter()
        .find(|a| a.appliance_id == appliance_id)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::config::load_from;

    fn config() -> Config {
        load_from(|name| (name == "THINGSPEAK_CHANNEL_ID").then(|| "777".to_string())).unwrap()
    }

    #[test]
    fn test_find_binds_configured_channel() {
        // ---
        let bulb = find(&config(), "LOAD_01").unwrap();
        assert_eq!(bulb.channel_id, "777");
        assert_eq!(bulb.rated_power, 60);
        assert!(find(&config(), "LOAD_99").is_none());
    }

    #[test]
    fn test_channel_id_is_not_serialized() {
        // ---
        let value = serde_json::to_value(&appliances(&config())[0]).unwrap();
        assert_eq!(value["applianceId"], "LOAD_01");
        assert_eq!(value["type"], "lighting");
        assert!(value.get("channelId").is_none());
    }
}
