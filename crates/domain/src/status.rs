//! System status and the device list reported by the gateway.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Accept strings, numbers and booleans, keeping their textual form.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Response of `GET /system/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub system: SystemInfo,
}

/// Diagnostics collected by the gateway firmware.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(deserialize_with = "lenient_string")]
    pub chip_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub flash_chip_id: String,
    #[serde(rename = "sketchMD5", deserialize_with = "lenient_string")]
    pub sketch_md5: String,
    #[serde(deserialize_with = "lenient_string")]
    pub iot_core_version: String,
    #[serde(deserialize_with = "lenient_string")]
    pub esp_core_version: String,
    #[serde(deserialize_with = "lenient_string")]
    pub esp_sdk_version: String,
    #[serde(deserialize_with = "lenient_string")]
    pub chip_vcc: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cpu_freq: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reset_reason: String,
    #[serde(deserialize_with = "lenient_string")]
    pub uptime: String,
    #[serde(deserialize_with = "lenient_string")]
    pub free_heap: String,
    #[serde(deserialize_with = "lenient_string")]
    pub max_free_block_size: String,
    #[serde(deserialize_with = "lenient_string")]
    pub heap_fragmentation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wifi_rssi: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ip: String,
}

impl SystemInfo {
    /// Heap fragmentation in percent, if the gateway reported a number.
    #[must_use]
    pub fn heap_fragmentation_percent(&self) -> Option<u8> {
        self.heap_fragmentation
            .trim()
            .parse::<u8>()
            .ok()
            .map(|percent| percent.min(100))
    }
}

/// Rating of the heap fragmentation percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HeapCondition {
    #[must_use]
    pub fn from_fragmentation(percent: u8) -> Self {
        match percent {
            0..15 => Self::Excellent,
            15..30 => Self::Good,
            30..50 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// CSS class used to colour the fragmentation bar.
    #[must_use]
    pub fn css_class(self) -> String {
        format!("condition-{self}")
    }
}

impl fmt::Display for HeapCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        })
    }
}

/// Response of `GET /devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    /// Devices emulated by the gateway itself, with a description.
    #[serde(default, rename = "this")]
    pub own: BTreeMap<String, String>,
    /// Other devices seen on the bus.
    #[serde(default)]
    pub others: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_status_with_mixed_types() {
        let json = r#"{"system":{"name":"wifi-gateway","version":"1.2.0","chipId":"a1b2c3","chipVcc":"3.30","cpuFreq":80,"heapFragmentation":"12","sketchMD5":"abc","wifiRssi":-61}}"#;
        let status: SystemStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.system.name, "wifi-gateway");
        assert_eq!(status.system.cpu_freq, "80");
        assert_eq!(status.system.wifi_rssi, "-61");
        assert_eq!(status.system.sketch_md5, "abc");
        assert_eq!(status.system.heap_fragmentation_percent(), Some(12));
        assert_eq!(status.system.ip, "");
    }

    #[test]
    fn should_rate_heap_fragmentation() {
        assert_eq!(HeapCondition::from_fragmentation(0), HeapCondition::Excellent);
        assert_eq!(HeapCondition::from_fragmentation(14), HeapCondition::Excellent);
        assert_eq!(HeapCondition::from_fragmentation(15), HeapCondition::Good);
        assert_eq!(HeapCondition::from_fragmentation(49), HeapCondition::Fair);
        assert_eq!(HeapCondition::from_fragmentation(50), HeapCondition::Poor);
        assert_eq!(HeapCondition::Fair.css_class(), "condition-fair");
    }

    #[test]
    fn should_deserialize_device_list() {
        let json = r#"{"this":{"DIS/3":"Display emulation"},"others":["HEA/1","SEN/1"]}"#;
        let devices: DeviceList = serde_json::from_str(json).unwrap();
        assert_eq!(devices.own.get("DIS/3").map(String::as_str), Some("Display emulation"));
        assert_eq!(devices.others, ["HEA/1", "SEN/1"]);
    }
}
