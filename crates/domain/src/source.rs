//! Sources: where a datapoint originates on the heat pump bus.
//!
//! A source is written `TYPE/address`, e.g. `HEA/1` for the first heating
//! circuit or `ANY/*` for a definition that matches every device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Highest address a device can have on the bus.
pub const MAX_ADDRESS: u8 = 127;

/// Kind of device on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceType {
    System,
    HeatingCircuit,
    Sensor,
    Display,
    Any,
    /// A raw type code the gateway could not name, rendered as `Xhh`.
    Other(u8),
}

impl DeviceType {
    /// The concrete device types a user can pick from.
    pub const SELECTABLE: [Self; 4] = [
        Self::System,
        Self::HeatingCircuit,
        Self::Sensor,
        Self::Display,
    ];

    /// Human readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::HeatingCircuit => "Heating Circuit",
            Self::Sensor => "Sensor",
            Self::Display => "Display",
            Self::Any => "Any",
            Self::Other(_) => "Other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("SYS"),
            Self::HeatingCircuit => f.write_str("HEA"),
            Self::Sensor => f.write_str("SEN"),
            Self::Display => f.write_str("DIS"),
            Self::Any => f.write_str("ANY"),
            Self::Other(code) => write!(f, "X{code:02X}"),
        }
    }
}

impl FromStr for DeviceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYS" => Ok(Self::System),
            "HEA" => Ok(Self::HeatingCircuit),
            "SEN" => Ok(Self::Sensor),
            "DIS" => Ok(Self::Display),
            "ANY" => Ok(Self::Any),
            other => other
                .strip_prefix('X')
                .filter(|hex| hex.len() == 2)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .map(Self::Other)
                .ok_or_else(|| ParseError::InvalidDeviceType(s.to_string())),
        }
    }
}

/// A device type plus an optional address (`None` is the `*` wildcard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Source {
    pub device_type: DeviceType,
    pub address: Option<u8>,
}

impl Source {
    /// A source pointing at one specific device.
    #[must_use]
    pub fn new(device_type: DeviceType, address: u8) -> Self {
        Self {
            device_type,
            address: Some(address),
        }
    }

    /// The `ANY/*` wildcard.
    #[must_use]
    pub fn any() -> Self {
        Self {
            device_type: DeviceType::Any,
            address: None,
        }
    }

    /// Whether both type and address designate a single device.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.device_type != DeviceType::Any && self.address.is_some()
    }

    /// Whether `other` is covered by this (possibly wildcard) source.
    #[must_use]
    pub fn matches(&self, other: &Source) -> bool {
        (self.device_type == DeviceType::Any || self.device_type == other.device_type)
            && (self.address.is_none() || self.address == other.address)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "{}/{address}", self.device_type),
            None => write!(f, "{}/*", self.device_type),
        }
    }
}

impl FromStr for Source {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device_type, address) = s
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidSource(s.to_string()))?;
        let device_type = device_type.parse()?;
        let address = match address {
            "*" => None,
            digits => Some(
                digits
                    .parse::<u8>()
                    .ok()
                    .filter(|address| *address <= MAX_ADDRESS)
                    .ok_or_else(|| ParseError::InvalidAddress(digits.to_string()))?,
            ),
        };
        Ok(Self {
            device_type,
            address,
        })
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifies one datapoint of one concrete device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataKey {
    pub source: Source,
    pub value_id: u16,
}

impl DataKey {
    #[must_use]
    pub fn new(source: Source, value_id: u16) -> Self {
        Self { source, value_id }
    }

    /// Path segments `{type}/{address}/{id}` used by item endpoints.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.source, self.value_id)
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.value_id, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_concrete_source() {
        let source: Source = "HEA/1".parse().unwrap();
        assert_eq!(source, Source::new(DeviceType::HeatingCircuit, 1));
        assert!(source.is_concrete());
    }

    #[test]
    fn should_parse_wildcard_source() {
        let source: Source = "ANY/*".parse().unwrap();
        assert_eq!(source, Source::any());
        assert!(!source.is_concrete());
        assert_eq!(source.to_string(), "ANY/*");
    }

    #[test]
    fn should_round_trip_unknown_device_type() {
        let source: Source = "X1F/3".parse().unwrap();
        assert_eq!(source.device_type, DeviceType::Other(0x1F));
        assert_eq!(source.to_string(), "X1F/3");
    }

    #[test]
    fn should_reject_address_out_of_range() {
        assert_eq!(
            "SYS/128".parse::<Source>(),
            Err(ParseError::InvalidAddress("128".to_string()))
        );
    }

    #[test]
    fn should_reject_missing_slash() {
        assert!(matches!(
            "SYS".parse::<Source>(),
            Err(ParseError::InvalidSource(_))
        ));
    }

    #[test]
    fn should_reject_unknown_type() {
        assert!(matches!(
            "FOO/1".parse::<Source>(),
            Err(ParseError::InvalidDeviceType(_))
        ));
    }

    #[test]
    fn should_match_wildcards() {
        let any: Source = "ANY/*".parse().unwrap();
        let heating_any: Source = "HEA/*".parse().unwrap();
        let heating_one = Source::new(DeviceType::HeatingCircuit, 1);
        let sensor = Source::new(DeviceType::Sensor, 1);
        assert!(any.matches(&sensor));
        assert!(heating_any.matches(&heating_one));
        assert!(!heating_any.matches(&sensor));
        assert!(heating_one.matches(&heating_one));
    }

    #[test]
    fn should_build_item_path() {
        let key = DataKey::new(Source::new(DeviceType::Sensor, 3), 12);
        assert_eq!(key.path(), "SEN/3/12");
        assert_eq!(key.to_string(), "12@SEN/3");
    }

    #[test]
    fn should_deserialize_source_from_json_string() {
        let source: Source = serde_json::from_str("\"DIS/2\"").unwrap();
        assert_eq!(source, Source::new(DeviceType::Display, 2));
        assert_eq!(serde_json::to_string(&source).unwrap(), "\"DIS/2\"");
    }
}
