//! Data configuration: which datapoints the gateway subscribes to or
//! accepts writes for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::definition::AccessMode;
use crate::source::{DataKey, Source};

/// One configured datapoint as listed by `GET /data/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfigEntry {
    pub value_id: u16,
    pub source: Source,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub access_mode: AccessMode,
    #[serde(default)]
    pub subscribed: bool,
    #[serde(default)]
    pub writable: bool,
}

impl DataConfigEntry {
    #[must_use]
    pub fn key(&self) -> DataKey {
        DataKey::new(self.source, self.value_id)
    }

    /// An entry with neither flag set no longer configures anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscribed || self.writable
    }

    #[must_use]
    pub fn flags(&self) -> DataConfigFlags {
        DataConfigFlags {
            subscribed: self.subscribed,
            writable: self.writable,
        }
    }
}

/// Body of `PUT /data/config/{type}/{address}/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfigFlags {
    pub subscribed: bool,
    pub writable: bool,
}

/// How a newly added datapoint should be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataConfigMode {
    Subscribe,
    Writable,
    Both,
}

impl DataConfigMode {
    pub const ALL: [Self; 3] = [Self::Subscribe, Self::Writable, Self::Both];
    const READ_ONLY: [Self; 1] = [Self::Subscribe];

    /// Modes that make sense for a definition with the given access mode.
    #[must_use]
    pub fn allowed_for(access_mode: AccessMode) -> &'static [Self] {
        if access_mode.is_writable() {
            &Self::ALL
        } else {
            &Self::READ_ONLY
        }
    }

    /// Preselected mode for a definition with the given access mode.
    #[must_use]
    pub fn default_for(access_mode: AccessMode) -> Self {
        if access_mode.is_writable() {
            Self::Writable
        } else {
            Self::Subscribe
        }
    }

    #[must_use]
    pub fn flags(self) -> DataConfigFlags {
        DataConfigFlags {
            subscribed: matches!(self, Self::Subscribe | Self::Both),
            writable: matches!(self, Self::Writable | Self::Both),
        }
    }
}

impl fmt::Display for DataConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subscribe => "Subscribe",
            Self::Writable => "Writable",
            Self::Both => "Both",
        })
    }
}

impl std::str::FromStr for DataConfigMode {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string() == s)
            .ok_or_else(|| crate::error::ParseError::InvalidValue {
                key: "mode".to_string(),
                value: s.to_string(),
            })
    }
}

/// Item of the legacy `POST /subscriptions` and `POST /writable` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDataKey {
    pub value_id: u16,
    pub source: Source,
}

impl From<DataKey> for LegacyDataKey {
    fn from(key: DataKey) -> Self {
        Self {
            value_id: key.value_id,
            source: key.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DeviceType;

    #[test]
    fn should_deserialize_flat_entries() {
        let json = r#"[{"valueId":9,"source":"HEA/2","name":"Mode","unit":"","accessMode":"Writable","subscribed":true,"writable":false}]"#;
        let entries: Vec<DataConfigEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].key(),
            DataKey::new(Source::new(DeviceType::HeatingCircuit, 2), 9)
        );
        assert!(entries[0].is_active());
    }

    #[test]
    fn should_restrict_modes_for_readable_definitions() {
        assert_eq!(
            DataConfigMode::allowed_for(AccessMode::Readable),
            &[DataConfigMode::Subscribe]
        );
        assert_eq!(DataConfigMode::allowed_for(AccessMode::Writable).len(), 3);
        assert_eq!(
            DataConfigMode::default_for(AccessMode::Writable),
            DataConfigMode::Writable
        );
    }

    #[test]
    fn should_map_modes_to_flags() {
        assert_eq!(
            DataConfigMode::Both.flags(),
            DataConfigFlags {
                subscribed: true,
                writable: true
            }
        );
        assert!(!DataConfigMode::Subscribe.flags().writable);
    }

    #[test]
    fn should_parse_mode_names() {
        assert_eq!("Both".parse::<DataConfigMode>(), Ok(DataConfigMode::Both));
        assert!("Read".parse::<DataConfigMode>().is_err());
    }

    #[test]
    fn should_serialize_legacy_key() {
        let key = DataKey::new(Source::new(DeviceType::System, 0), 42);
        let json = serde_json::to_string(&[LegacyDataKey::from(key)]).unwrap();
        assert_eq!(json, r#"[{"valueId":42,"source":"SYS/0"}]"#);
    }
}
