//! Captured datapoint values as returned by `GET /data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::AccessMode;
use crate::source::{DataKey, Source};

/// The current value of one datapoint of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datapoint {
    pub id: u16,
    pub source: Source,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub access_mode: Option<AccessMode>,
    #[serde(default)]
    pub raw_value: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub subscribed: Option<bool>,
    #[serde(default)]
    pub writable: Option<bool>,
}

impl Datapoint {
    #[must_use]
    pub fn key(&self) -> DataKey {
        DataKey::new(self.source, self.id)
    }

    /// A datapoint without name is one the gateway has no definition for.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.name.is_some()
    }

    /// Whether the gateway accepts writes for this datapoint.
    #[must_use]
    pub fn accepts_writes(&self) -> bool {
        self.access_mode.is_some_and(AccessMode::is_writable) && self.writable.unwrap_or(true)
    }
}

/// Items keyed by device type, then address, then datapoint id.
pub type NestedItems = BTreeMap<String, BTreeMap<String, BTreeMap<String, Datapoint>>>;

/// Response of `GET /data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default)]
    pub retrieved_on: Option<String>,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub actual_items: usize,
    #[serde(default)]
    pub items: NestedItems,
}

impl DataSnapshot {
    /// All datapoints ordered by source then id.
    #[must_use]
    pub fn datapoints(&self) -> Vec<&Datapoint> {
        let mut all: Vec<&Datapoint> = self
            .items
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .collect();
        all.sort_by_key(|datapoint| datapoint.key());
        all
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actual_items == 0
    }
}

/// Render a datapoint value for a table cell.
///
/// Arrays are joined with `, `, objects become `name=value` lines separated
/// by `<br>`, strings are shown without quotes.
#[must_use]
pub fn format_value(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(fields) => fields
            .iter()
            .map(|(name, value)| format!("{name}={}", format_value(value)))
            .collect::<Vec<_>>()
            .join("<br>\n"),
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
