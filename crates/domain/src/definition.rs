//! Datapoint definitions: static metadata describing a value on the bus.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::Source;

/// Whether a datapoint can be read, written or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    None,
    Readable,
    Writable,
}

impl AccessMode {
    #[must_use]
    pub fn is_writable(self) -> bool {
        self == Self::Writable
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Readable => "Readable",
            Self::Writable => "Writable",
        })
    }
}

/// Metadata for one datapoint id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub access_mode: AccessMode,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

impl Definition {
    /// Label used in pickers: `[id] name`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("[{}] {}", self.id, self.name)
    }
}
