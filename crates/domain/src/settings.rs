//! Typed settings carried by the config text format.

use std::fmt;
use std::str::FromStr;

use crate::config_text::{ConfigDocument, FlatConfig};
use crate::error::ParseError;

macro_rules! define_choice {
    ($(#[doc = $doc:expr])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every choice, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire and display name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// All wire names, in display order.
            #[must_use]
            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|choice| choice.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| ParseError::InvalidValue {
                        key: stringify!($name).to_string(),
                        value: s.to_string(),
                    })
            }
        }
    };
}

define_choice!(
    /// Which datapoints the gateway captures from the bus.
    CaptureMode {
        None => "None",
        Configured => "Configured",
        Defined => "Defined",
        Any => "Any",
    }
);

define_choice!(
    /// Operating mode of the CAN controller.
    CanMode {
        Normal => "Normal",
        ListenOnly => "ListenOnly",
        LoopBack => "LoopBack",
    }
);

fn parse_entry<T: FromStr>(path: &str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        key: path.to_string(),
        value: value.to_string(),
    })
}

fn require<'a>(config: &'a ConfigDocument, category: &str, key: &str) -> Result<&'a str, ParseError> {
    config
        .get(category, key)
        .ok_or_else(|| ParseError::MissingEntry(format!("{category}.{key}")))
}

/// Base settings stored under the `dta`, `sep` and `can` categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSettings {
    pub capture_mode: CaptureMode,
    pub write_enabled: bool,
    /// One-based display address as shown to the user (1..=4).
    pub display_address: u8,
    pub can_mode: CanMode,
}

impl BaseSettings {
    pub const MIN_DISPLAY_ADDRESS: u8 = 1;
    pub const MAX_DISPLAY_ADDRESS: u8 = 4;

    /// Read the settings from the grouped `/system/config` document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when an entry is missing or malformed.
    pub fn from_config(config: &ConfigDocument) -> Result<Self, ParseError> {
        let display: u8 = parse_entry("sep.display", require(config, "sep", "display")?)?;
        Ok(Self {
            capture_mode: require(config, "dta", "mode")?.parse()?,
            write_enabled: require(config, "dta", "readOnly")? == "false",
            display_address: display.saturating_add(1),
            can_mode: require(config, "can", "mode")?.parse()?,
        })
    }

    /// Build the grouped document sent with `PUT /system/config`.
    #[must_use]
    pub fn to_config(&self) -> ConfigDocument {
        let mut config = ConfigDocument::new();
        config.set("dta", "mode", self.capture_mode);
        config.set("dta", "readOnly", !self.write_enabled);
        config.set("sep", "display", self.display_address.saturating_sub(1));
        config.set("can", "mode", self.can_mode);
        config
    }
}

/// MQTT client settings stored under `/system/config/mqc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    pub enabled: bool,
    pub broker: String,
    pub port: u16,
    pub topic: String,
}

impl MqttSettings {
    /// Maximum topic length accepted by the firmware.
    pub const MAX_TOPIC_LENGTH: usize = 31;
    /// Maximum broker address length (dotted IPv4).
    pub const MAX_BROKER_LENGTH: usize = 15;
    /// Pattern a broker address has to satisfy.
    pub const BROKER_PATTERN: &'static str = r"(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}";

    /// Read the settings from the flat `mqc` config.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when an entry is missing or malformed.
    pub fn from_config(config: &FlatConfig) -> Result<Self, ParseError> {
        Ok(Self {
            enabled: config.require("enabled")? == "true",
            broker: config.require("broker")?.to_string(),
            port: parse_entry("port", config.require("port")?)?,
            topic: config.require("topic")?.to_string(),
        })
    }

    /// Build the flat config sent with `PUT /system/config/mqc`.
    #[must_use]
    pub fn to_config(&self) -> FlatConfig {
        let mut config = FlatConfig::new();
        config.set("enabled", self.enabled);
        config.set("broker", &self.broker);
        config.set("port", self.port);
        config.set("topic", &self.topic);
        config
    }
}
