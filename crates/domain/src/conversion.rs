//! Codecs and converters known to the gateway.

use serde::{Deserialize, Serialize};

/// Wire codec turning raw bus values into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codec {
    pub id: u32,
    pub key: String,
    #[serde(default)]
    pub description: String,
}

/// Value converter; custom converters carry their own configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Converter {
    pub id: u32,
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub built_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Converter {
    /// Only custom converters can be edited or deleted.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        !self.built_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_custom_converter() {
        let json = r#"{"id":40,"key":"mode","description":"Operating mode","builtIn":false,"config":{"0":"Off","1":"On"}}"#;
        let converter: Converter = serde_json::from_str(json).unwrap();
        assert!(converter.is_custom());
        assert_eq!(converter.config.unwrap()["1"], "On");
    }

    #[test]
    fn should_deserialize_codec() {
        let codec: Codec = serde_json::from_str(r#"{"id":1,"key":"int16"}"#).unwrap();
        assert_eq!(codec.key, "int16");
        assert!(codec.description.is_empty());
    }
}
