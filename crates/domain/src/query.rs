//! Query string builder for `GET /data`.

use std::fmt;

/// Which datapoints `GET /data` should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataFilter {
    #[default]
    All,
    Undefined,
    Configured,
    NotConfigured,
}

impl DataFilter {
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Undefined,
        Self::Configured,
        Self::NotConfigured,
    ];

    /// Label shown in the filter picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Undefined => "Undefined",
            Self::Configured => "Configured",
            Self::NotConfigured => "Not Configured",
        }
    }

    /// Find a filter by its picker label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.label() == label)
    }

    fn parameter(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Undefined => Some("undefined"),
            Self::Configured => Some("configured"),
            Self::NotConfigured => Some("notConfigured"),
        }
    }
}

/// Parameters of a `GET /data` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataQuery {
    pub filter: DataFilter,
    pub updated_since: Option<String>,
    pub numbers_as_decimals: bool,
}

impl DataQuery {
    #[must_use]
    pub fn new(filter: DataFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Restrict to values updated since the given ISO timestamp; blank input
    /// clears the restriction.
    #[must_use]
    pub fn updated_since(mut self, since: &str) -> Self {
        let since = since.trim();
        self.updated_since = (!since.is_empty()).then(|| since.to_string());
        self
    }

    #[must_use]
    pub fn numbers_as_decimals(mut self, enabled: bool) -> Self {
        self.numbers_as_decimals = enabled;
        self
    }
}

/// Renders `?filter=..&updatedSince=..&numbersAsDecimals`, or nothing when no
/// parameter is set.
impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = Vec::new();
        if let Some(filter) = self.filter.parameter() {
            params.push(format!("filter={filter}"));
        }
        if let Some(since) = &self.updated_since {
            params.push(format!("updatedSince={}", encode_component(since)));
        }
        if self.numbers_as_decimals {
            params.push("numbersAsDecimals".to_string());
        }
        if params.is_empty() {
            return Ok(());
        }
        write!(f, "?{}", params.join("&"))
    }
}

/// Percent-encode a query component, leaving the same characters unescaped
/// as the browser's `encodeURIComponent`.
#[must_use]
pub fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}
