//! Parse errors raised by the domain codecs.

/// Error produced when a textual payload cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A config line has no `=` separating path and value.
    #[error("config line {line} has no `=` separator: {content:?}")]
    MissingSeparator { line: usize, content: String },

    /// A grouped config line has no `category.` prefix.
    #[error("config line {line} has no category: {content:?}")]
    MissingCategory { line: usize, content: String },

    /// A source string is not of the form `TYPE/address`.
    #[error("invalid source {0:?}, expected `TYPE/address`")]
    InvalidSource(String),

    /// A device type code is not recognised.
    #[error("invalid device type {0:?}")]
    InvalidDeviceType(String),

    /// A device address is out of range or not a number.
    #[error("invalid device address {0:?}, expected 0..=127 or `*`")]
    InvalidAddress(String),

    /// A config value could not be converted to the expected type.
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: String, value: String },

    /// A required config entry is absent.
    #[error("missing config entry `{0}`")]
    MissingEntry(String),
}
