//! # gateway-ui-domain
//!
//! Pure domain model for the WiFi gateway UI.
//!
//! ## Responsibilities
//! - Typed payloads of the gateway REST API (definitions, datapoints,
//!   status, devices, codecs and converters)
//! - **Sources** (`device type / address`) and **data keys** used in API paths
//! - The semicolon/newline **config text format** and the typed settings
//!   carried by it
//! - Building `/data` query strings and formatting values for display
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Transports, timers and the DOM are ports defined in `gateway-ui-app`
//! and `gateway-ui-view`.

pub mod error;

pub mod config_text;
pub mod conversion;
pub mod data_config;
pub mod datapoint;
pub mod definition;
pub mod query;
pub mod settings;
pub mod source;
pub mod status;
