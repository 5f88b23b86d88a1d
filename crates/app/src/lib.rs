//! # gateway-ui-app
//!
//! Application layer: **port definitions**, the gateway client and the
//! screens built on it.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Transport`: send one HTTP request
//!   - `Timer`: sleep for a duration
//!   - `Location`: read and write the location hash
//!   - `Storage`: persistent key/value settings
//! - Issue requests with a per-call timeout (`HttpClient`) and map every
//!   gateway endpoint to a typed method (`GatewayApi`)
//! - Route location hashes to pages with an enter/leave lifecycle
//!   (`Navigation`) and run cancellable refresh loops (`Poller`)
//! - Render the Status, Data, Configuration, Definitions and System pages
//! - Load the UI configuration and wire everything at start-up
//!
//! ## Dependency rule
//! Depends on `gateway-ui-domain` and `gateway-ui-view` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod api;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod navigation;
pub mod pages;
pub mod poller;
pub mod ports;
