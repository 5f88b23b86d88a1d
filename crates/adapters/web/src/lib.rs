//! # gateway-ui-adapter-web
//!
//! Browser implementations of every port.
//!
//! | Port | Adapter | Backed by |
//! |------|---------|-----------|
//! | `Node` | [`WebNode`] | `web_sys::Element`, `alert`/`confirm`/`prompt`, async clipboard |
//! | `Transport` | [`FetchTransport`] | `gloo-net` fetch with an abort signal |
//! | `Timer` | [`BrowserTimer`] | `gloo-timers` timeouts |
//! | `Location` | [`BrowserLocation`] | `window.location` and `popstate` |
//! | `Storage` | [`LocalStorage`] | `window.localStorage` |
//!
//! [`ConsoleMakeWriter`] routes `tracing` output to the devtools console.
//!
//! ## Dependency rule
//!
//! Depends on `gateway-ui-app` (port traits) and `gateway-ui-view` only.

pub mod console;
pub mod dom;
pub mod location;
pub mod timer;
pub mod transport;

pub use console::ConsoleMakeWriter;
pub use dom::WebNode;
pub use location::{BrowserLocation, LocalStorage};
pub use timer::BrowserTimer;
pub use transport::FetchTransport;
