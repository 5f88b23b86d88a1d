//! # gateway-ui-adapter-virtual
//!
//! In-memory implementations of every port, for tests and demos without a
//! browser.
//!
//! ## Provided adapters
//!
//! | Port | Adapter | Behaviour |
//! |------|---------|-----------|
//! | `Node` | [`VNode`] | Element tree with live form state, dialogs and an event loop |
//! | `Transport` | [`ScriptedTransport`] | Canned replies per method and URL; `404` otherwise |
//! | `Timer` | [`VirtualTimer`] | Sleeps complete when the test advances the clock |
//! | `Location` | [`MemoryLocation`] | Hash and hostname, with hash history |
//! | `Storage` | [`MemoryStorage`] | Shared map |
//!
//! ## Dependency rule
//!
//! Depends on `gateway-ui-app` (port traits) and `gateway-ui-view` only.

pub mod dom;
pub mod location;
pub mod timer;
pub mod transport;

pub use dom::{VNode, VirtualDocument, VirtualFile};
pub use location::{MemoryLocation, MemoryStorage};
pub use timer::{VirtualSleep, VirtualTimer};
pub use transport::ScriptedTransport;
