//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the browser.
//! They are defined here (in `app`) so that both the pages and the adapters
//! can depend on them without creating circular dependencies. The DOM port
//! lives in `gateway-ui-view` as `Node`.

pub mod location;
pub mod storage;
pub mod timer;
pub mod transport;

pub use location::Location;
pub use storage::Storage;
pub use timer::Timer;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
