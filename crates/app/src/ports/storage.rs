//! Storage port: small string values persisted by the browser.
//!
//! Used for the cached development gateway address and for configuration
//! overrides.

pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}
