//! In-memory location and storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gateway_ui_app::ports::{Location, Storage};

#[derive(Debug, Default)]
struct LocationState {
    hostname: String,
    hash: String,
    history: Vec<String>,
}

/// A `window.location` that remembers every hash it was given.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    state: Rc<RefCell<LocationState>>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(hostname: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(LocationState {
                hostname: hostname.to_string(),
                ..LocationState::default()
            })),
        }
    }

    /// Start at `#key`.
    #[must_use]
    pub fn with_hash(self, key: &str) -> Self {
        self.state.borrow_mut().hash = format!("#{key}");
        self
    }

    /// Keys passed to `set_hash`, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        self.state.borrow().hash.clone()
    }

    fn set_hash(&self, key: &str) {
        let mut state = self.state.borrow_mut();
        state.hash = if key.is_empty() {
            String::new()
        } else {
            format!("#{key}")
        };
        state.history.push(key.to_string());
    }

    fn hostname(&self) -> String {
        self.state.borrow().hostname.clone()
    }
}

/// `localStorage` backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.set_item(key, value);
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefix_hash_and_record_history() {
        let location = MemoryLocation::new("gateway.local").with_hash("status");
        assert_eq!(location.hash(), "#status");
        location.set_hash("data");
        location.set_hash("");
        assert_eq!(location.hash(), "");
        assert_eq!(location.history(), ["data", ""]);
        assert_eq!(location.hostname(), "gateway.local");
    }

    #[test]
    fn should_share_storage_between_clones() {
        let storage = MemoryStorage::new();
        storage.clone().set_item("address", "http://10.0.0.2");
        assert_eq!(storage.get_item("address").as_deref(), Some("http://10.0.0.2"));
        assert_eq!(storage.get_item("missing"), None);
    }
}
