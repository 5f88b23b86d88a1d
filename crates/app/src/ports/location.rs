//! Location port: the browser-visible address of the UI.

/// The part of `window.location` the UI reads and writes.
pub trait Location {
    /// Current fragment including the leading `#`, empty when there is none.
    fn hash(&self) -> String;
    /// Replace the fragment; `key` comes without `#`.
    fn set_hash(&self, key: &str);
    fn hostname(&self) -> String;
}
