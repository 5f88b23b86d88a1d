//! Construction attributes.

use std::fmt::Display;

use crate::node::Node;

/// Ordered attribute list applied when a view is created.
///
/// ```
/// use gateway_ui_view::Attrs;
///
/// let attrs = Attrs::new().with("min", 1).with("max", 4).flag("required");
/// assert_eq!(attrs.get("max"), Some("4"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier value.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    /// Boolean attribute such as `required` or `disabled`.
    #[must_use]
    pub fn flag(self, name: &str) -> Self {
        self.with(name, "")
    }

    /// Boolean attribute present only when `enabled`.
    #[must_use]
    pub fn flag_if(self, name: &str, enabled: bool) -> Self {
        if enabled { self.flag(name) } else { self }
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.with("class", class)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn apply<N: Node>(&self, node: &N) {
        for (name, value) in &self.entries {
            node.set_attribute(name, value);
        }
    }
}
