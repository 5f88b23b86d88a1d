//! Base view and the capabilities shared by every wrapper.

use std::future::Future;

use crate::attrs::Attrs;
use crate::node::Node;

/// Owns exactly one element.
///
/// Cloning a view clones the handle, not the element: both clones address
/// the same node. Views are destroyed by detaching them from their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct View<N> {
    node: N,
}

impl<N: Node> View<N> {
    /// Wrap an existing node, e.g. the document's `<nav>` or `<main>`.
    #[must_use]
    pub fn new(node: N) -> Self {
        Self { node }
    }

    /// Create a detached `<tag>` element owned by the same document as `owner`.
    #[must_use]
    pub fn element(owner: &N, tag: &str, attrs: &Attrs, content: &str) -> Self {
        let node = owner.create_element(tag);
        attrs.apply(&node);
        if !content.is_empty() {
            node.set_inner_html(content);
        }
        Self { node }
    }

    #[must_use]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The element id, generated on first access when the element has none.
    #[must_use]
    pub fn id(&self) -> String {
        if let Some(id) = self.node.attribute("id").filter(|id| !id.is_empty()) {
            return id;
        }
        let id = format!("_generated-{}", uuid::Uuid::new_v4());
        self.node.set_attribute("id", &id);
        id
    }

    /// Remove every child.
    pub fn clear(&self) {
        self.node.remove_children();
    }

    /// Detach from the parent view.
    pub fn remove(&self) {
        self.node.remove();
    }

    /// Set an attribute, or remove it when `value` is `None`.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => self.node.set_attribute(name, value),
            None => self.node.remove_attribute(name),
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node.attribute(name)
    }

    /// Inner HTML.
    #[must_use]
    pub fn content(&self) -> String {
        self.node.inner_html()
    }

    pub fn set_content(&self, html: &str) {
        self.node.set_inner_html(html);
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.node.text()
    }

    pub fn set_text(&self, text: &str) {
        self.node.set_text(text);
    }

    /// Append `child` and hand it back for further configuration.
    pub fn add_view<W: Widget<N>>(&self, child: W) -> W {
        self.node.append_child(child.view().node());
        child
    }

    /// Append a plain `<tag>` element holding `content` as HTML.
    pub fn add_element(&self, tag: &str, attrs: &Attrs, content: &str) -> View<N> {
        self.add_view(Self::element(&self.node, tag, attrs, content))
    }

    pub fn scroll_to_bottom(&self) {
        self.node.scroll_to_bottom();
    }

    pub fn show(&self) {
        self.node.set_hidden(false);
    }

    pub fn hide(&self) {
        self.node.set_hidden(true);
    }

    /// Run `task` on the event loop owning this view.
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        self.node.spawn_local(Box::pin(task));
    }
}

/// Anything that wraps a [`View`].
pub trait Widget<N: Node> {
    fn view(&self) -> &View<N>;
}

impl<N: Node> Widget<N> for View<N> {
    fn view(&self) -> &View<N> {
        self
    }
}

/// Form controls: can be disabled and validated natively.
pub trait Control<N: Node>: Widget<N> {
    fn enable(&self) {
        self.view().set_attribute("disabled", None);
    }

    fn disable(&self) {
        self.view().set_attribute("disabled", Some(""));
    }

    #[must_use]
    fn is_enabled(&self) -> bool {
        self.view().attribute("disabled").is_none()
    }

    /// Whether the current value satisfies the declared constraints
    /// (`required`, `min`, `max`, `pattern`, `maxlength`).
    #[must_use]
    fn validate(&self) -> bool {
        self.view().node().check_validity()
    }
}

/// Implements [`Widget`] and `Deref` to the wrapped view for a
/// `struct Name<N> { field: Inner<N>, .. }`.
macro_rules! widget {
    ($name:ident, $field:ident: $target:ident) => {
        impl<N: $crate::node::Node> $crate::view::Widget<N> for $name<N> {
            fn view(&self) -> &$crate::view::View<N> {
                $crate::view::Widget::view(&self.$field)
            }
        }

        impl<N: $crate::node::Node> std::ops::Deref for $name<N> {
            type Target = $target<N>;

            fn deref(&self) -> &Self::Target {
                &self.$field
            }
        }
    };
}

pub(crate) use widget;
