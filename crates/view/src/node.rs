//! Node port: the one seam between views and the rendering platform.
//!
//! A [`Node`] is a cheap, clonable handle on a single element. The browser
//! adapter wraps `web_sys::Element`; the virtual adapter keeps an in-memory
//! tree so views and pages can be exercised without a browser.

use futures::future::LocalBoxFuture;

/// DOM events views subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Change,
    Click,
    Focus,
    Blur,
}

impl EventKind {
    /// DOM event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

/// Platform failures surfaced by the few fallible node services.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The platform offers no clipboard (insecure context, old browser).
    #[error("clipboard is not available")]
    ClipboardUnavailable,
    /// The platform rejected the operation.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Handle on one element of a document.
///
/// Element operations never fail: malformed values are handed to the
/// platform as-is and surface there. Form properties (`value`, `checked`,
/// selection) follow the live-property semantics of HTML controls rather
/// than their content attributes.
pub trait Node: Clone + 'static {
    /// Platform representation of the files chosen in a file input.
    type Files: Clone;

    /// Create a detached element in the same document.
    fn create_element(&self, tag: &str) -> Self;
    fn append_child(&self, child: &Self);
    /// Remove every child, elements and text alike.
    fn remove_children(&self);
    /// Detach this element from its parent.
    fn remove(&self);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// Current value of an input, textarea or select (empty otherwise).
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    /// Selectedness of an `<option>`.
    fn set_selected(&self, selected: bool);
    /// `selectedIndex` of a `<select>`; `-1` clears the selection.
    fn set_selected_index(&self, index: i32);
    /// Native constraint validation of this element alone. Elements barred
    /// from validation, fieldsets and disabled controls among them, are
    /// always valid.
    fn check_validity(&self) -> bool;
    /// Listed controls of a fieldset (`HTMLFieldSetElement.elements`) in
    /// tree order, nested fieldsets included. Empty for other elements.
    fn form_controls(&self) -> Vec<Self>;
    fn files(&self) -> Option<Self::Files>;
    fn scroll_to_bottom(&self);
    fn set_hidden(&self, hidden: bool);

    /// Register a handler for `event`. Handlers live as long as the element.
    fn listen(&self, event: EventKind, handler: Box<dyn FnMut()>);

    /// Run `task` on the document's event loop.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn prompt(&self, message: &str) -> Option<String>;
    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ViewError>>;
}
