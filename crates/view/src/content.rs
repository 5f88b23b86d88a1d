//! Non-interactive views: definition lists, labels, progress bars, modal
//! overlays and the loading spinner.

use crate::attrs::Attrs;
use crate::container::ContainerView;
use crate::node::Node;
use crate::view::{View, widget};

/// `<dl>` built from term/description pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionListView<N> {
    view: View<N>,
}

widget!(DefinitionListView, view: View);

impl<N: Node> DefinitionListView<N> {
    #[must_use]
    pub fn create(owner: &N, attrs: &Attrs) -> Self {
        Self {
            view: View::element(owner, "dl", attrs, ""),
        }
    }

    /// Append a `<dt>`/`<dd>` pair, both taken as HTML.
    pub fn add(&self, term: &str, description: &str) {
        self.view.add_element("dt", &Attrs::new(), term);
        self.view.add_element("dd", &Attrs::new(), description);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelView<N> {
    view: View<N>,
}

widget!(LabelView, view: View);

impl<N: Node> LabelView<N> {
    #[must_use]
    pub fn create(owner: &N, text: &str, attrs: &Attrs) -> Self {
        Self {
            view: View::element(owner, "label", attrs, text),
        }
    }

    /// Bind the label to `target` through its (possibly generated) id.
    pub fn set_for(&self, target: &View<N>) {
        self.view.set_attribute("for", Some(&target.id()));
    }

    pub fn clear_for(&self) {
        self.view.set_attribute("for", None);
    }
}

/// `<progress>`; indeterminate while it has no value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView<N> {
    view: View<N>,
}

widget!(ProgressView, view: View);

impl<N: Node> ProgressView<N> {
    #[must_use]
    pub fn create(owner: &N, attrs: &Attrs) -> Self {
        Self {
            view: View::element(owner, "progress", attrs, ""),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.view
            .attribute("value")
            .and_then(|value| value.parse().ok())
    }

    pub fn set_value(&self, value: f64) {
        self.view.set_attribute("value", Some(&value.to_string()));
    }

    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        self.view.attribute("value").is_none()
    }

    /// Switching to indeterminate drops the current value.
    pub fn set_indeterminate(&self, indeterminate: bool) {
        if indeterminate {
            self.view.set_attribute("value", None);
        } else if self.is_indeterminate() {
            self.set_value(0.0);
        }
    }
}

/// Overlay container, shown and hidden as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView<N> {
    container: ContainerView<N>,
}

widget!(ModalView, container: ContainerView);

impl<N: Node> ModalView<N> {
    #[must_use]
    pub fn create(owner: &N) -> Self {
        Self {
            container: ContainerView::create(owner, "div", &Attrs::new().class("modal")),
        }
    }
}

/// Busy spinner.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderView<N> {
    view: View<N>,
}

widget!(LoaderView, view: View);

impl<N: Node> LoaderView<N> {
    #[must_use]
    pub fn create(owner: &N) -> Self {
        Self {
            view: View::element(owner, "div", &Attrs::new().class("loader centered"), ""),
        }
    }
}
