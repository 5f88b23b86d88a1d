//! Form controls with typed accessors and change callbacks.
//!
//! Each control binds the label it was created with (`for` = control id)
//! and accepts a change callback receiving the new value and the control.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::attrs::Attrs;
use crate::content::LabelView;
use crate::node::{EventKind, Node};
use crate::view::{Control, View, widget};

fn input<N: Node>(
    owner: &N,
    tag: &str,
    kind: Option<&str>,
    label: Option<&LabelView<N>>,
    attrs: &Attrs,
) -> View<N> {
    let view = View::element(owner, tag, attrs, "");
    if let Some(kind) = kind {
        view.set_attribute("type", Some(kind));
    }
    if let Some(label) = label {
        label.set_for(&view);
    }
    view
}

/// `<input type="checkbox">`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxView<N> {
    view: View<N>,
}

widget!(CheckboxView, view: View);

impl<N: Node> Control<N> for CheckboxView<N> {}

impl<N: Node> CheckboxView<N> {
    #[must_use]
    pub fn create(owner: &N, label: Option<&LabelView<N>>, attrs: &Attrs) -> Self {
        Self {
            view: input(owner, "input", Some("checkbox"), label, attrs),
        }
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.view.node().checked()
    }

    pub fn set_checked(&self, checked: bool) {
        self.view.node().set_checked(checked);
    }

    /// Invoke `callback` with the checked state after every user change.
    pub fn on_change(self, callback: impl Fn(bool, &Self) + 'static) -> Self {
        let this = self.clone();
        self.view.node().listen(
            EventKind::Change,
            Box::new(move || callback(this.is_checked(), &this)),
        );
        self
    }
}

/// Text-valued controls sharing the same accessors.
macro_rules! text_control {
    ($(#[doc = $doc:expr])* $name:ident, $tag:literal, $kind:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<N> {
            view: View<N>,
        }

        widget!($name, view: View);

        impl<N: Node> Control<N> for $name<N> {}

        impl<N: Node> $name<N> {
            #[must_use]
            pub fn create(owner: &N, label: Option<&LabelView<N>>, attrs: &Attrs) -> Self {
                Self {
                    view: input(owner, $tag, $kind, label, attrs),
                }
            }

            #[must_use]
            pub fn value(&self) -> String {
                self.view.node().value()
            }

            pub fn set_value(&self, value: impl fmt::Display) {
                self.view.node().set_value(&value.to_string());
            }

            /// Invoke `callback` with the committed value after every user change.
            pub fn on_change(self, callback: impl Fn(String, &Self) + 'static) -> Self {
                let this = self.clone();
                self.view.node().listen(
                    EventKind::Change,
                    Box::new(move || callback(this.value(), &this)),
                );
                self
            }

            /// Invoke `callback` when the control gains (`true`) or loses focus.
            pub fn on_focus_change(self, callback: impl Fn(bool) + 'static) -> Self {
                let callback = Rc::new(callback);
                let on_focus = Rc::clone(&callback);
                self.view
                    .node()
                    .listen(EventKind::Focus, Box::new(move || on_focus(true)));
                self.view
                    .node()
                    .listen(EventKind::Blur, Box::new(move || callback(false)));
                self
            }
        }
    };
}

text_control!(
    /// `<input type="number">`; the value stays text, empty when unset.
    NumberView, "input", Some("number")
);

text_control!(
    /// `<input type="text">`.
    TextView, "input", Some("text")
);

text_control!(TextAreaView, "textarea", None);

impl<N: Node> NumberView<N> {
    /// The value parsed as a number, `None` when empty.
    #[must_use]
    pub fn number<T: std::str::FromStr>(&self) -> Option<T> {
        self.value().trim().parse().ok()
    }
}

/// `<input type="file">`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileView<N> {
    view: View<N>,
}

widget!(FileView, view: View);

impl<N: Node> Control<N> for FileView<N> {}

impl<N: Node> FileView<N> {
    #[must_use]
    pub fn create(owner: &N, label: Option<&LabelView<N>>, attrs: &Attrs) -> Self {
        Self {
            view: input(owner, "input", Some("file"), label, attrs),
        }
    }

    #[must_use]
    pub fn files(&self) -> Option<N::Files> {
        self.view.node().files()
    }

    pub fn on_change(self, callback: impl Fn(Option<N::Files>, &Self) + 'static) -> Self {
        let this = self.clone();
        self.view.node().listen(
            EventKind::Change,
            Box::new(move || callback(this.files(), &this)),
        );
        self
    }
}

/// One entry of a [`SelectView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl fmt::Display, label: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

impl From<String> for SelectOption {
    fn from(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

impl From<&String> for SelectOption {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl<V: fmt::Display, L: fmt::Display> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// `<select>` keyed by option value.
#[derive(Debug, Clone)]
pub struct SelectView<N> {
    view: View<N>,
    options: Rc<RefCell<HashMap<String, N>>>,
}

widget!(SelectView, view: View);

impl<N: Node> Control<N> for SelectView<N> {}

impl<N: Node> SelectView<N> {
    #[must_use]
    pub fn create(owner: &N, label: Option<&LabelView<N>>, attrs: &Attrs) -> Self {
        Self {
            view: input(owner, "select", None, label, attrs),
            options: Rc::default(),
        }
    }

    /// Replace all options. The first one becomes selected.
    pub fn set_options<O: Into<SelectOption>>(&self, options: impl IntoIterator<Item = O>) {
        self.view.clear();
        let mut index = self.options.borrow_mut();
        index.clear();
        for option in options {
            let SelectOption { value, label } = option.into();
            let element = self
                .view
                .add_element("option", &Attrs::new().with("value", &value), &label);
            index.insert(value, element.node().clone());
        }
    }

    /// Value of the selected option, empty when nothing is selected.
    #[must_use]
    pub fn selected(&self) -> String {
        self.view.node().value()
    }

    /// Select the option with value `key`, or clear the selection when
    /// there is none.
    pub fn set_selected(&self, key: &str) {
        match self.options.borrow().get(key) {
            Some(option) => option.set_selected(true),
            None => self.view.node().set_selected_index(-1),
        }
    }

    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.borrow().contains_key(key)
    }

    pub fn on_change(self, callback: impl Fn(String, &Self) + 'static) -> Self {
        let this = self.clone();
        self.view.node().listen(
            EventKind::Change,
            Box::new(move || callback(this.selected(), &this)),
        );
        self
    }
}
