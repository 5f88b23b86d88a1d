//! Container view and its factory methods.
//!
//! Every factory constructs the child view, appends it and returns it for
//! further configuration.

use crate::attrs::Attrs;
use crate::button::ButtonView;
use crate::content::{DefinitionListView, LabelView, LoaderView, ModalView, ProgressView};
use crate::controls::{
    CheckboxView, FileView, NumberView, SelectOption, SelectView, TextAreaView, TextView,
};
use crate::fieldset::FieldsetView;
use crate::node::Node;
use crate::table::TableView;
use crate::view::{View, widget};

/// A view that builds children.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerView<N> {
    view: View<N>,
}

widget!(ContainerView, view: View);

impl<N: Node> ContainerView<N> {
    #[must_use]
    pub fn new(node: N) -> Self {
        Self {
            view: View::new(node),
        }
    }

    /// Create a detached `<tag>` container.
    #[must_use]
    pub fn create(owner: &N, tag: &str, attrs: &Attrs) -> Self {
        Self {
            view: View::element(owner, tag, attrs, ""),
        }
    }

    fn owner(&self) -> &N {
        self.view.node()
    }

    pub fn h1(&self, content: &str, attrs: Attrs) -> View<N> {
        self.add_element("h1", &attrs, content)
    }

    pub fn h2(&self, content: &str, attrs: Attrs) -> View<N> {
        self.add_element("h2", &attrs, content)
    }

    pub fn link(&self, content: &str, attrs: Attrs) -> View<N> {
        self.add_element("a", &attrs, content)
    }

    pub fn p(&self, content: &str, attrs: Attrs) -> View<N> {
        self.add_element("p", &attrs, content)
    }

    pub fn pre(&self, content: &str, attrs: Attrs) -> View<N> {
        self.add_element("pre", &attrs, content)
    }

    pub fn dl(&self, attrs: Attrs) -> DefinitionListView<N> {
        self.add_view(DefinitionListView::create(self.owner(), &attrs))
    }

    pub fn table(&self, attrs: Attrs) -> TableView<N> {
        self.add_view(TableView::create(self.owner(), &attrs))
    }

    pub fn checkbox(&self, label: Option<&LabelView<N>>, attrs: Attrs) -> CheckboxView<N> {
        self.add_view(CheckboxView::create(self.owner(), label, &attrs))
    }

    pub fn select<O>(
        &self,
        label: Option<&LabelView<N>>,
        options: impl IntoIterator<Item = O>,
        attrs: Attrs,
    ) -> SelectView<N>
    where
        O: Into<SelectOption>,
    {
        let select = self.add_view(SelectView::create(self.owner(), label, &attrs));
        select.set_options(options);
        select
    }

    pub fn number(&self, label: Option<&LabelView<N>>, attrs: Attrs) -> NumberView<N> {
        self.add_view(NumberView::create(self.owner(), label, &attrs))
    }

    pub fn text(&self, label: Option<&LabelView<N>>, attrs: Attrs) -> TextView<N> {
        self.add_view(TextView::create(self.owner(), label, &attrs))
    }

    pub fn textarea(&self, label: Option<&LabelView<N>>, attrs: Attrs) -> TextAreaView<N> {
        self.add_view(TextAreaView::create(self.owner(), label, &attrs))
    }

    pub fn file(&self, label: Option<&LabelView<N>>, attrs: Attrs) -> FileView<N> {
        self.add_view(FileView::create(self.owner(), label, &attrs))
    }

    /// A `<label>`; controls created with it set its `for` attribute.
    pub fn label(&self, text: &str, attrs: Attrs) -> LabelView<N> {
        self.add_view(LabelView::create(self.owner(), text, &attrs))
    }

    pub fn button(&self, text: &str, attrs: Attrs) -> ButtonView<N> {
        self.add_view(ButtonView::create(self.owner(), text, &attrs))
    }

    pub fn fieldset(&self, legend: Option<&str>, attrs: Attrs) -> FieldsetView<N> {
        self.add_view(FieldsetView::create(self.owner(), legend, &attrs))
    }

    /// A `<section>` opened by an `<h2>` title.
    pub fn section(&self, title: &str, attrs: Attrs) -> ContainerView<N> {
        let section = self.add_view(Self::create(self.owner(), "section", &attrs));
        section.h2(title, Attrs::new());
        section
    }

    /// A plain `<div>` container.
    pub fn block(&self, attrs: Attrs) -> ContainerView<N> {
        self.add_view(Self::create(self.owner(), "div", &attrs))
    }

    pub fn progress(&self, attrs: Attrs) -> ProgressView<N> {
        self.add_view(ProgressView::create(self.owner(), &attrs))
    }

    pub fn modal(&self) -> ModalView<N> {
        self.add_view(ModalView::create(self.owner()))
    }

    pub fn loader(&self) -> LoaderView<N> {
        self.add_view(LoaderView::create(self.owner()))
    }
}
