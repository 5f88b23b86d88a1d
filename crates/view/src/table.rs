//! Table and row builders.

use crate::attrs::Attrs;
use crate::node::Node;
use crate::view::{View, Widget, widget};

/// Content of one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<N> {
    /// HTML text.
    Html(String),
    /// A nested view, e.g. an inline checkbox.
    View(View<N>),
}

impl<N: Node> Cell<N> {
    pub fn html(content: impl Into<String>) -> Self {
        Self::Html(content.into())
    }

    pub fn view(widget: &impl Widget<N>) -> Self {
        Self::View(widget.view().clone())
    }
}

impl<N> From<&str> for Cell<N> {
    fn from(content: &str) -> Self {
        Self::Html(content.to_string())
    }
}

impl<N> From<String> for Cell<N> {
    fn from(content: String) -> Self {
        Self::Html(content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView<N> {
    view: View<N>,
}

widget!(TableView, view: View);

impl<N: Node> TableView<N> {
    #[must_use]
    pub fn create(owner: &N, attrs: &Attrs) -> Self {
        Self {
            view: View::element(owner, "table", attrs, ""),
        }
    }

    pub fn add_row(&self, attrs: Attrs) -> RowView<N> {
        self.view
            .add_view(View::element(self.view.node(), "tr", &attrs, ""))
            .into()
    }
}

/// `<tr>` filled cell by cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<N> {
    view: View<N>,
}

widget!(RowView, view: View);

impl<N> From<View<N>> for RowView<N> {
    fn from(view: View<N>) -> Self {
        Self { view }
    }
}

impl<N: Node> RowView<N> {
    fn add_cell(&self, tag: &str, content: Cell<N>, attrs: &Attrs) {
        match content {
            Cell::Html(html) => {
                self.view.add_element(tag, attrs, &html);
            }
            Cell::View(child) => {
                self.view.add_element(tag, attrs, "").add_view(child);
            }
        }
    }

    pub fn add_column(&self, content: impl Into<Cell<N>>, attrs: Attrs) {
        self.add_cell("td", content.into(), &attrs);
    }

    /// One `<td>` per item, all sharing `attrs`.
    pub fn add_columns<C: Into<Cell<N>>>(
        &self,
        contents: impl IntoIterator<Item = C>,
        attrs: Attrs,
    ) {
        for content in contents {
            self.add_cell("td", content.into(), &attrs);
        }
    }

    pub fn add_header(&self, content: impl Into<Cell<N>>, attrs: Attrs) {
        self.add_cell("th", content.into(), &attrs);
    }

    pub fn add_headers<C: Into<Cell<N>>>(
        &self,
        contents: impl IntoIterator<Item = C>,
        attrs: Attrs,
    ) {
        for content in contents {
            self.add_cell("th", content.into(), &attrs);
        }
    }
}
