//! # gateway-ui-view
//!
//! Typed view layer for the gateway UI.
//!
//! ## Responsibilities
//! - Define the [`Node`] **port**: one handle on a DOM-like element plus the
//!   few platform services a view needs (task spawning, dialogs, clipboard)
//! - Wrap nodes into views that own exactly one element each:
//!   [`View`], [`ContainerView`] and the form controls built on top
//! - Keep page code away from raw element manipulation: controls expose
//!   typed accessors (`bool` for checkboxes, selected key for selects, ...)
//!
//! ## Dependency rule
//! Depends on no other workspace crate. Adapters (`web`, `virtual`)
//! implement [`Node`]; the application layer builds pages from these views.

pub mod attrs;
pub mod button;
pub mod container;
pub mod content;
pub mod controls;
pub mod fieldset;
pub mod node;
pub mod table;
pub mod view;

pub use attrs::Attrs;
pub use button::ButtonView;
pub use container::ContainerView;
pub use content::{DefinitionListView, LabelView, LoaderView, ModalView, ProgressView};
pub use controls::{
    CheckboxView, FileView, NumberView, SelectOption, SelectView, TextAreaView, TextView,
};
pub use fieldset::FieldsetView;
pub use node::{EventKind, Node, ViewError};
pub use table::{Cell, RowView, TableView};
pub use view::{Control, View, Widget};
