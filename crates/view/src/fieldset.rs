//! Fieldset: a labelled group of controls enabled, disabled and validated
//! as a whole.

use crate::attrs::Attrs;
use crate::container::ContainerView;
use crate::node::Node;
use crate::view::{Control, Widget, widget};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldsetView<N> {
    container: ContainerView<N>,
}

widget!(FieldsetView, container: ContainerView);

/// Disabling the fieldset disables every descendant control. A fieldset is
/// never validated natively, so `validate` checks each of its controls.
impl<N: Node> Control<N> for FieldsetView<N> {
    fn validate(&self) -> bool {
        self.view()
            .node()
            .form_controls()
            .iter()
            .all(Node::check_validity)
    }
}

impl<N: Node> FieldsetView<N> {
    #[must_use]
    pub fn create(owner: &N, legend: Option<&str>, attrs: &Attrs) -> Self {
        let container = ContainerView::create(owner, "fieldset", attrs);
        if let Some(legend) = legend {
            container.add_element("legend", &Attrs::new(), legend);
        }
        Self { container }
    }
}
