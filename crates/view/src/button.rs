//! Push button running an async action.

use std::future::Future;
use std::rc::Rc;

use crate::attrs::Attrs;
use crate::node::{EventKind, Node};
use crate::view::{Control, View, widget};

/// `<button type="button">`.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView<N> {
    view: View<N>,
}

widget!(ButtonView, view: View);

impl<N: Node> Control<N> for ButtonView<N> {}

/// Re-enables the button however the action ends.
struct Reenable<N: Node>(ButtonView<N>);

impl<N: Node> Drop for Reenable<N> {
    fn drop(&mut self) {
        self.0.enable();
    }
}

impl<N: Node> ButtonView<N> {
    #[must_use]
    pub fn create(owner: &N, text: &str, attrs: &Attrs) -> Self {
        let view = View::element(owner, "button", attrs, text);
        view.set_attribute("type", Some("button"));
        Self { view }
    }

    /// Run `action` on every click.
    ///
    /// The button is disabled while the action is in flight, so a second
    /// click cannot start it twice, and enabled again once the action
    /// completes, fails or is dropped. A failure is logged and shown to the
    /// user in an alert.
    pub fn on_click<F, Fut>(self, action: F) -> Self
    where
        F: Fn(ButtonView<N>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        let action = Rc::new(action);
        let this = self.clone();
        self.view.node().listen(
            EventKind::Click,
            Box::new(move || {
                if !this.is_enabled() {
                    return;
                }
                this.disable();
                let guard = Reenable(this.clone());
                let running = action(this.clone());
                this.view.spawn(async move {
                    if let Err(error) = running.await {
                        tracing::warn!(error = %error, "button action failed");
                        guard.0.view.node().alert(&format!("{error:#}"));
                    }
                });
            }),
        );
        self
    }
}
