//! The five screens of the UI and the helpers they share.
//!
//! Every page renders into the region handed to `enter` and keeps only
//! view handles and poll handles; `leave` cancels its background work.

mod config;
mod data;
mod definitions;
mod status;
mod system;

use std::fmt;
use std::future::Future;

use chrono::{SecondsFormat, Utc};

use gateway_ui_view::{Attrs, ContainerView, Node, View};

pub use config::ConfigPage;
pub use data::DataPage;
pub use definitions::DefinitionsPage;
pub use status::StatusPage;
pub use system::SystemPage;

/// Escape text for inclusion in HTML content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// The `<p>` under a block telling how its last load went.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StateLine<N> {
    view: View<N>,
}

impl<N: Node> StateLine<N> {
    pub(crate) fn create(container: &ContainerView<N>) -> Self {
        Self {
            view: container.p("", Attrs::new()),
        }
    }

    pub(crate) fn loading(&self) {
        self.view.set_attribute("class", None);
        self.view.set_content("<small>Loading...</small>");
    }

    pub(crate) fn updated(&self) {
        self.view.set_attribute("class", None);
        self.view.set_content(&format!(
            "<small>Updated on {}.</small>",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
    }

    pub(crate) fn notice(&self, message: &str) {
        self.view.set_attribute("class", Some("notice"));
        self.view.set_text(message);
    }

    /// Show `Loading...`, await `load` and report a failure as a notice.
    ///
    /// On success the caller renders the value and calls [`Self::updated`].
    pub(crate) async fn track<T, E>(
        &self,
        what: &str,
        load: impl Future<Output = Result<T, E>>,
    ) -> Option<T>
    where
        E: fmt::Display,
    {
        self.loading();
        match load.await {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%error, what, "refresh failed");
                self.notice(&error.to_string());
                None
            }
        }
    }
}

/// Render a load failure in place of the content it was meant for.
pub(crate) fn notice<N: Node>(container: &ContainerView<N>, error: &impl fmt::Display) -> View<N> {
    container.p(&escape_html(&error.to_string()), Attrs::new().class("notice"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use gateway_ui_adapter_virtual::dom::VirtualDocument;

    #[test]
    fn should_escape_markup() {
        assert_eq!(
            escape_html(r#"<b class="x">Tom & 'Jerry'</b>"#),
            r#"&lt;b class="x"&gt;Tom &amp; 'Jerry'&lt;/b&gt;"#
        );
        assert_eq!(escape_html("21.5 °C"), "21.5 °C");
    }

    #[test]
    fn should_show_escaped_text_verbatim() {
        let document = VirtualDocument::new();
        let cell = document.create_element("td");
        let name = r#"Tom & "Jerry" <3 &#39;"#;
        cell.set_inner_html(&escape_html(name));
        assert_eq!(cell.text(), name);
    }

    #[test]
    fn should_cycle_state_line_through_loading_updated_and_notice() {
        let document = VirtualDocument::new();
        let container = ContainerView::new(document.create_element("div"));
        let state = StateLine::create(&container);

        state.loading();
        assert_eq!(container.content(), "<p><small>Loading...</small></p>");

        state.notice("HTTP error: 500 Internal Server Error.");
        assert_eq!(
            container.content(),
            r#"<p class="notice">HTTP error: 500 Internal Server Error.</p>"#
        );

        state.updated();
        let content = container.content();
        assert!(content.starts_with("<p><small>Updated on "), "{content}");
        assert!(content.ends_with("Z.</small></p>"), "{content}");
    }

    #[test]
    fn should_report_failed_load_as_notice() {
        let document = VirtualDocument::new();
        let container = ContainerView::new(document.create_element("div"));
        let state = StateLine::create(&container);

        let loaded: Option<u8> =
            document.block_on(state.track("answer", async { Err::<u8, _>("gateway down") }));
        assert_eq!(loaded, None);
        assert_eq!(container.content(), r#"<p class="notice">gateway down</p>"#);
    }
}
