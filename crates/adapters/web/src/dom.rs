//! [`Node`] over `web_sys::Element`.

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, FileList, HtmlElement, HtmlFieldSetElement, HtmlInputElement,
    HtmlOptionElement, HtmlSelectElement, HtmlTextAreaElement, Window,
};

use gateway_ui_view::{EventKind, Node, ViewError};

/// Handle on one element of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct WebNode {
    element: Element,
}

impl WebNode {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// The first element of the current document matching `selector`.
    #[must_use]
    pub fn query(selector: &str) -> Option<Self> {
        web_sys::window()?
            .document()?
            .query_selector(selector)
            .ok()
            .flatten()
            .map(Self::new)
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    fn document(&self) -> Document {
        match self.element.owner_document() {
            Some(document) => document,
            None => wasm_bindgen::throw_str("element has no owner document"),
        }
    }

    fn window() -> Window {
        match web_sys::window() {
            Some(window) => window,
            None => wasm_bindgen::throw_str("no global window"),
        }
    }

    fn warn_on_error(operation: &str, result: Result<(), JsValue>) {
        if let Err(error) = result {
            tracing::warn!(operation, error = ?error, "dom operation failed");
        }
    }
}

impl Node for WebNode {
    type Files = FileList;

    fn create_element(&self, tag: &str) -> Self {
        match self.document().create_element(tag) {
            Ok(element) => Self::new(element),
            Err(error) => wasm_bindgen::throw_val(error),
        }
    }

    fn append_child(&self, child: &Self) {
        Self::warn_on_error(
            "appendChild",
            self.element.append_child(&child.element).map(|_| ()),
        );
    }

    fn remove_children(&self) {
        self.element.set_text_content(None);
    }

    fn remove(&self) {
        self.element.remove();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        Self::warn_on_error("setAttribute", self.element.set_attribute(name, value));
    }

    fn remove_attribute(&self, name: &str) {
        Self::warn_on_error("removeAttribute", self.element.remove_attribute(name));
    }

    fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        }
    }

    fn checked(&self) -> bool {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn set_selected(&self, selected: bool) {
        if let Some(option) = self.element.dyn_ref::<HtmlOptionElement>() {
            option.set_selected(selected);
        }
    }

    fn set_selected_index(&self, index: i32) {
        if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.set_selected_index(index);
        }
    }

    fn check_validity(&self) -> bool {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.check_validity()
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.check_validity()
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.check_validity()
        } else {
            true
        }
    }

    fn form_controls(&self) -> Vec<Self> {
        let Some(fieldset) = self.element.dyn_ref::<HtmlFieldSetElement>() else {
            return Vec::new();
        };
        let controls = fieldset.elements();
        (0..controls.length())
            .filter_map(|index| controls.item(index))
            .map(Self::new)
            .collect()
    }

    fn files(&self) -> Option<FileList> {
        self.element.dyn_ref::<HtmlInputElement>()?.files()
    }

    fn scroll_to_bottom(&self) {
        self.element.set_scroll_top(self.element.scroll_height());
    }

    fn set_hidden(&self, hidden: bool) {
        if let Some(element) = self.element.dyn_ref::<HtmlElement>() {
            element.set_hidden(hidden);
        }
    }

    fn listen(&self, event: EventKind, handler: Box<dyn FnMut()>) {
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        Self::warn_on_error(
            "addEventListener",
            self.element
                .add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref()),
        );
        // listeners live as long as the page
        closure.forget();
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn alert(&self, message: &str) {
        Self::warn_on_error("alert", Self::window().alert_with_message(message));
    }

    fn confirm(&self, message: &str) -> bool {
        Self::window()
            .confirm_with_message(message)
            .unwrap_or(false)
    }

    fn prompt(&self, message: &str) -> Option<String> {
        Self::window().prompt_with_message(message).ok().flatten()
    }

    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ViewError>> {
        let clipboard = Self::window().navigator().clipboard();
        let text = text.to_string();
        Box::pin(async move {
            if clipboard.is_undefined() {
                return Err(ViewError::ClipboardUnavailable);
            }
            JsFuture::from(clipboard.write_text(&text))
                .await
                .map(|_| ())
                .map_err(|error| ViewError::Platform(format!("{error:?}")))
        })
    }
}
