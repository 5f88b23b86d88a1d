//! Virtual DOM: an in-memory element tree implementing the [`Node`] port.
//!
//! Elements keep attributes in insertion order and render to HTML the way a
//! browser serialises `innerHTML`. Form controls carry live `value`,
//! `checked` and selection state separate from their attributes, and
//! [`Node::check_validity`] follows native constraint validation closely
//! enough for the controls the UI builds.
//!
//! Each [`VirtualDocument`] owns a single-threaded executor standing in for
//! the browser event loop: tasks spawned through any of its nodes run when
//! the test calls [`VirtualDocument::run_until_stalled`] or
//! [`VirtualDocument::block_on`].

mod render;
mod validity;

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;

use gateway_ui_view::{EventKind, Node, ViewError};

/// A file picked in a virtual `<input type="file">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// What the user answers to dialogs and what the page showed.
#[derive(Debug, Default)]
struct Dialogs {
    alerts: Vec<String>,
    confirmations: Vec<String>,
    decline: bool,
    prompts: Vec<String>,
    prompt_answer: Option<String>,
    clipboard: Option<String>,
    clipboard_unavailable: bool,
}

struct DocumentState {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    dialogs: RefCell<Dialogs>,
}

/// Owner of an element tree and of the event loop its tasks run on.
#[derive(Clone)]
pub struct VirtualDocument {
    state: Rc<DocumentState>,
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VirtualDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualDocument")
            .field("dialogs", &self.state.dialogs.borrow())
            .finish_non_exhaustive()
    }
}

impl VirtualDocument {
    #[must_use]
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            state: Rc::new(DocumentState {
                pool: RefCell::new(pool),
                spawner,
                dialogs: RefCell::default(),
            }),
        }
    }

    /// A detached element of this document.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> VNode {
        VNode::new(Rc::clone(&self.state), tag)
    }

    /// Run spawned tasks until none of them can make progress.
    pub fn run_until_stalled(&self) {
        self.state.pool.borrow_mut().run_until_stalled();
    }

    /// Drive `future` to completion, running spawned tasks meanwhile.
    ///
    /// Only for futures that complete without outside help: one waiting on
    /// a virtual timer never returns.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.state.pool.borrow_mut().run_until(future)
    }

    /// Messages shown with `alert`, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.state.dialogs.borrow().alerts.clone()
    }

    /// Questions asked with `confirm`, oldest first.
    #[must_use]
    pub fn confirmations(&self) -> Vec<String> {
        self.state.dialogs.borrow().confirmations.clone()
    }

    /// Answer every following `confirm` with `answer` (default: accept).
    pub fn set_confirm(&self, answer: bool) {
        self.state.dialogs.borrow_mut().decline = !answer;
    }

    /// Questions asked with `prompt`, oldest first.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.state.dialogs.borrow().prompts.clone()
    }

    /// Answer every following `prompt` with `answer`; `None` cancels.
    pub fn set_prompt(&self, answer: Option<&str>) {
        self.state.dialogs.borrow_mut().prompt_answer = answer.map(str::to_string);
    }

    /// Text last written to the clipboard.
    #[must_use]
    pub fn clipboard(&self) -> Option<String> {
        self.state.dialogs.borrow().clipboard.clone()
    }

    pub fn set_clipboard_available(&self, available: bool) {
        self.state.dialogs.borrow_mut().clipboard_unavailable = !available;
    }
}

type Handler = Rc<RefCell<Box<dyn FnMut()>>>;

struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
    parent: Weak<RefCell<Element>>,
    /// Live value of inputs; `None` falls back to the `value` attribute.
    value: Option<String>,
    /// Live checkedness; `None` falls back to the `checked` attribute.
    checked: Option<bool>,
    /// Selectedness of an option; `None` until set.
    selected: Option<bool>,
    /// A select whose `selectedIndex` was set to `-1`.
    no_selection: bool,
    files: Option<Vec<VirtualFile>>,
    scrolled_to_bottom: bool,
    listeners: Vec<(EventKind, Handler)>,
}

enum Child {
    Element(Rc<RefCell<Element>>),
    Text(String),
    /// Markup set through `innerHTML`, kept verbatim.
    Html(String),
}

/// Handle on one virtual element.
#[derive(Clone)]
pub struct VNode {
    element: Rc<RefCell<Element>>,
    document: Rc<DocumentState>,
}

impl PartialEq for VNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.element, &other.element)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.element.borrow();
        f.debug_struct("VNode")
            .field("tag", &element.tag)
            .field("attributes", &element.attributes)
            .finish_non_exhaustive()
    }
}

impl VNode {
    fn new(document: Rc<DocumentState>, tag: &str) -> Self {
        Self {
            element: Rc::new(RefCell::new(Element {
                tag: tag.to_ascii_lowercase(),
                attributes: Vec::new(),
                children: Vec::new(),
                parent: Weak::new(),
                value: None,
                checked: None,
                selected: None,
                no_selection: false,
                files: None,
                scrolled_to_bottom: false,
                listeners: Vec::new(),
            })),
            document,
        }
    }

    fn wrap(&self, element: Rc<RefCell<Element>>) -> Self {
        Self {
            element,
            document: Rc::clone(&self.document),
        }
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.element.borrow().tag.clone()
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.element
            .borrow()
            .attributes
            .iter()
            .any(|(existing, _)| existing == name)
    }

    #[must_use]
    pub fn parent(&self) -> Option<VNode> {
        let parent = self.element.borrow().parent.upgrade()?;
        Some(self.wrap(parent))
    }

    fn ancestors(&self) -> Vec<VNode> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            ancestors.push(node);
        }
        ancestors
    }

    /// Child elements, text and markup children left out.
    #[must_use]
    pub fn children(&self) -> Vec<VNode> {
        let children: Vec<Rc<RefCell<Element>>> = self
            .element
            .borrow()
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(element) => Some(Rc::clone(element)),
                Child::Text(_) | Child::Html(_) => None,
            })
            .collect();
        children.into_iter().map(|element| self.wrap(element)).collect()
    }

    /// Descendant elements in document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<VNode> {
        let mut found = Vec::new();
        for child in self.children() {
            let nested = child.descendants();
            found.push(child);
            found.extend(nested);
        }
        found
    }

    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<VNode> {
        self.descendants()
            .into_iter()
            .filter(|node| node.tag() == tag)
            .collect()
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<VNode> {
        self.descendants()
            .into_iter()
            .find(|node| node.attribute("id").as_deref() == Some(id))
    }

    /// The first button whose text is `text`.
    #[must_use]
    pub fn find_button(&self, text: &str) -> Option<VNode> {
        self.find_all("button")
            .into_iter()
            .find(|button| button.text() == text)
    }

    /// The control a `<label>` with text `text` is bound to.
    #[must_use]
    pub fn control_for_label(&self, text: &str) -> Option<VNode> {
        let label = self
            .find_all("label")
            .into_iter()
            .find(|label| label.text() == text)?;
        self.find_by_id(&label.attribute("for")?)
    }

    /// Text of every cell of a `<tr>`.
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        self.children()
            .into_iter()
            .filter(|cell| matches!(cell.tag().as_str(), "td" | "th"))
            .map(|cell| cell.text())
            .collect()
    }

    /// `(value, text)` of every option of a `<select>`.
    #[must_use]
    pub fn options(&self) -> Vec<(String, String)> {
        self.find_all("option")
            .into_iter()
            .map(|option| (option.option_value(), option.text()))
            .collect()
    }

    #[must_use]
    pub fn outer_html(&self) -> String {
        render::outer_html(&self.element.borrow())
    }

    /// Disabled itself or inside a disabled fieldset.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
            || self
                .ancestors()
                .iter()
                .any(|ancestor| ancestor.tag() == "fieldset" && ancestor.has_attribute("disabled"))
    }

    /// Hidden itself or inside a hidden element.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.has_attribute("hidden")
            || self
                .ancestors()
                .iter()
                .any(|ancestor| ancestor.has_attribute("hidden"))
    }

    #[must_use]
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.element.borrow().scrolled_to_bottom
    }

    fn dispatch(&self, event: EventKind) {
        let handlers: Vec<Handler> = self
            .element
            .borrow()
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        tracing::trace!(event = event.as_str(), handlers = handlers.len(), "dispatch");
        for handler in handlers {
            (handler.borrow_mut())();
        }
    }

    /// Click like a user would; disabled elements ignore it.
    pub fn click(&self) {
        if !self.is_disabled() {
            self.dispatch(EventKind::Click);
        }
    }

    /// Type `value` into an input and commit it.
    pub fn input_value(&self, value: &str) {
        if !self.is_disabled() {
            self.set_value(value);
            self.dispatch(EventKind::Change);
        }
    }

    /// Flip a checkbox.
    pub fn toggle(&self) {
        if !self.is_disabled() {
            self.set_checked(!self.checked());
            self.dispatch(EventKind::Change);
        }
    }

    /// Pick the option with value `value` in a select.
    pub fn choose(&self, value: &str) {
        if !self.is_disabled() {
            self.set_value(value);
            self.dispatch(EventKind::Change);
        }
    }

    /// Pick files in a file input.
    pub fn choose_files(&self, files: Vec<VirtualFile>) {
        if !self.is_disabled() {
            self.element.borrow_mut().files = Some(files);
            self.dispatch(EventKind::Change);
        }
    }

    pub fn focus(&self) {
        self.dispatch(EventKind::Focus);
    }

    pub fn blur(&self) {
        self.dispatch(EventKind::Blur);
    }

    fn detach(&self) {
        let parent = std::mem::take(&mut self.element.borrow_mut().parent);
        if let Some(parent) = parent.upgrade() {
            parent.borrow_mut().children.retain(|child| match child {
                Child::Element(element) => !Rc::ptr_eq(element, &self.element),
                Child::Text(_) | Child::Html(_) => true,
            });
        }
    }

    fn replace_children(&self, children: Vec<Child>) {
        let previous = std::mem::replace(&mut self.element.borrow_mut().children, children);
        for child in previous {
            if let Child::Element(element) = child {
                element.borrow_mut().parent = Weak::new();
            }
        }
        self.element.borrow_mut().no_selection = false;
    }

    fn option_value(&self) -> String {
        self.attribute("value").unwrap_or_else(|| self.text())
    }

    fn owning_select(&self) -> Option<VNode> {
        self.ancestors()
            .into_iter()
            .find(|ancestor| ancestor.tag() == "select")
    }

    fn selected_option(&self) -> Option<VNode> {
        if self.element.borrow().no_selection {
            return None;
        }
        let options = self.find_all("option");
        let selected = |option: &&VNode| option.element.borrow().selected;
        options
            .iter()
            .find(|option| selected(option) == Some(true))
            .or_else(|| {
                options
                    .iter()
                    .find(|option| selected(option).is_none() && option.has_attribute("selected"))
            })
            .or_else(|| options.iter().find(|option| selected(option) != Some(false)))
            .cloned()
    }
}

impl Node for VNode {
    type Files = Vec<VirtualFile>;

    fn create_element(&self, tag: &str) -> Self {
        Self::new(Rc::clone(&self.document), tag)
    }

    fn append_child(&self, child: &Self) {
        child.detach();
        child.element.borrow_mut().parent = Rc::downgrade(&self.element);
        let mut element = self.element.borrow_mut();
        element.children.push(Child::Element(Rc::clone(&child.element)));
        element.no_selection = false;
    }

    fn remove_children(&self) {
        self.replace_children(Vec::new());
    }

    fn remove(&self) {
        self.detach();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element
            .borrow()
            .attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut element = self.element.borrow_mut();
        match element
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing == name)
        {
            Some(entry) => entry.1 = value.to_string(),
            None => element
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&self, name: &str) {
        self.element
            .borrow_mut()
            .attributes
            .retain(|(existing, _)| existing != name);
    }

    fn inner_html(&self) -> String {
        render::inner_html(&self.element.borrow().children)
    }

    fn set_inner_html(&self, html: &str) {
        let children = if html.is_empty() {
            Vec::new()
        } else {
            vec![Child::Html(html.to_string())]
        };
        self.replace_children(children);
    }

    fn text(&self) -> String {
        render::text(&self.element.borrow().children)
    }

    fn set_text(&self, text: &str) {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Child::Text(text.to_string())]
        };
        self.replace_children(children);
    }

    fn value(&self) -> String {
        if self.tag() == "select" {
            return self
                .selected_option()
                .map(|option| option.option_value())
                .unwrap_or_default();
        }
        let live = self.element.borrow().value.clone();
        live.or_else(|| self.attribute("value")).unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        if self.tag() != "select" {
            self.element.borrow_mut().value = Some(value.to_string());
            return;
        }
        match self
            .find_all("option")
            .into_iter()
            .find(|option| option.option_value() == value)
        {
            Some(option) => option.set_selected(true),
            None => self.set_selected_index(-1),
        }
    }

    fn checked(&self) -> bool {
        let live = self.element.borrow().checked;
        live.unwrap_or_else(|| self.has_attribute("checked"))
    }

    fn set_checked(&self, checked: bool) {
        self.element.borrow_mut().checked = Some(checked);
    }

    fn set_selected(&self, selected: bool) {
        if selected {
            if let Some(select) = self.owning_select() {
                for option in select.find_all("option") {
                    option.element.borrow_mut().selected = Some(false);
                }
                select.element.borrow_mut().no_selection = false;
            }
        }
        self.element.borrow_mut().selected = Some(selected);
    }

    fn set_selected_index(&self, index: i32) {
        let options = self.find_all("option");
        match usize::try_from(index).ok().and_then(|index| options.get(index)) {
            Some(option) => option.set_selected(true),
            None => {
                for option in &options {
                    option.element.borrow_mut().selected = Some(false);
                }
                self.element.borrow_mut().no_selection = true;
            }
        }
    }

    fn check_validity(&self) -> bool {
        validity::check(self)
    }

    fn form_controls(&self) -> Vec<Self> {
        validity::form_controls(self)
    }

    fn files(&self) -> Option<Self::Files> {
        self.element.borrow().files.clone()
    }

    fn scroll_to_bottom(&self) {
        self.element.borrow_mut().scrolled_to_bottom = true;
    }

    fn set_hidden(&self, hidden: bool) {
        if hidden {
            self.set_attribute("hidden", "");
        } else {
            self.remove_attribute("hidden");
        }
    }

    fn listen(&self, event: EventKind, handler: Box<dyn FnMut()>) {
        self.element
            .borrow_mut()
            .listeners
            .push((event, Rc::new(RefCell::new(handler))));
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(error) = self.document.spawner.spawn_local(task) {
            tracing::warn!(%error, "failed to spawn task");
        }
    }

    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert");
        self.document
            .dialogs
            .borrow_mut()
            .alerts
            .push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        let mut dialogs = self.document.dialogs.borrow_mut();
        dialogs.confirmations.push(message.to_string());
        !dialogs.decline
    }

    fn prompt(&self, message: &str) -> Option<String> {
        let mut dialogs = self.document.dialogs.borrow_mut();
        dialogs.prompts.push(message.to_string());
        dialogs.prompt_answer.clone()
    }

    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ViewError>> {
        let mut dialogs = self.document.dialogs.borrow_mut();
        let result = if dialogs.clipboard_unavailable {
            Err(ViewError::ClipboardUnavailable)
        } else {
            dialogs.clipboard = Some(text.to_string());
            Ok(())
        };
        Box::pin(future::ready(result))
    }
}
