//! Hash router with enter/leave page lifecycle.
//!
//! At most one page is active. A transition always awaits the previous
//! page's `leave` before the shared region is cleared and the next page's
//! `enter` starts, so the region is owned by exactly one page at a time.

use std::fmt;

use futures::future::LocalBoxFuture;

use gateway_ui_view::{Attrs, ContainerView, Node};

use crate::ports::Location;

/// A screen registered under a router key.
pub trait Page<N: Node> {
    /// Menu label.
    fn label(&self) -> &str;

    /// Render into `view`, the cleared shared region, and start any
    /// background work.
    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>>;

    /// Stop background work before the region is handed to another page.
    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>>;
}

/// Which lifecycle hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Leave,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// A page hook failed; the error is passed through untouched.
    #[error("page \"{key}\" failed to {phase}")]
    Lifecycle {
        key: String,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },
}

/// Rendered for keys nobody registered.
#[derive(Debug, Clone)]
pub struct NotFoundPage {
    key: String,
}

impl NotFoundPage {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl<N: Node> Page<N> for NotFoundPage {
    fn label(&self) -> &str {
        ""
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            view.p(
                &format!("Page \"{}\" not found.", self.key),
                Attrs::new().class("notice"),
            );
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

enum Current {
    Registered(usize),
    NotFound { key: String, page: NotFoundPage },
}

/// Maps location hashes to pages and drives their lifecycle.
pub struct Navigation<N: Node, L> {
    nav: ContainerView<N>,
    region: ContainerView<N>,
    location: L,
    pages: Vec<(String, Box<dyn Page<N>>)>,
    current: Option<Current>,
}

impl<N: Node, L: Location> Navigation<N, L> {
    /// `nav` receives one link per page, `region` the active page.
    pub fn new(nav: ContainerView<N>, region: ContainerView<N>, location: L) -> Self {
        Self {
            nav,
            region,
            location,
            pages: Vec::new(),
            current: None,
        }
    }

    /// Register `page` under `key` and append its menu link. Registration
    /// order is menu order; registering a key again replaces the page.
    pub fn add(&mut self, key: &str, page: impl Page<N> + 'static) {
        self.nav
            .link(page.label(), Attrs::new().with("href", format!("#{key}")));
        let page: Box<dyn Page<N>> = Box::new(page);
        match self.pages.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = page,
            None => self.pages.push((key.to_string(), page)),
        }
    }

    /// Keys in menu order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.pages.iter().any(|(existing, _)| existing == key)
    }

    /// Key of the active page, including an unregistered one.
    #[must_use]
    pub fn current_key(&self) -> Option<&str> {
        match self.current.as_ref()? {
            Current::Registered(index) => Some(self.pages[*index].0.as_str()),
            Current::NotFound { key, .. } => Some(key.as_str()),
        }
    }

    #[must_use]
    pub fn location(&self) -> &L {
        &self.location
    }

    /// Switch to the page registered under `key` (a leading `#` is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Lifecycle`] when the previous page's
    /// `leave` or the next page's `enter` fails. A failing `leave` keeps the
    /// previous page active.
    #[tracing::instrument(skip(self))]
    pub async fn navigate_to(&mut self, key: &str) -> Result<(), NavigationError> {
        let key = key.strip_prefix('#').unwrap_or(key);
        self.location.set_hash(key);

        if let Some(previous) = self.current_key().map(str::to_string) {
            if let Some(page) = active_page(&mut self.pages, &mut self.current) {
                page.leave()
                    .await
                    .map_err(|source| NavigationError::Lifecycle {
                        key: previous,
                        phase: Phase::Leave,
                        source,
                    })?;
            }
        }

        self.region.clear();
        self.current = Some(
            match self.pages.iter().position(|(existing, _)| existing == key) {
                Some(index) => Current::Registered(index),
                None => {
                    tracing::debug!(key, "no page registered");
                    Current::NotFound {
                        key: key.to_string(),
                        page: NotFoundPage::new(key),
                    }
                }
            },
        );

        tracing::debug!(key, "entering page");
        if let Some(page) = active_page(&mut self.pages, &mut self.current) {
            page.enter(&self.region)
                .await
                .map_err(|source| NavigationError::Lifecycle {
                    key: key.to_string(),
                    phase: Phase::Enter,
                    source,
                })?;
        }
        Ok(())
    }
}

fn active_page<'a, N: Node>(
    pages: &'a mut [(String, Box<dyn Page<N>>)],
    current: &'a mut Option<Current>,
) -> Option<&'a mut dyn Page<N>> {
    match current.as_mut()? {
        Current::Registered(index) => pages.get_mut(*index).map(|(_, page)| -> &'a mut dyn Page<N> { page.as_mut() }),
        Current::NotFound { page, .. } => Some(page),
    }
}
