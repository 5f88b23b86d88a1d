//! `window.location` and `localStorage`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use gateway_ui_app::ports::{Location, Storage};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl BrowserLocation {
    fn location() -> Option<web_sys::Location> {
        web_sys::window().map(|window| window.location())
    }

    /// Call `handler` on every `popstate`: history moves and hash changes.
    pub fn on_change(&self, handler: impl FnMut() + 'static) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(handler);
        if let Err(error) = window
            .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(?error, "failed to listen for location changes");
        }
        closure.forget();
    }
}

impl Location for BrowserLocation {
    fn hash(&self) -> String {
        Self::location()
            .and_then(|location| location.hash().ok())
            .unwrap_or_default()
    }

    fn set_hash(&self, key: &str) {
        if let Some(Err(error)) = Self::location().map(|location| location.set_hash(key)) {
            tracing::warn!(?error, key, "failed to set location hash");
        }
    }

    fn hostname(&self) -> String {
        Self::location()
            .and_then(|location| location.hostname().ok())
            .unwrap_or_default()
    }
}

/// `window.localStorage`; a browser without storage keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(Err(error)) = Self::storage().map(|storage| storage.set_item(key, value)) {
            tracing::warn!(?error, key, "failed to persist setting");
        }
    }
}
