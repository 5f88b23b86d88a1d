//! # gateway-ui: WiFi gateway web interface
//!
//! Composition root compiled to WebAssembly.
//!
//! ## Responsibilities
//! - Load the embedded configuration (`gateway-ui.toml`) with local storage
//!   overrides
//! - Install the `tracing` subscriber writing to the browser console
//! - Resolve the gateway address and build the API client
//! - Build the menu and page region from `<nav>` and `<main>`, register
//!   every page and open the one named by the location hash
//! - Re-navigate on `popstate`
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no page logic belongs here.

pub mod shell;

use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;

use gateway_ui_adapter_web::{
    BrowserLocation, BrowserTimer, ConsoleMakeWriter, FetchTransport, LocalStorage, WebNode,
};
use gateway_ui_app::config::Config;
use gateway_ui_app::ports::Storage;

pub use shell::{Platform, Shell};

/// Configuration compiled into the UI.
pub const CONFIG: &str = include_str!("../gateway-ui.toml");

/// Load [`CONFIG`] with `storage` overrides, falling back to defaults when
/// it is invalid.
pub fn load_config(storage: &impl Storage) -> (Config, Option<anyhow::Error>) {
    match Config::load(CONFIG, storage) {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error.into())),
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .with_writer(ConsoleMakeWriter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    let storage = LocalStorage;
    let (config, invalid) = load_config(&storage);
    init_logging(&config.logging.filter);
    if let Some(error) = invalid {
        tracing::error!("invalid configuration, using defaults: {error:#}");
    }

    let (Some(nav), Some(main)) = (WebNode::query("nav"), WebNode::query("main")) else {
        tracing::error!("page has no <nav> or <main> element");
        return;
    };
    let location = BrowserLocation;
    let shell = Shell::launch(
        &config,
        Platform {
            nav,
            main,
            location,
            storage,
            transport: FetchTransport,
            timer: BrowserTimer,
        },
    );
    location.on_change(move || shell.follow_location());
}
