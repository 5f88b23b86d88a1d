//! Start-up helpers: gateway address resolution and page registration.

use std::rc::Rc;

use gateway_ui_view::Node;

use crate::api::GatewayApi;
use crate::client::HttpClient;
use crate::config::Config;
use crate::navigation::Navigation;
use crate::pages::{ConfigPage, DataPage, DefinitionsPage, StatusPage, SystemPage};
use crate::poller::Poller;
use crate::ports::{Location, Storage, Timer, Transport};

/// Where the gateway lives, relative to the page serving the UI.
///
/// On the gateway itself the address is empty (same origin). On a
/// development host the user is asked once and the answer cached.
pub fn resolve_gateway_address<N: Node>(
    config: &Config,
    location: &impl Location,
    storage: &impl Storage,
    dialogs: &N,
) -> String {
    let key = &config.development.address_key;
    if let Some(address) = storage.get_item(key).filter(|address| !address.is_empty()) {
        return address;
    }
    if !config.is_development_host(&location.hostname()) {
        return String::new();
    }
    match dialogs
        .prompt("Enter gateway address:")
        .map(|answer| answer.trim().to_string())
        .filter(|answer| !answer.is_empty())
    {
        Some(answer) => {
            let address = format!("http://{answer}");
            storage.set_item(key, &address);
            tracing::info!(%address, "cached development gateway address");
            address
        }
        None => String::new(),
    }
}

/// The API client for `address` as configured.
pub fn build_api<T: Transport, K: Timer>(
    config: &Config,
    address: &str,
    transport: T,
    timer: K,
) -> GatewayApi<T, K> {
    let base_url = format!("{address}{}", config.api.base_path);
    tracing::debug!(%base_url, timeout = ?config.timeout(), "gateway api");
    GatewayApi::new(HttpClient::new(transport, timer, base_url, config.timeout()))
}

/// Register every page in menu order.
pub fn register_pages<N, L, T, K>(
    navigation: &mut Navigation<N, L>,
    api: &Rc<GatewayApi<T, K>>,
    poller: &Poller<K>,
) where
    N: Node,
    L: Location,
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    navigation.add("status", StatusPage::new(Rc::clone(api), poller.clone()));
    navigation.add("data", DataPage::new(Rc::clone(api), poller.clone()));
    navigation.add("config", ConfigPage::new(Rc::clone(api)));
    navigation.add("definitions", DefinitionsPage::new(Rc::clone(api)));
    navigation.add("system", SystemPage::new(Rc::clone(api)));
}

/// Hash to open at start-up: the current one, else the default page.
#[must_use]
pub fn initial_key(config: &Config, location: &impl Location) -> String {
    let hash = location.hash();
    let key = hash.strip_prefix('#').unwrap_or(&hash);
    if key.is_empty() {
        config.navigation.default_page.clone()
    } else {
        key.to_string()
    }
}
