//! Platform-independent wiring: address, client, router, pages.

use std::rc::Rc;

use futures::lock::Mutex;

use gateway_ui_app::bootstrap::{build_api, initial_key, register_pages, resolve_gateway_address};
use gateway_ui_app::config::Config;
use gateway_ui_app::navigation::Navigation;
use gateway_ui_app::poller::Poller;
use gateway_ui_app::ports::{Location, Storage, Timer, Transport};
use gateway_ui_view::{ContainerView, Node};

/// Everything the UI needs from the platform it runs on.
pub struct Platform<N, L, S, T, K> {
    /// Receives one menu link per page.
    pub nav: N,
    /// Shared region the active page renders into.
    pub main: N,
    pub location: L,
    pub storage: S,
    pub transport: T,
    pub timer: K,
}

/// The running UI.
///
/// Transitions are queued behind an async mutex, so a location change
/// arriving while a page is still entering waits for it to finish.
pub struct Shell<N: Node, L> {
    navigation: Rc<Mutex<Navigation<N, L>>>,
    main: N,
    default_page: String,
}

impl<N: Node, L: Location + 'static> Shell<N, L> {
    /// Wire the UI and open the page named by the location hash.
    pub fn launch<S, T, K>(config: &Config, platform: Platform<N, L, S, T, K>) -> Self
    where
        S: Storage,
        T: Transport + 'static,
        K: Timer + Clone + 'static,
    {
        let Platform {
            nav,
            main,
            location,
            storage,
            transport,
            timer,
        } = platform;

        let address = resolve_gateway_address(config, &location, &storage, &main);
        let api = Rc::new(build_api(config, &address, transport, timer.clone()));
        let poller = Poller::new(timer, config.poll_interval());

        let mut navigation = Navigation::new(
            ContainerView::new(nav),
            ContainerView::new(main.clone()),
            location,
        );
        register_pages(&mut navigation, &api, &poller);
        let key = initial_key(config, navigation.location());
        tracing::info!(%address, %key, "gateway ui started");

        let shell = Self {
            navigation: Rc::new(Mutex::new(navigation)),
            main,
            default_page: config.navigation.default_page.clone(),
        };
        shell.open(key);
        shell
    }

    /// Navigate to `key` once earlier transitions are done.
    pub fn open(&self, key: String) {
        let navigation = Rc::clone(&self.navigation);
        self.main.spawn_local(Box::pin(async move {
            let mut navigation = navigation.lock().await;
            if let Err(error) = navigation.navigate_to(&key).await {
                tracing::warn!("{:#}", anyhow::Error::from(error));
            }
        }));
    }

    /// Follow the location after the user moved through history or the
    /// hash changed. The active page is left alone when it already matches.
    pub fn follow_location(&self) {
        let navigation = Rc::clone(&self.navigation);
        let default_page = self.default_page.clone();
        self.main.spawn_local(Box::pin(async move {
            let mut navigation = navigation.lock().await;
            let hash = navigation.location().hash();
            let key = match hash.strip_prefix('#').unwrap_or(&hash) {
                "" => default_page,
                key => key.to_string(),
            };
            if navigation.current_key() == Some(key.as_str()) {
                return;
            }
            if let Err(error) = navigation.navigate_to(&key).await {
                tracing::warn!("{:#}", anyhow::Error::from(error));
            }
        }));
    }

    /// Key of the active page, `None` while the first transition is queued.
    #[must_use]
    pub fn current_key(&self) -> Option<String> {
        self.navigation
            .try_lock()
            .and_then(|navigation| navigation.current_key().map(str::to_string))
    }
}
