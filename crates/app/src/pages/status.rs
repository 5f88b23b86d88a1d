//! Status page: system diagnostics, the gateway log and the device list,
//! each refreshed by its own poll loop.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use gateway_ui_domain::status::{DeviceList, HeapCondition, SystemInfo};
use gateway_ui_view::{Attrs, CheckboxView, ContainerView, DefinitionListView, Node, View};

use super::{StateLine, escape_html};
use crate::api::GatewayApi;
use crate::navigation::Page;
use crate::poller::{PollHandle, Poller};
use crate::ports::{Timer, Transport};

pub struct StatusPage<T, K> {
    api: Rc<GatewayApi<T, K>>,
    poller: Poller<K>,
    polls: Vec<PollHandle>,
    /// The log loop can be switched off by the user, so it lives apart.
    logs: Rc<RefCell<Option<PollHandle>>>,
}

impl<T, K> StatusPage<T, K>
where
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    pub fn new(api: Rc<GatewayApi<T, K>>, poller: Poller<K>) -> Self {
        Self {
            api,
            poller,
            polls: Vec::new(),
            logs: Rc::default(),
        }
    }

    fn poll_status<N: Node>(&self, list: DefinitionListView<N>, state: StateLine<N>) -> PollHandle {
        let (api, node) = (Rc::clone(&self.api), list.node().clone());
        self.poller.start(&node, move || {
            let (api, list, state) = (Rc::clone(&api), list.clone(), state.clone());
            async move {
                if let Some(status) = state.track("system status", api.system_status()).await {
                    list.clear();
                    for (term, description) in status_rows(&status.system) {
                        list.add(term, &description);
                    }
                    state.updated();
                }
            }
        })
    }

    fn poll_devices<N: Node>(&self, list: DefinitionListView<N>, state: StateLine<N>) -> PollHandle {
        let (api, node) = (Rc::clone(&self.api), list.node().clone());
        self.poller.start(&node, move || {
            let (api, list, state) = (Rc::clone(&api), list.clone(), state.clone());
            async move {
                if let Some(devices) = state.track("devices", api.devices()).await {
                    list.clear();
                    for (term, description) in device_rows(&devices) {
                        list.add(&term, &description);
                    }
                    state.updated();
                }
            }
        })
    }
}

fn poll_logs<N, T, K>(
    api: &Rc<GatewayApi<T, K>>,
    poller: &Poller<K>,
    logs: &View<N>,
    state: &StateLine<N>,
) -> PollHandle
where
    N: Node,
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    let (api, logs, state) = (Rc::clone(api), logs.clone(), state.clone());
    let node = logs.node().clone();
    poller.start(&node, move || {
        let (api, logs, state) = (Rc::clone(&api), logs.clone(), state.clone());
        async move {
            if let Some(text) = state.track("logs", api.system_logs()).await {
                logs.set_text(&text);
                logs.scroll_to_bottom();
                state.updated();
            }
        }
    })
}

impl<N, T, K> Page<N> for StatusPage<T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    fn label(&self) -> &str {
        "Status"
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            view.h1("System Status", Attrs::new());
            let status = view.dl(Attrs::new());
            let status_state = StateLine::create(view);
            let handle = self.poll_status(status, status_state);
            self.polls.push(handle);

            view.h1("Logs", Attrs::new());
            let logs = view.pre("", Attrs::new());
            let copied = logs.clone();
            view.button("Copy to clipboard", Attrs::new())
                .on_click(move |button| {
                    let text = copied.text();
                    async move {
                        button.node().write_clipboard(&text).await?;
                        Ok(())
                    }
                });
            let auto_refresh = view.label("Auto-refresh", Attrs::new());
            let toggle = view.checkbox(Some(&auto_refresh), Attrs::new().flag("checked"));
            toggle.set_checked(true);
            let logs_state = StateLine::create(view);
            *self.logs.borrow_mut() = Some(poll_logs(&self.api, &self.poller, &logs, &logs_state));

            let (api, poller, slot) = (Rc::clone(&self.api), self.poller.clone(), Rc::clone(&self.logs));
            toggle.on_change(move |checked, _: &CheckboxView<N>| {
                tracing::debug!(checked, "log auto-refresh toggled");
                // Replacing the handle drops, and so cancels, the running loop.
                *slot.borrow_mut() =
                    checked.then(|| poll_logs(&api, &poller, &logs, &logs_state));
            });

            view.h1("Devices", Attrs::new());
            let devices = view.dl(Attrs::new());
            let devices_state = StateLine::create(view);
            let handle = self.poll_devices(devices, devices_state);
            self.polls.push(handle);
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            for poll in self.polls.drain(..) {
                poll.cancel();
            }
            if let Some(poll) = self.logs.borrow_mut().take() {
                poll.cancel();
            }
            Ok(())
        })
    }
}

/// Term/description pairs of the `System Status` list, descriptions as HTML.
#[must_use]
pub fn status_rows(info: &SystemInfo) -> Vec<(&'static str, String)> {
    let with_unit = |value: &str, unit: &str| format!("{} {unit}", escape_html(value));
    vec![
        ("Application name", escape_html(&info.name)),
        ("Application version", escape_html(&info.version)),
        ("Chip ID", escape_html(&info.chip_id)),
        ("Flash chip ID", escape_html(&info.flash_chip_id)),
        ("Sketch MD5", escape_html(&info.sketch_md5)),
        ("IoT Core version", escape_html(&info.iot_core_version)),
        ("ESP Core version", escape_html(&info.esp_core_version)),
        ("ESP SDK version", escape_html(&info.esp_sdk_version)),
        ("Supply voltage", with_unit(&info.chip_vcc, "V")),
        ("CPU frequency", with_unit(&info.cpu_freq, "MHz")),
        ("Reset reason", escape_html(&info.reset_reason)),
        ("Uptime", escape_html(&info.uptime)),
        ("Free heap", with_unit(&info.free_heap, "B")),
        ("Max. free block size", with_unit(&info.max_free_block_size, "B")),
        ("Heap fragmentation", heap_fragmentation(info)),
        ("WiFi RSSI", escape_html(&info.wifi_rssi)),
        ("IP address", escape_html(&info.ip)),
    ]
}

fn heap_fragmentation(info: &SystemInfo) -> String {
    match info.heap_fragmentation_percent() {
        Some(percent) => format!(
            r#"<progress value="{percent}" max="100" class="{}">{percent}%</progress>"#,
            HeapCondition::from_fragmentation(percent).css_class()
        ),
        None => escape_html(&info.heap_fragmentation),
    }
}

/// Devices emulated by the gateway first, then the other bus members.
#[must_use]
pub fn device_rows(devices: &DeviceList) -> Vec<(String, String)> {
    devices
        .own
        .iter()
        .map(|(id, description)| (escape_html(id), escape_html(description)))
        .chain(
            devices
                .others
                .iter()
                .map(|id| (escape_html(id), "&lt;other device&gt;".to_string())),
        )
        .collect()
}
