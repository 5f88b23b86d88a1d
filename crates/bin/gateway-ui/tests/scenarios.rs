//! End-to-end scenarios for the whole UI.
//!
//! Each test launches the shell against the virtual adapters: an in-memory
//! document, a scripted gateway, a hand-driven clock and an in-memory
//! location. Time only moves when a test advances the clock, so every poll
//! and timeout is deterministic.

use std::time::Duration;

use gateway_ui::{CONFIG, Platform, Shell};
use gateway_ui_adapter_virtual::{
    MemoryLocation, MemoryStorage, ScriptedTransport, VNode, VirtualDocument, VirtualTimer,
};
use gateway_ui_app::config::Config;
use gateway_ui_app::ports::{HttpMethod, Location};
use gateway_ui_view::Node;

const INTERVAL: Duration = Duration::from_millis(5000);

const SYSTEM_STATUS: &str = r#"{"system":{"name":"wifi-gateway","version":"2.1.0","chipId":1234567,"heapFragmentation":"12","chipVcc":3.3,"ip":"192.168.1.40"}}"#;

const DEVICES: &str = r#"{"this":{"DIS/3":"Display emulation"},"others":["HEA/1"]}"#;

const SNAPSHOT: &str = r#"{
    "retrievedOn": "2024-05-01T10:00:05",
    "totalItems": 1,
    "actualItems": 1,
    "items": {
        "HEA": {
            "2": {
                "9": {
                    "id": 9,
                    "source": "HEA/2",
                    "name": "Flow temperature setpoint",
                    "unit": "°C",
                    "accessMode": "Writable",
                    "rawValue": "00D2",
                    "value": 21.0,
                    "lastUpdate": "2024-05-01T10:00:00"
                }
            }
        }
    }
}"#;

struct Harness {
    document: VirtualDocument,
    nav: VNode,
    main: VNode,
    location: MemoryLocation,
    gateway: ScriptedTransport,
    timer: VirtualTimer,
    shell: Shell<VNode, MemoryLocation>,
}

impl Harness {
    /// Launch the UI served by the gateway itself, opened at `#hash`.
    fn launch(hash: Option<&str>, gateway: ScriptedTransport) -> Self {
        let storage = MemoryStorage::new();
        let config = Config::load(CONFIG, &storage).expect("embedded config should be valid");
        let document = VirtualDocument::new();
        let nav = document.create_element("nav");
        let main = document.create_element("main");
        let location = MemoryLocation::new("gateway.local");
        let location = match hash {
            Some(key) => location.with_hash(key),
            None => location,
        };
        let timer = VirtualTimer::new();

        let shell = Shell::launch(
            &config,
            Platform {
                nav: nav.clone(),
                main: main.clone(),
                location: location.clone(),
                storage,
                transport: gateway.clone(),
                timer: timer.clone(),
            },
        );
        document.run_until_stalled();

        Self {
            document,
            nav,
            main,
            location,
            gateway,
            timer,
            shell,
        }
    }

    /// Let the clock run and every task woken by it settle.
    fn wait(&self, by: Duration) {
        self.timer.advance(by);
        self.document.run_until_stalled();
    }

    /// Act as the browser after the user changed the hash.
    fn visit(&self, key: &str) {
        self.location.set_hash(key);
        self.shell.follow_location();
        self.document.run_until_stalled();
    }

    fn headings(&self) -> Vec<String> {
        self.main.find_all("h1").iter().map(VNode::text).collect()
    }

    fn fieldset(&self, legend: &str) -> VNode {
        self.main
            .find_all("fieldset")
            .into_iter()
            .find(|fieldset| {
                fieldset
                    .find_all("legend")
                    .first()
                    .is_some_and(|title| title.text() == legend)
            })
            .unwrap_or_else(|| panic!("no fieldset {legend:?}"))
    }

    fn control(&self, label: &str) -> VNode {
        self.main
            .control_for_label(label)
            .unwrap_or_else(|| panic!("no control labelled {label:?}"))
    }

    fn bodies(&self, method: HttpMethod, url: &str) -> Vec<Option<String>> {
        self.gateway
            .requests()
            .into_iter()
            .filter(|request| request.method == method && request.url == url)
            .map(|request| request.body)
            .collect()
    }
}

fn status_gateway() -> ScriptedTransport {
    let gateway = ScriptedTransport::new();
    gateway
        .ok(HttpMethod::Get, "/api/system/status", SYSTEM_STATUS)
        .ok(HttpMethod::Get, "/api/system/logs", "boot\nwifi connected")
        .ok(HttpMethod::Get, "/api/devices", DEVICES);
    gateway
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn should_open_default_page_without_hash() {
    let ui = Harness::launch(None, status_gateway());

    assert_eq!(ui.shell.current_key().as_deref(), Some("status"));
    assert_eq!(ui.location.history(), vec!["status".to_string()]);
    assert_eq!(ui.location.hash(), "#status");
    assert_eq!(ui.headings(), vec!["System Status", "Logs", "Devices"]);
}

#[test]
fn should_list_every_page_in_menu() {
    let ui = Harness::launch(None, status_gateway());

    let links: Vec<(Option<String>, String)> = ui
        .nav
        .find_all("a")
        .iter()
        .map(|link| (link.attribute("href"), link.text()))
        .collect();
    assert_eq!(
        links,
        vec![
            (Some("#status".to_string()), "Status".to_string()),
            (Some("#data".to_string()), "Data".to_string()),
            (Some("#config".to_string()), "Configuration".to_string()),
            (Some("#definitions".to_string()), "Definitions".to_string()),
            (Some("#system".to_string()), "System".to_string()),
        ]
    );
}

#[test]
fn should_follow_hash_changes_between_pages() {
    let ui = Harness::launch(Some("system"), ScriptedTransport::new());
    assert_eq!(ui.shell.current_key().as_deref(), Some("system"));
    assert!(ui.main.find_button("Restart").is_some());

    ui.visit("status");

    assert_eq!(ui.shell.current_key().as_deref(), Some("status"));
    assert!(ui.main.find_button("Restart").is_none());
    assert_eq!(ui.headings(), vec!["System Status", "Logs", "Devices"]);
}

#[test]
fn should_not_reenter_page_already_shown() {
    let ui = Harness::launch(None, status_gateway());
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 1);

    ui.shell.follow_location();
    ui.document.run_until_stalled();

    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 1);
    assert_eq!(ui.location.history().len(), 1);
}

#[test]
fn should_show_notice_for_unknown_page() {
    let ui = Harness::launch(Some("nowhere"), ScriptedTransport::new());

    assert_eq!(ui.shell.current_key().as_deref(), Some("nowhere"));
    let notices: Vec<String> = ui.main.find_all("p").iter().map(VNode::text).collect();
    assert_eq!(notices, vec![r#"Page "nowhere" not found."#.to_string()]);
}

#[test]
fn should_stop_polling_after_leaving_page() {
    let ui = Harness::launch(None, status_gateway());
    ui.wait(INTERVAL);
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 2);

    ui.visit("system");
    ui.wait(INTERVAL * 3);

    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 2);
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/devices"), 2);
    assert_eq!(ui.timer.sleepers(), 0);
}

// ---------------------------------------------------------------------------
// Status page
// ---------------------------------------------------------------------------

#[test]
fn should_render_status_logs_and_devices() {
    let ui = Harness::launch(None, status_gateway());

    let lists = ui.main.find_all("dl");
    assert_eq!(lists.len(), 2);

    let status: Vec<String> = lists[0].children().iter().map(VNode::text).collect();
    assert_eq!(status.len(), 2 * 17);
    assert_eq!(status[0], "Application name");
    assert_eq!(status[1], "wifi-gateway");
    assert!(status.contains(&"1234567".to_string()));
    assert!(status.contains(&"3.3 V".to_string()));
    assert!(status.contains(&"12%".to_string()));

    let devices: Vec<String> = lists[1].children().iter().map(VNode::text).collect();
    assert_eq!(
        devices,
        vec!["DIS/3", "Display emulation", "HEA/1", "<other device>"]
    );

    let logs = &ui.main.find_all("pre")[0];
    assert_eq!(logs.text(), "boot\nwifi connected");
    assert!(logs.is_scrolled_to_bottom());
}

#[test]
fn should_refresh_status_every_interval() {
    let ui = Harness::launch(None, status_gateway());

    ui.wait(INTERVAL - Duration::from_millis(1));
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 1);

    ui.wait(Duration::from_millis(1));
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 2);
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/logs"), 2);
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/devices"), 2);
}

#[test]
fn should_pause_log_refresh_when_unchecked() {
    let ui = Harness::launch(None, status_gateway());

    ui.control("Auto-refresh").toggle();
    ui.wait(INTERVAL);
    ui.wait(INTERVAL);

    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/logs"), 1);
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/status"), 3);

    ui.control("Auto-refresh").toggle();
    ui.document.run_until_stalled();
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/system/logs"), 2);
}

#[test]
fn should_copy_logs_to_clipboard() {
    let ui = Harness::launch(None, status_gateway());

    ui.main
        .find_button("Copy to clipboard")
        .expect("copy button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.document.clipboard().as_deref(),
        Some("boot\nwifi connected")
    );
    assert!(ui.document.alerts().is_empty());
}

#[test]
fn should_report_timed_out_request_and_retry() {
    let gateway = status_gateway();
    gateway.hang(HttpMethod::Get, "/api/system/status");
    let ui = Harness::launch(None, gateway);

    let state = ui.main.find_all("p")[0].clone();
    assert_eq!(state.text(), "Loading...");
    assert_eq!(ui.gateway.in_flight(), 1);

    ui.wait(INTERVAL);

    assert_eq!(state.text(), "Request timed out after 5000 ms.");
    assert_eq!(state.attribute("class").as_deref(), Some("notice"));
    assert_eq!(ui.gateway.in_flight(), 0);

    ui.gateway
        .ok(HttpMethod::Get, "/api/system/status", SYSTEM_STATUS);
    ui.wait(INTERVAL);

    assert!(state.text().starts_with("Updated on "));
    assert_eq!(state.attribute("class"), None);
}

#[test]
fn should_report_http_errors_in_place() {
    let gateway = status_gateway();
    gateway.status(HttpMethod::Get, "/api/devices", 500, "Internal Server Error");
    let ui = Harness::launch(None, gateway);

    let notices: Vec<String> = ui
        .main
        .find_all("p")
        .iter()
        .filter(|line| line.attribute("class").as_deref() == Some("notice"))
        .map(VNode::text)
        .collect();
    assert_eq!(notices, vec!["HTTP error: 500 Internal Server Error."]);
}

// ---------------------------------------------------------------------------
// Data page
// ---------------------------------------------------------------------------

fn data_gateway() -> ScriptedTransport {
    let gateway = ScriptedTransport::new();
    gateway
        .ok(HttpMethod::Get, "/api/data", SNAPSHOT)
        .ok(HttpMethod::Put, "/api/data/HEA/2/9", "");
    gateway
}

#[test]
fn should_render_captured_datapoints() {
    let ui = Harness::launch(Some("data"), data_gateway());

    let rows = ui.main.find_all("tr");
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].cells(),
        vec![
            "Source",
            "ID",
            "Name",
            "Raw Value",
            "Value",
            "Unit",
            "Last Update"
        ]
    );
    let cells = rows[1].cells();
    assert_eq!(cells[..4], ["HEA/2", "9", "Flow temperature setpoint", "00D2"]);
    assert_eq!(cells[5], "°C");
    assert!(!ui.fieldset("Write value").is_hidden());
}

#[test]
fn should_show_hint_when_nothing_captured() {
    let gateway = ScriptedTransport::new();
    gateway.ok(
        HttpMethod::Get,
        "/api/data",
        r#"{"totalItems":0,"actualItems":0,"items":{}}"#,
    );
    let ui = Harness::launch(Some("data"), gateway);

    assert!(ui.main.find_all("tr").is_empty());
    assert!(ui.fieldset("Write value").is_hidden());
    let hints: Vec<String> = ui.main.find_all("p").iter().map(VNode::text).collect();
    assert!(
        hints
            .iter()
            .any(|hint| hint.starts_with("No data has been captured yet."))
    );
}

#[test]
fn should_query_with_selected_filter() {
    let gateway = data_gateway();
    gateway.ok(HttpMethod::Get, "/api/data?filter=undefined", SNAPSHOT);
    let ui = Harness::launch(Some("data"), gateway);

    let filter = ui.control("Filter:");
    let undefined = filter
        .options()
        .into_iter()
        .map(|(value, _)| value)
        .find(|value| value.to_lowercase().contains("undefined"))
        .expect("undefined filter option");
    filter.choose(&undefined);
    ui.document.run_until_stalled();

    assert_eq!(
        ui.gateway.count(HttpMethod::Get, "/api/data?filter=undefined"),
        1
    );
    assert!(!filter.is_disabled());
}

#[test]
fn should_write_value_and_reload() {
    let ui = Harness::launch(Some("data"), data_gateway());
    let loads = ui.gateway.count(HttpMethod::Get, "/api/data");

    let target = ui.control("Datapoint");
    assert_eq!(
        target.options(),
        vec![(
            "9@HEA/2".to_string(),
            "[9] Flow temperature setpoint (HEA/2)".to_string()
        )]
    );
    target.choose("9@HEA/2");
    ui.control("Value").input_value("22.5");
    ui.fieldset("Write value")
        .find_button("Write")
        .expect("write button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.bodies(HttpMethod::Put, "/api/data/HEA/2/9"),
        vec![Some("22.5".to_string())]
    );
    assert_eq!(ui.gateway.count(HttpMethod::Get, "/api/data"), loads + 1);
    assert_eq!(ui.control("Value").value(), "");
    assert!(ui.document.alerts().is_empty());
}

// ---------------------------------------------------------------------------
// Configuration page
// ---------------------------------------------------------------------------

fn config_gateway() -> ScriptedTransport {
    let gateway = ScriptedTransport::new();
    gateway
        .ok(
            HttpMethod::Get,
            "/api/system/config",
            "dta.mode=Any;\ndta.readOnly=true;\nsep.display=0;\ncan.mode=Normal;",
        )
        .ok(
            HttpMethod::Get,
            "/api/system/config/mqc",
            "enabled=true;\nbroker=192.168.1.20;\nport=1883;\ntopic=heatpump;",
        )
        .ok(HttpMethod::Put, "/api/system/config", "")
        .ok(HttpMethod::Put, "/api/system/config/mqc", "");
    gateway
}

#[test]
fn should_fill_settings_from_gateway() {
    let ui = Harness::launch(Some("config"), config_gateway());

    assert!(!ui.fieldset("Base Settings").is_disabled());
    assert_eq!(ui.control("Display address").value(), "1");
    assert!(!ui.control("Enable write access").checked());
    assert_eq!(ui.control("Data capture mode").value(), "Any");
    assert_eq!(ui.control("CAN mode").value(), "Normal");

    assert!(ui.control("Enable MQTT protocol").checked());
    assert_eq!(ui.control("Broker IP").value(), "192.168.1.20");
    assert_eq!(ui.control("Broker port").value(), "1883");
    assert_eq!(ui.control("Topic").value(), "heatpump");
}

#[test]
fn should_keep_settings_locked_when_load_fails() {
    let gateway = ScriptedTransport::new();
    gateway.fail(HttpMethod::Get, "/api/system/config", "connection refused");
    let ui = Harness::launch(Some("config"), gateway);

    assert!(ui.fieldset("Base Settings").is_disabled());
    assert!(ui.control("Display address").is_disabled());
}

#[test]
fn should_save_base_settings() {
    let ui = Harness::launch(Some("config"), config_gateway());

    ui.control("Display address").input_value("3");
    ui.control("Enable write access").toggle();
    ui.control("Data capture mode").choose("Configured");
    ui.fieldset("Base Settings")
        .find_button("Save")
        .expect("save button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.bodies(HttpMethod::Put, "/api/system/config"),
        vec![Some(
            "can.mode=Normal;\ndta.mode=Configured;\ndta.readOnly=false;\nsep.display=2;"
                .to_string()
        )]
    );
    assert!(ui.document.alerts().is_empty());
    assert!(!ui.fieldset("Base Settings").is_disabled());
}

#[test]
fn should_refuse_to_save_invalid_settings() {
    let ui = Harness::launch(Some("config"), config_gateway());

    ui.control("Display address").input_value("9");
    let base = ui.fieldset("Base Settings");
    assert!(base.check_validity());
    assert!(!ui.control("Display address").check_validity());
    base.find_button("Save").expect("save button").click();
    ui.document.run_until_stalled();

    assert!(ui.bodies(HttpMethod::Put, "/api/system/config").is_empty());
    assert_eq!(ui.document.alerts(), vec!["Some settings are invalid."]);
}

#[test]
fn should_refuse_to_save_non_numeric_broker_port() {
    let ui = Harness::launch(Some("config"), config_gateway());

    ui.control("Broker port").input_value("abc");
    ui.fieldset("MQTT Settings")
        .find_button("Save")
        .expect("save button")
        .click();
    ui.document.run_until_stalled();

    assert!(ui.bodies(HttpMethod::Put, "/api/system/config/mqc").is_empty());
    assert_eq!(ui.document.alerts(), vec!["Some settings are invalid."]);
}

#[test]
fn should_save_mqtt_settings() {
    let ui = Harness::launch(Some("config"), config_gateway());

    ui.control("Topic").input_value("ebus");
    ui.fieldset("MQTT Settings")
        .find_button("Save")
        .expect("save button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.bodies(HttpMethod::Put, "/api/system/config/mqc"),
        vec![Some(
            "broker=192.168.1.20;\nenabled=true;\nport=1883;\ntopic=ebus;".to_string()
        )]
    );
}

#[test]
fn should_reject_malformed_broker_address() {
    let ui = Harness::launch(Some("config"), config_gateway());

    ui.control("Broker IP").input_value("broker.local");
    ui.fieldset("MQTT Settings")
        .find_button("Save")
        .expect("save button")
        .click();
    ui.document.run_until_stalled();

    assert!(ui.bodies(HttpMethod::Put, "/api/system/config/mqc").is_empty());
    assert_eq!(ui.document.alerts(), vec!["Some settings are invalid."]);
}

#[test]
fn should_lock_writable_flag_of_read_only_datapoints() {
    let gateway = config_gateway();
    gateway.ok(HttpMethod::Get, "/api/definitions", "[]").ok(
        HttpMethod::Get,
        "/api/data/config",
        r#"[
            {"valueId":9,"source":"HEA/2","name":"Flow temperature setpoint","unit":"°C","accessMode":"Writable","subscribed":true,"writable":true},
            {"valueId":12,"source":"SEN/1","name":"Outside temperature","unit":"°C","accessMode":"Readable","subscribed":true,"writable":true}
        ]"#,
    );
    let ui = Harness::launch(Some("config"), gateway);

    let rows: Vec<Vec<VNode>> = ui
        .main
        .find_all("tr")
        .iter()
        .skip(1)
        .map(|row| row.find_all("input"))
        .collect();
    assert_eq!(rows.len(), 2);
    let [writable_point, read_only_point] = [&rows[0], &rows[1]];
    assert!(writable_point.iter().all(|flag| flag.checked() && !flag.is_disabled()));
    assert!(read_only_point[0].checked() && !read_only_point[0].is_disabled());
    assert!(read_only_point[1].checked());
    assert!(read_only_point[1].is_disabled());
}

// ---------------------------------------------------------------------------
// System page
// ---------------------------------------------------------------------------

fn system_gateway() -> ScriptedTransport {
    let gateway = ScriptedTransport::new();
    gateway
        .ok(HttpMethod::Post, "/api/system/reset", "")
        .ok(HttpMethod::Post, "/api/system/factory-reset", "");
    gateway
}

#[test]
fn should_restart_gateway() {
    let ui = Harness::launch(Some("system"), system_gateway());

    ui.main.find_button("Restart").expect("restart button").click();
    ui.document.run_until_stalled();

    assert_eq!(ui.gateway.count(HttpMethod::Post, "/api/system/reset"), 1);
    assert!(!ui.fieldset("Control").is_disabled());
}

#[test]
fn should_not_factory_reset_when_declined() {
    let ui = Harness::launch(Some("system"), system_gateway());
    ui.document.set_confirm(false);

    ui.main
        .find_button("Factory Reset")
        .expect("factory reset button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(ui.document.confirmations().len(), 1);
    assert!(ui.document.confirmations()[0].starts_with("WARNING:"));
    assert_eq!(
        ui.gateway.count(HttpMethod::Post, "/api/system/factory-reset"),
        0
    );
}

#[test]
fn should_factory_reset_when_confirmed() {
    let ui = Harness::launch(Some("system"), system_gateway());

    ui.main
        .find_button("Factory Reset")
        .expect("factory reset button")
        .click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.gateway.count(HttpMethod::Post, "/api/system/factory-reset"),
        1
    );
}

#[test]
fn should_alert_when_restart_fails() {
    let gateway = ScriptedTransport::new();
    gateway.status(HttpMethod::Post, "/api/system/reset", 503, "Service Unavailable");
    let ui = Harness::launch(Some("system"), gateway);

    ui.main.find_button("Restart").expect("restart button").click();
    ui.document.run_until_stalled();

    assert_eq!(
        ui.document.alerts(),
        vec!["HTTP error: 503 Service Unavailable."]
    );
    assert!(!ui.fieldset("Control").is_disabled());
}
