//! View behaviour against the in-memory DOM.
//!
//! Every test builds its views under a detached `<main>` of a fresh
//! [`VirtualDocument`] and drives them the way a user would: clicks, typed
//! values and picked options.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gateway_ui_adapter_virtual::{VNode, VirtualDocument};
use gateway_ui_view::{Attrs, Cell, ContainerView, Control, Node, SelectOption};

fn root() -> (VirtualDocument, ContainerView<VNode>) {
    let document = VirtualDocument::new();
    let main = ContainerView::new(document.create_element("main"));
    (document, main)
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[test]
fn should_render_headings_paragraphs_and_definition_lists() {
    let (_document, main) = root();
    main.h1("System Status", Attrs::new());
    main.p("<small>Loading...</small>", Attrs::new().class("state"));
    let dl = main.dl(Attrs::new());
    dl.add("Uptime", "3 days");
    assert_eq!(
        main.content(),
        concat!(
            "<h1>System Status</h1>",
            r#"<p class="state"><small>Loading...</small></p>"#,
            "<dl><dt>Uptime</dt><dd>3 days</dd></dl>",
        )
    );
}

#[test]
fn should_open_sections_with_a_title() {
    let (_document, main) = root();
    let section = main.section("Codecs", Attrs::new());
    section.p("none", Attrs::new());
    assert_eq!(
        main.content(),
        "<section><h2>Codecs</h2><p>none</p></section>"
    );
}

#[test]
fn should_toggle_progress_between_value_and_indeterminate() {
    let (_document, main) = root();
    let progress = main.progress(Attrs::new().with("max", 100));
    assert!(progress.is_indeterminate());
    progress.set_value(42.0);
    assert_eq!(progress.value(), Some(42.0));
    progress.set_indeterminate(true);
    assert_eq!(progress.value(), None);
    progress.set_indeterminate(false);
    assert_eq!(progress.value(), Some(0.0));
}

#[test]
fn should_hide_and_show_views() {
    let (_document, main) = root();
    let block = main.block(Attrs::new());
    block.hide();
    assert!(block.node().is_hidden());
    block.show();
    assert!(!block.node().is_hidden());
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[test]
fn should_fill_rows_with_headers_columns_and_nested_views() {
    let (_document, main) = root();
    let table = main.table(Attrs::new());
    table
        .add_row(Attrs::new())
        .add_headers(["ID", "Name", ""], Attrs::new());
    let row = table.add_row(Attrs::new());
    row.add_columns(["12", "Outside"], Attrs::new());
    let button = gateway_ui_view::ButtonView::create(row.node(), "Delete", &Attrs::new());
    row.add_column(Cell::view(&button), Attrs::new());

    let rows = table.node().find_all("tr");
    assert_eq!(rows[0].cells(), ["ID", "Name", ""]);
    assert_eq!(rows[1].cells(), ["12", "Outside", "Delete"]);
    assert_eq!(
        table.node().find_all("td")[2].inner_html(),
        r#"<button type="button">Delete</button>"#
    );
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[test]
fn should_bind_label_to_generated_id() {
    let (_document, main) = root();
    let label = main.label("Broker", Attrs::new());
    let text = main.text(Some(&label), Attrs::new());
    let id = text.id();
    assert!(id.starts_with("_generated-"));
    assert_eq!(label.attribute("for"), Some(id));
    assert_eq!(main.node().control_for_label("Broker").as_ref(), Some(text.node()));
}

#[test]
fn should_keep_existing_id_when_binding_label() {
    let (_document, main) = root();
    let label = main.label("Port", Attrs::new());
    let number = main.number(Some(&label), Attrs::new().with("id", "mqtt-port"));
    assert_eq!(number.id(), "mqtt-port");
    assert_eq!(label.attribute("for").as_deref(), Some("mqtt-port"));
}

#[test]
fn should_select_options_by_key() {
    let (_document, main) = root();
    let select = main.select(
        None,
        [SelectOption::new("a", "First"), SelectOption::new("b", "Second")],
        Attrs::new(),
    );
    assert_eq!(select.selected(), "a");
    select.set_selected("b");
    assert_eq!(select.selected(), "b");
    assert!(select.has_option("a"));
    select.set_selected("missing");
    assert_eq!(select.selected(), "");
}

#[test]
fn should_replace_options_and_select_the_first() {
    let (_document, main) = root();
    let select = main.select(None, ["x", "y"], Attrs::new());
    select.set_selected("y");
    select.set_options([("1", "One"), ("2", "Two")]);
    assert_eq!(select.selected(), "1");
    assert!(!select.has_option("y"));
    assert_eq!(
        select.node().options(),
        [
            ("1".to_string(), "One".to_string()),
            ("2".to_string(), "Two".to_string())
        ]
    );
}

#[test]
fn should_report_committed_values_to_change_callbacks() {
    let (_document, main) = root();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let text = main
        .text(None, Attrs::new())
        .on_change(move |value, _| log.borrow_mut().push(value));
    let log = Rc::clone(&seen);
    let checkbox = main
        .checkbox(None, Attrs::new())
        .on_change(move |checked, _| log.borrow_mut().push(checked.to_string()));

    text.node().input_value("broker.local");
    checkbox.node().toggle();
    checkbox.node().toggle();
    assert_eq!(*seen.borrow(), ["broker.local", "true", "false"]);
}

#[test]
fn should_report_focus_changes() {
    let (_document, main) = root();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let text = main
        .text(None, Attrs::new())
        .on_focus_change(move |focused| log.borrow_mut().push(focused));
    text.node().focus();
    text.node().blur();
    assert_eq!(*seen.borrow(), [true, false]);
}

#[test]
fn should_parse_number_values() {
    let (_document, main) = root();
    let number = main.number(None, Attrs::new());
    assert_eq!(number.number::<u16>(), None);
    number.set_value(1883);
    assert_eq!(number.number::<u16>(), Some(1883));
}

// ---------------------------------------------------------------------------
// Fieldsets
// ---------------------------------------------------------------------------

#[test]
fn should_validate_fieldset_through_its_controls() {
    let (_document, main) = root();
    let fieldset = main.fieldset(Some("MQTT"), Attrs::new());
    let broker = fieldset.text(None, Attrs::new().flag("required").with("maxlength", 15));
    let port = fieldset.number(None, Attrs::new().with("min", 1).with("max", 65535));
    assert!(!fieldset.validate());

    broker.set_value("10.0.0.2");
    port.set_value(0);
    assert!(!fieldset.validate());
    port.set_value(1883);
    assert!(fieldset.validate());
    broker.set_value("a-very-long-broker-name");
    assert!(!fieldset.validate());
}

#[test]
fn should_walk_controls_since_fieldset_is_never_invalid_itself() {
    let (_document, main) = root();
    let outer = main.fieldset(Some("Settings"), Attrs::new());
    let inner = outer.fieldset(Some("Broker"), Attrs::new());
    let port = inner.number(None, Attrs::new().with("min", 1).with("max", 65535));
    port.set_value(70000);

    assert!(outer.node().check_validity());
    assert!(!port.node().check_validity());
    assert!(!outer.validate());
    assert!(!inner.validate());

    outer.disable();
    assert!(outer.validate());
}

#[test]
fn should_disable_every_control_of_a_fieldset() {
    let (_document, main) = root();
    let fieldset = main.fieldset(None, Attrs::new());
    let button = fieldset.button("Save", Attrs::new());
    fieldset.disable();
    assert!(!fieldset.is_enabled());
    assert!(button.is_enabled());
    assert!(button.node().is_disabled());
    fieldset.enable();
    assert!(!button.node().is_disabled());
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

#[test]
fn should_disable_button_while_action_runs() {
    let (document, main) = root();
    let (release, released) = oneshot::channel::<()>();
    let released = Rc::new(RefCell::new(Some(released)));
    let runs = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&runs);
    let button = main.button("Save", Attrs::new()).on_click(move |_| {
        *counter.borrow_mut() += 1;
        let released = released.borrow_mut().take();
        async move {
            if let Some(released) = released {
                let _ = released.await;
            }
            Ok(())
        }
    });

    button.node().click();
    document.run_until_stalled();
    assert!(!button.is_enabled());
    button.node().click();
    assert_eq!(*runs.borrow(), 1);

    release.send(()).unwrap();
    document.run_until_stalled();
    assert!(button.is_enabled());
    assert!(document.alerts().is_empty());
}

#[test]
fn should_alert_and_reenable_when_action_fails() {
    let (document, main) = root();
    let button = main
        .button("Restart", Attrs::new())
        .on_click(|_| async {
            Err::<(), _>(anyhow::anyhow!("HTTP error: 500 Internal Server Error."))
        });
    button.node().click();
    document.run_until_stalled();
    assert!(button.is_enabled());
    assert_eq!(document.alerts(), ["HTTP error: 500 Internal Server Error."]);
}

#[test]
fn should_copy_text_to_clipboard_when_available() {
    let (document, main) = root();
    let pre = main.pre("log line", Attrs::new());
    assert!(document.block_on(pre.node().write_clipboard("log line")).is_ok());
    assert_eq!(document.clipboard().as_deref(), Some("log line"));

    document.set_clipboard_available(false);
    assert!(document.block_on(pre.node().write_clipboard("x")).is_err());
}
