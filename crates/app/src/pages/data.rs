//! Data page: the current datapoint values with filters, plus a small form
//! writing a value to a writable datapoint.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use gateway_ui_domain::datapoint::{DataSnapshot, Datapoint, format_value};
use gateway_ui_domain::query::{DataFilter, DataQuery};
use gateway_ui_domain::source::DataKey;
use gateway_ui_view::{
    Attrs, CheckboxView, ContainerView, Control, FieldsetView, Node, SelectView, TableView,
    TextView,
};

use super::{StateLine, escape_html};
use crate::api::GatewayApi;
use crate::navigation::Page;
use crate::poller::{BusyFlag, PollHandle, Poller};
use crate::ports::{Timer, Transport};

const NO_DATA: &str = "No data has been captured yet. You need to configure which datapoints shall be requested and/or captured.";

pub struct DataPage<T, K> {
    api: Rc<GatewayApi<T, K>>,
    poller: Poller<K>,
    poll: Option<PollHandle>,
}

impl<T, K> DataPage<T, K>
where
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    pub fn new(api: Rc<GatewayApi<T, K>>, poller: Poller<K>) -> Self {
        Self {
            api,
            poller,
            poll: None,
        }
    }
}

/// Handles on everything the page updates after it was built.
#[derive(Debug, Clone)]
struct DataView<N> {
    filter: SelectView<N>,
    updated_since: TextView<N>,
    decimals: CheckboxView<N>,
    table: TableView<N>,
    state: StateLine<N>,
    write: WriteForm<N>,
    /// Set while the user is typing a date, so polling does not interfere.
    editing: BusyFlag,
}

#[derive(Debug, Clone)]
struct WriteForm<N> {
    fieldset: FieldsetView<N>,
    target: SelectView<N>,
    value: TextView<N>,
    writable: Rc<RefCell<Vec<DataKey>>>,
}

impl<N: Node> DataView<N> {
    fn query(&self) -> DataQuery {
        let filter = DataFilter::from_label(&self.filter.selected()).unwrap_or_default();
        DataQuery::new(filter)
            .updated_since(&self.updated_since.value())
            .numbers_as_decimals(self.decimals.is_checked())
    }

    async fn reload<T: Transport, K: Timer>(&self, api: &GatewayApi<T, K>) {
        let query = self.query();
        if let Some(snapshot) = self.state.track("data", api.data(&query)).await {
            self.render(&snapshot);
        }
    }

    fn render(&self, snapshot: &DataSnapshot) {
        self.table.clear();
        let datapoints = snapshot.datapoints();
        self.write.refresh(&datapoints);
        if snapshot.is_empty() {
            self.state.notice(NO_DATA);
            return;
        }
        self.table.add_row(Attrs::new()).add_headers(
            [
                "Source",
                "ID",
                "Name",
                "Raw Value",
                "Value",
                "Unit",
                "Last Update",
            ],
            Attrs::new(),
        );
        for datapoint in datapoints {
            self.table
                .add_row(Attrs::new())
                .add_columns(columns(datapoint), Attrs::new());
        }
        self.state.updated();
    }
}

/// Cells of one datapoint row, as HTML.
fn columns(datapoint: &Datapoint) -> [String; 7] {
    let optional = |text: Option<&String>| text.map(|text| escape_html(text)).unwrap_or_default();
    [
        datapoint.source.to_string(),
        datapoint.id.to_string(),
        optional(datapoint.name.as_ref()),
        optional(datapoint.raw_value.as_ref()),
        datapoint.value.as_ref().map(value_html).unwrap_or_default(),
        optional(datapoint.unit.as_ref()),
        escape_html(&datapoint.last_update),
    ]
}

/// Formatted value with its text escaped and its line breaks kept.
fn value_html(value: &serde_json::Value) -> String {
    format_value(value)
        .split("<br>\n")
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// Parse what the user typed: JSON when it is JSON, a plain string otherwise.
fn parse_value(input: &str) -> serde_json::Value {
    let input = input.trim();
    serde_json::from_str(input).unwrap_or_else(|_| serde_json::Value::String(input.to_string()))
}

impl<N: Node> WriteForm<N> {
    fn create(container: &ContainerView<N>) -> Self {
        let fieldset = container.fieldset(Some("Write value"), Attrs::new());
        let target = fieldset.select(
            Some(&fieldset.label("Datapoint", Attrs::new())),
            Vec::<&str>::new(),
            Attrs::new().flag("required"),
        );
        let value = fieldset.text(
            Some(&fieldset.label("Value", Attrs::new())),
            Attrs::new().flag("required"),
        );
        fieldset.hide();
        Self {
            fieldset,
            target,
            value,
            writable: Rc::default(),
        }
    }

    /// Offer the writable datapoints, keeping the user's pick when it is
    /// still among them.
    fn refresh(&self, datapoints: &[&Datapoint]) {
        let writable: Vec<&Datapoint> = datapoints
            .iter()
            .copied()
            .filter(|datapoint| datapoint.accepts_writes())
            .collect();
        let previous = self.target.selected();
        self.target.set_options(writable.iter().map(|datapoint| {
            let name = datapoint.name.as_deref().unwrap_or_default();
            (datapoint.key(), format!("[{}] {name} ({})", datapoint.id, datapoint.source))
        }));
        if self.target.has_option(&previous) {
            self.target.set_selected(&previous);
        }
        *self.writable.borrow_mut() = writable.iter().map(|datapoint| datapoint.key()).collect();
        if writable.is_empty() {
            self.fieldset.hide();
        } else {
            self.fieldset.show();
        }
    }

    fn selected_key(&self) -> Option<DataKey> {
        let selected = self.target.selected();
        self.writable
            .borrow()
            .iter()
            .find(|key| key.to_string() == selected)
            .copied()
    }
}

/// Reload at once when `control` changes, keeping the control disabled
/// until the new data is shown.
fn reload_on<N, C, T, K>(
    api: &Rc<GatewayApi<T, K>>,
    data: &DataView<N>,
    control: &C,
) -> impl Fn() + 'static
where
    N: Node,
    C: Control<N> + Clone + 'static,
    T: Transport + 'static,
    K: Timer + 'static,
{
    let (api, data, control) = (Rc::clone(api), data.clone(), control.clone());
    move || {
        let (api, data, control) = (Rc::clone(&api), data.clone(), control.clone());
        let view = control.view().clone();
        view.spawn(async move {
            control.disable();
            data.reload(&api).await;
            control.enable();
        });
    }
}

impl<N, T, K> Page<N> for DataPage<T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + Clone + 'static,
{
    fn label(&self) -> &str {
        "Data"
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            view.h1("Current data", Attrs::new());
            let filter = view.select(
                Some(&view.label("Filter:", Attrs::new())),
                DataFilter::ALL.map(DataFilter::label),
                Attrs::new(),
            );
            let updated_since = view.text(
                Some(&view.label("Updated since (ISO date/time, optional):", Attrs::new())),
                Attrs::new().with("placeholder", "2024-01-01T00:00:00"),
            );
            let decimals = view.checkbox(
                Some(&view.label("Show raw values as decimal", Attrs::new())),
                Attrs::new(),
            );
            let table = view.table(Attrs::new());
            let state = StateLine::create(view);
            let write = WriteForm::create(view);
            let data = DataView {
                filter,
                updated_since,
                decimals,
                table,
                state,
                write,
                editing: BusyFlag::default(),
            };
            data.filter.set_selected(DataFilter::All.label());

            let reload = reload_on(&self.api, &data, &data.filter);
            data.filter.clone().on_change(move |_, _| reload());
            let reload = reload_on(&self.api, &data, &data.updated_since);
            let editing = data.editing.clone();
            data.updated_since
                .clone()
                .on_change(move |_, _| reload())
                .on_focus_change(move |focused| editing.set(focused));
            let reload = reload_on(&self.api, &data, &data.decimals);
            data.decimals.clone().on_change(move |_, _| reload());

            let (api, form) = (Rc::clone(&self.api), data.clone());
            data.write
                .fieldset
                .button("Write", Attrs::new())
                .on_click(move |_| {
                    let (api, form) = (Rc::clone(&api), form.clone());
                    async move {
                        let key = form
                            .write
                            .selected_key()
                            .ok_or_else(|| anyhow::anyhow!("No writable datapoint selected."))?;
                        let value = parse_value(&form.write.value.value());
                        api.write_value(&key, &value).await?;
                        tracing::debug!(%key, %value, "value written");
                        form.write.value.set_value("");
                        form.reload(&api).await;
                        Ok(())
                    }
                });

            let api = Rc::clone(&self.api);
            self.poll = Some(self.poller.start(view.node(), move || {
                let (api, data) = (Rc::clone(&api), data.clone());
                async move {
                    if data.editing.is_busy() {
                        tracing::debug!("skipping data refresh while editing");
                        return;
                    }
                    data.reload(&api).await;
                }
            }));
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            if let Some(poll) = self.poll.take() {
                poll.cancel();
            }
            Ok(())
        })
    }
}
