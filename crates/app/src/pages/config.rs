//! Configuration page: base and MQTT settings, and which datapoints the
//! gateway subscribes to or accepts writes for.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Context;
use futures::future::LocalBoxFuture;

use gateway_ui_domain::data_config::{DataConfigEntry, DataConfigFlags, DataConfigMode};
use gateway_ui_domain::definition::Definition;
use gateway_ui_domain::settings::{BaseSettings, CanMode, CaptureMode, MqttSettings};
use gateway_ui_domain::source::{DataKey, DeviceType, MAX_ADDRESS, Source};
use gateway_ui_view::{
    Attrs, Cell as TableCell, CheckboxView, ContainerView, Control, FieldsetView, Node,
    NumberView, SelectView, TableView, TextView,
};

use super::{StateLine, escape_html};
use crate::api::GatewayApi;
use crate::navigation::Page;
use crate::ports::{Timer, Transport};

/// MQTT settings live in their own flat config category.
const MQTT_CATEGORY: &str = "mqc";

pub struct ConfigPage<T, K> {
    api: Rc<GatewayApi<T, K>>,
}

impl<T, K> ConfigPage<T, K> {
    pub fn new(api: Rc<GatewayApi<T, K>>) -> Self {
        Self { api }
    }
}

impl<N, T, K> Page<N> for ConfigPage<T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    fn label(&self) -> &str {
        "Configuration"
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            view.h1("Configuration", Attrs::new());

            let base = BaseSettingsForm::create(view, &self.api);
            base.load(&self.api).await;

            let mqtt = MqttSettingsForm::create(view, &self.api);
            mqtt.load(&self.api).await;

            let section = DataConfigSection::create(view, &self.api);
            section.load().await;
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

fn ensure_valid<N: Node>(fieldset: &FieldsetView<N>) -> anyhow::Result<()> {
    anyhow::ensure!(fieldset.validate(), "Some settings are invalid.");
    Ok(())
}

// -- base settings ------------------------------------------------------

#[derive(Debug, Clone)]
struct BaseSettingsForm<N> {
    fieldset: FieldsetView<N>,
    display_address: NumberView<N>,
    write_enabled: CheckboxView<N>,
    capture_mode: SelectView<N>,
    can_mode: SelectView<N>,
    state: StateLine<N>,
}

impl<N: Node> BaseSettingsForm<N> {
    fn create<T, K>(view: &ContainerView<N>, api: &Rc<GatewayApi<T, K>>) -> Self
    where
        T: Transport + 'static,
        K: Timer + 'static,
    {
        let fieldset = view.fieldset(Some("Base Settings"), Attrs::new());
        fieldset.disable();
        let display_address = fieldset.number(
            Some(&fieldset.label("Display address", Attrs::new())),
            Attrs::new()
                .flag("required")
                .with("min", BaseSettings::MIN_DISPLAY_ADDRESS)
                .with("max", BaseSettings::MAX_DISPLAY_ADDRESS),
        );
        let write_enabled = fieldset.checkbox(
            Some(&fieldset.label("Enable write access", Attrs::new())),
            Attrs::new(),
        );
        let capture_mode = fieldset.select(
            Some(&fieldset.label("Data capture mode", Attrs::new())),
            CaptureMode::names(),
            Attrs::new(),
        );
        let can_mode = fieldset.select(
            Some(&fieldset.label("CAN mode", Attrs::new())),
            CanMode::names(),
            Attrs::new(),
        );
        let save = fieldset.button("Save", Attrs::new());
        let state = StateLine::create(view);
        let form = Self {
            fieldset,
            display_address,
            write_enabled,
            capture_mode,
            can_mode,
            state,
        };

        let (api, this) = (Rc::clone(api), form.clone());
        save.on_click(move |_| {
            let (api, this) = (Rc::clone(&api), this.clone());
            async move {
                let settings = this.read()?;
                this.fieldset.disable();
                let saved = api.save_system_config(&settings.to_config()).await;
                this.fieldset.enable();
                saved?;
                tracing::info!(?settings, "base settings saved");
                this.state.updated();
                Ok(())
            }
        });
        form
    }

    async fn load<T: Transport, K: Timer>(&self, api: &GatewayApi<T, K>) {
        let loaded = self
            .state
            .track("base settings", async {
                let config = api.system_config().await?;
                anyhow::Ok(BaseSettings::from_config(&config)?)
            })
            .await;
        if let Some(settings) = loaded {
            self.fill(&settings);
            self.fieldset.enable();
            self.state.updated();
        }
    }

    fn fill(&self, settings: &BaseSettings) {
        self.display_address.set_value(settings.display_address);
        self.write_enabled.set_checked(settings.write_enabled);
        self.capture_mode.set_selected(settings.capture_mode.as_str());
        self.can_mode.set_selected(settings.can_mode.as_str());
    }

    fn read(&self) -> anyhow::Result<BaseSettings> {
        ensure_valid(&self.fieldset)?;
        Ok(BaseSettings {
            capture_mode: self.capture_mode.selected().parse()?,
            write_enabled: self.write_enabled.is_checked(),
            display_address: self
                .display_address
                .number()
                .context("Display address is not a number.")?,
            can_mode: self.can_mode.selected().parse()?,
        })
    }
}

// -- mqtt settings ------------------------------------------------------

#[derive(Debug, Clone)]
struct MqttSettingsForm<N> {
    fieldset: FieldsetView<N>,
    enabled: CheckboxView<N>,
    broker: TextView<N>,
    port: NumberView<N>,
    topic: TextView<N>,
    state: StateLine<N>,
}

impl<N: Node> MqttSettingsForm<N> {
    fn create<T, K>(view: &ContainerView<N>, api: &Rc<GatewayApi<T, K>>) -> Self
    where
        T: Transport + 'static,
        K: Timer + 'static,
    {
        let fieldset = view.fieldset(Some("MQTT Settings"), Attrs::new());
        fieldset.disable();
        let enabled = fieldset.checkbox(
            Some(&fieldset.label("Enable MQTT protocol", Attrs::new())),
            Attrs::new(),
        );
        let broker = fieldset.text(
            Some(&fieldset.label("Broker IP", Attrs::new())),
            Attrs::new()
                .flag("required")
                .with("pattern", MqttSettings::BROKER_PATTERN)
                .with("maxlength", MqttSettings::MAX_BROKER_LENGTH),
        );
        let port = fieldset.number(
            Some(&fieldset.label("Broker port", Attrs::new())),
            Attrs::new()
                .flag("required")
                .with("min", 1)
                .with("max", u16::MAX),
        );
        let topic = fieldset.text(
            Some(&fieldset.label("Topic", Attrs::new())),
            Attrs::new()
                .flag("required")
                .with("maxlength", MqttSettings::MAX_TOPIC_LENGTH),
        );
        let save = fieldset.button("Save", Attrs::new());
        let state = StateLine::create(view);
        let form = Self {
            fieldset,
            enabled,
            broker,
            port,
            topic,
            state,
        };

        let (api, this) = (Rc::clone(api), form.clone());
        save.on_click(move |_| {
            let (api, this) = (Rc::clone(&api), this.clone());
            async move {
                let settings = this.read()?;
                this.fieldset.disable();
                let saved = api
                    .save_category_config(MQTT_CATEGORY, &settings.to_config())
                    .await;
                this.fieldset.enable();
                saved?;
                tracing::info!(broker = %settings.broker, port = settings.port, "mqtt settings saved");
                this.state.updated();
                Ok(())
            }
        });
        form
    }

    async fn load<T: Transport, K: Timer>(&self, api: &GatewayApi<T, K>) {
        let loaded = self
            .state
            .track("mqtt settings", async {
                let config = api.category_config(MQTT_CATEGORY).await?;
                anyhow::Ok(MqttSettings::from_config(&config)?)
            })
            .await;
        if let Some(settings) = loaded {
            self.fill(&settings);
            self.fieldset.enable();
            self.state.updated();
        }
    }

    fn fill(&self, settings: &MqttSettings) {
        self.enabled.set_checked(settings.enabled);
        self.broker.set_value(&settings.broker);
        self.port.set_value(settings.port);
        self.topic.set_value(&settings.topic);
    }

    fn read(&self) -> anyhow::Result<MqttSettings> {
        ensure_valid(&self.fieldset)?;
        Ok(MqttSettings {
            enabled: self.enabled.is_checked(),
            broker: self.broker.value(),
            port: self.port.number().context("Broker port is not a number.")?,
            topic: self.topic.value(),
        })
    }
}

// -- data configuration -------------------------------------------------

/// Add form and table of the configured datapoints.
struct DataConfigSection<N, T, K> {
    api: Rc<GatewayApi<T, K>>,
    add: FieldsetView<N>,
    value_id: SelectView<N>,
    source_type: SelectView<N>,
    source_address: NumberView<N>,
    mode: SelectView<N>,
    table: TableView<N>,
    state: StateLine<N>,
    definitions: RefCell<Vec<Definition>>,
}

/// What the add form offers for the picked definition.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceChoice {
    types: Vec<DeviceType>,
    /// `None` lets the user type any address.
    fixed_address: Option<u8>,
    modes: &'static [DataConfigMode],
    default_mode: DataConfigMode,
}

impl SourceChoice {
    fn for_definition(definition: &Definition) -> Self {
        let types = match definition.source.device_type {
            DeviceType::Any => DeviceType::SELECTABLE.to_vec(),
            fixed => vec![fixed],
        };
        Self {
            types,
            fixed_address: definition.source.address,
            modes: DataConfigMode::allowed_for(definition.access_mode),
            default_mode: DataConfigMode::default_for(definition.access_mode),
        }
    }
}

impl<N, T, K> DataConfigSection<N, T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    fn create(view: &ContainerView<N>, api: &Rc<GatewayApi<T, K>>) -> Rc<Self> {
        let section = view.section("Data configuration", Attrs::new());
        let add = section.fieldset(Some("Add configuration"), Attrs::new());
        add.disable();
        let value_id = add.select(
            Some(&add.label("ID", Attrs::new())),
            Vec::<&str>::new(),
            Attrs::new().flag("required"),
        );
        let source_type = add.select(
            Some(&add.label("Source Type", Attrs::new())),
            Vec::<&str>::new(),
            Attrs::new().flag("required"),
        );
        let source_address = add.number(
            Some(&add.label("Source Address", Attrs::new())),
            Attrs::new()
                .flag("required")
                .with("min", 0)
                .with("max", MAX_ADDRESS),
        );
        let mode = add.select(
            Some(&add.label("Mode", Attrs::new())),
            Vec::<&str>::new(),
            Attrs::new().flag("required"),
        );
        let add_button = add.button("Add", Attrs::new());
        let table = section.table(Attrs::new());
        let state = StateLine::create(&section);

        let this = Rc::new(Self {
            api: Rc::clone(api),
            add,
            value_id,
            source_type,
            source_address,
            mode,
            table,
            state,
            definitions: RefCell::default(),
        });

        let on_pick = Rc::clone(&this);
        this.value_id
            .clone()
            .on_change(move |_, _| on_pick.update_source_and_mode());
        let on_add = Rc::clone(&this);
        add_button.on_click(move |_| {
            let this = Rc::clone(&on_add);
            async move { this.add_entry().await }
        });
        this
    }

    async fn load(self: &Rc<Self>) {
        let definitions = self.state.track("definitions", self.api.definitions()).await;
        if let Some(definitions) = definitions {
            *self.definitions.borrow_mut() = definitions;
            self.refresh_ids();
        }
        self.reload_entries().await;
    }

    async fn reload_entries(self: &Rc<Self>) {
        if let Some(entries) = self
            .state
            .track("data configuration", self.api.data_config())
            .await
        {
            self.render(&entries);
        }
    }

    fn refresh_ids(&self) {
        let options: Vec<(u16, String)> = self
            .definitions
            .borrow()
            .iter()
            .map(|definition| (definition.id, definition.display_label()))
            .collect();
        let Some((first, _)) = options.first().cloned() else {
            self.add.disable();
            return;
        };
        self.value_id.set_options(options);
        self.value_id.set_selected(&first.to_string());
        self.update_source_and_mode();
        self.add.enable();
    }

    fn picked_definition(&self) -> Option<Definition> {
        let id: u16 = self.value_id.selected().parse().ok()?;
        self.definitions
            .borrow()
            .iter()
            .find(|definition| definition.id == id)
            .cloned()
    }

    /// Constrain source and mode to what the picked definition allows.
    fn update_source_and_mode(&self) {
        let Some(definition) = self.picked_definition() else {
            return;
        };
        let choice = SourceChoice::for_definition(&definition);

        self.source_type.set_options(
            choice
                .types
                .iter()
                .map(|device_type| (device_type, device_type.label())),
        );
        if choice.types.len() > 1 {
            self.source_type.enable();
        } else {
            self.source_type.disable();
        }

        match choice.fixed_address {
            Some(address) => {
                self.source_address.set_value(address);
                self.source_address.disable();
            }
            None => {
                self.source_address.set_value(1);
                self.source_address.enable();
            }
        }

        self.mode
            .set_options(choice.modes.iter().map(ToString::to_string));
        self.mode.set_selected(&choice.default_mode.to_string());
        if choice.modes.len() > 1 {
            self.mode.enable();
        } else {
            self.mode.disable();
        }
    }

    async fn add_entry(self: &Rc<Self>) -> anyhow::Result<()> {
        ensure_valid(&self.add)?;
        let definition = self
            .picked_definition()
            .context("No definition selected.")?;
        let device_type: DeviceType = self.source_type.selected().parse()?;
        let address: u8 = self
            .source_address
            .number()
            .context("Source address is not a number.")?;
        let mode: DataConfigMode = self.mode.selected().parse()?;
        let key = DataKey::new(Source::new(device_type, address), definition.id);

        self.add.disable();
        let configured = self.api.configure_data(&key, mode.flags()).await;
        self.add.enable();
        configured?;
        tracing::info!(%key, %mode, "datapoint configured");
        self.reload_entries().await;
        Ok(())
    }

    fn render(self: &Rc<Self>, entries: &[DataConfigEntry]) {
        self.table.clear();
        if entries.is_empty() {
            self.state.notice("No data has been configured yet.");
            return;
        }
        self.table.add_row(Attrs::new()).add_headers(
            ["Source", "ID", "Name", "Unit", "Subscribed", "Writable"],
            Attrs::new(),
        );
        for entry in entries {
            let flags = Rc::new(Cell::new(entry.flags()));
            let subscribed = self.flag_checkbox(entry.key(), &flags, |flags| &mut flags.subscribed);
            let writable = self.flag_checkbox(entry.key(), &flags, |flags| &mut flags.writable);
            if !entry.access_mode.is_writable() {
                writable.disable();
            }
            let row = self.table.add_row(Attrs::new());
            row.add_columns(
                [
                    entry.source.to_string(),
                    entry.value_id.to_string(),
                    escape_html(&entry.name),
                    escape_html(&entry.unit),
                ],
                Attrs::new(),
            );
            row.add_column(TableCell::view(&subscribed), Attrs::new());
            row.add_column(TableCell::view(&writable), Attrs::new());
        }
        self.state.updated();
    }

    /// A checkbox toggling one flag of a configured datapoint. An entry
    /// left with neither flag is removed and the table reloaded.
    fn flag_checkbox(
        self: &Rc<Self>,
        key: DataKey,
        flags: &Rc<Cell<DataConfigFlags>>,
        flag: fn(&mut DataConfigFlags) -> &mut bool,
    ) -> CheckboxView<N> {
        let mut current = flags.get();
        let checkbox = CheckboxView::create(self.table.node(), None, &Attrs::new());
        checkbox.set_checked(*flag(&mut current));

        let (this, flags) = (Rc::clone(self), Rc::clone(flags));
        checkbox.on_change(move |checked, checkbox| {
            let (this, flags, checkbox) = (Rc::clone(&this), Rc::clone(&flags), checkbox.clone());
            let mut next = flags.get();
            *flag(&mut next) = checked;
            checkbox.clone().spawn(async move {
                checkbox.disable();
                let applied = this.apply(&key, next).await;
                checkbox.enable();
                match applied {
                    Ok(()) => flags.set(next),
                    Err(error) => {
                        tracing::warn!(%error, %key, "failed to change data configuration");
                        checkbox.node().alert(&error.to_string());
                        checkbox.set_checked(!checked);
                        return;
                    }
                }
                if !(next.subscribed || next.writable) {
                    this.reload_entries().await;
                }
            });
        })
    }

    async fn apply(&self, key: &DataKey, flags: DataConfigFlags) -> anyhow::Result<()> {
        if flags.subscribed || flags.writable {
            self.api.configure_data(key, flags).await?;
        } else {
            self.api.delete_data_config(key).await?;
        }
        Ok(())
    }
}
