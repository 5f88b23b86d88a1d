//! Definitions page: datapoint definitions, codecs and converters.

use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use gateway_ui_domain::conversion::{Codec, Converter};
use gateway_ui_domain::definition::Definition;
use gateway_ui_view::{Attrs, ButtonView, Cell, ContainerView, Node, RowView, TableView};

use super::{escape_html, notice};
use crate::api::GatewayApi;
use crate::navigation::Page;
use crate::ports::{Timer, Transport};

pub struct DefinitionsPage<T, K> {
    api: Rc<GatewayApi<T, K>>,
}

impl<T, K> DefinitionsPage<T, K> {
    pub fn new(api: Rc<GatewayApi<T, K>>) -> Self {
        Self { api }
    }
}

impl<N, T, K> Page<N> for DefinitionsPage<T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    fn label(&self) -> &str {
        "Definitions"
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            view.h1("Datapoint definitions", Attrs::new());
            let table = view.table(Attrs::new());
            match self.api.definitions().await {
                Ok(definitions) => render_definitions(&table, &definitions, &self.api),
                Err(error) => {
                    tracing::warn!(%error, "failed to load definitions");
                    notice(view, &error);
                }
            }

            let codecs = view.section("Codecs", Attrs::new());
            match self.api.codecs().await {
                Ok(list) => render_codecs(&codecs.table(Attrs::new()), &list),
                Err(error) => {
                    tracing::warn!(%error, "failed to load codecs");
                    notice(&codecs, &error);
                }
            }

            let converters = view.section("Converters", Attrs::new());
            match self.api.converters().await {
                Ok(list) => render_converters(&converters.table(Attrs::new()), &list, &self.api),
                Err(error) => {
                    tracing::warn!(%error, "failed to load converters");
                    notice(&converters, &error);
                }
            }
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// A `Delete` button removing `row` once the user confirmed `question` and
/// `delete` succeeded.
fn delete_button<N, F, Fut>(row: &RowView<N>, question: String, delete: F) -> ButtonView<N>
where
    N: Node,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    let row = row.clone();
    ButtonView::create(row.node(), "Delete", &Attrs::new()).on_click(move |button| {
        let confirmed = button.node().confirm(&question);
        let deleting = confirmed.then(&delete);
        let row = row.clone();
        async move {
            if let Some(deleting) = deleting {
                deleting.await?;
                row.remove();
            }
            Ok(())
        }
    })
}

fn render_definitions<N, T, K>(
    table: &TableView<N>,
    definitions: &[Definition],
    api: &Rc<GatewayApi<T, K>>,
) where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    table.clear();
    table.add_row(Attrs::new()).add_headers(
        [
            "ID",
            "Name",
            "Unit",
            "Access mode",
            "Source",
            "Converter",
            "Codec",
            "",
        ],
        Attrs::new(),
    );
    for definition in definitions {
        let row = table.add_row(Attrs::new());
        row.add_columns(definition_columns(definition), Attrs::new());
        let (api, id) = (Rc::clone(api), definition.id);
        let delete = delete_button(
            &row,
            format!("Delete definition {}?", definition.display_label()),
            move || {
                let api = Rc::clone(&api);
                async move {
                    api.delete_definition(id).await?;
                    tracing::info!(id, "definition deleted");
                    Ok(())
                }
            },
        );
        row.add_column(Cell::view(&delete), Attrs::new());
    }
}

fn definition_columns(definition: &Definition) -> [String; 7] {
    let optional = |text: Option<&String>| text.map(|text| escape_html(text)).unwrap_or_default();
    [
        definition.id.to_string(),
        escape_html(&definition.name),
        escape_html(&definition.unit),
        definition.access_mode.to_string(),
        definition.source.to_string(),
        optional(definition.converter.as_ref()),
        optional(definition.codec.as_ref()),
    ]
}

fn render_codecs<N: Node>(table: &TableView<N>, codecs: &[Codec]) {
    table
        .add_row(Attrs::new())
        .add_headers(["ID", "Key", "Description"], Attrs::new());
    for codec in codecs {
        table.add_row(Attrs::new()).add_columns(
            [
                codec.id.to_string(),
                escape_html(&codec.key),
                escape_html(&codec.description),
            ],
            Attrs::new(),
        );
    }
}

fn render_converters<N, T, K>(
    table: &TableView<N>,
    converters: &[Converter],
    api: &Rc<GatewayApi<T, K>>,
) where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    table
        .add_row(Attrs::new())
        .add_headers(["ID", "Key", "Description", "Type", ""], Attrs::new());
    for converter in converters {
        let row = table.add_row(Attrs::new());
        row.add_columns(
            [
                converter.id.to_string(),
                escape_html(&converter.key),
                escape_html(&converter.description),
                converter_kind(converter).to_string(),
            ],
            Attrs::new(),
        );
        if !converter.is_custom() {
            row.add_column("", Attrs::new());
            continue;
        }
        let (api, id) = (Rc::clone(api), converter.id);
        let delete = delete_button(
            &row,
            format!("Delete converter {}?", converter.key),
            move || {
                let api = Rc::clone(&api);
                async move {
                    api.delete_custom_converter(id).await?;
                    tracing::info!(id, "custom converter deleted");
                    Ok(())
                }
            },
        );
        row.add_column(Cell::view(&delete), Attrs::new());
    }
}

fn converter_kind(converter: &Converter) -> &'static str {
    if converter.is_custom() {
        "Custom"
    } else {
        "Built-in"
    }
}
