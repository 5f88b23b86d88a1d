//! System page: restart and factory reset.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use gateway_ui_view::{Attrs, ContainerView, Control, Node};

use crate::api::GatewayApi;
use crate::navigation::Page;
use crate::ports::{Timer, Transport};

const FACTORY_RESET_WARNING: &str = "WARNING: this will clear all configuration including WiFi settings from the device! Are you sure?";

pub struct SystemPage<T, K> {
    api: Rc<GatewayApi<T, K>>,
}

impl<T, K> SystemPage<T, K> {
    pub fn new(api: Rc<GatewayApi<T, K>>) -> Self {
        Self { api }
    }
}

impl<N, T, K> Page<N> for SystemPage<T, K>
where
    N: Node,
    T: Transport + 'static,
    K: Timer + 'static,
{
    fn label(&self) -> &str {
        "System"
    }

    fn enter<'a>(&'a mut self, view: &'a ContainerView<N>) -> LocalBoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            let fieldset = view.fieldset(Some("Control"), Attrs::new());

            let (api, controls) = (Rc::clone(&self.api), fieldset.clone());
            fieldset.button("Restart", Attrs::new()).on_click(move |_| {
                let (api, controls) = (Rc::clone(&api), controls.clone());
                async move {
                    controls.disable();
                    let restarted = api.restart().await;
                    controls.enable();
                    restarted?;
                    tracing::info!("gateway restart requested");
                    Ok(())
                }
            });

            let (api, controls) = (Rc::clone(&self.api), fieldset.clone());
            fieldset
                .button("Factory Reset", Attrs::new())
                .on_click(move |button| {
                    let (api, controls) = (Rc::clone(&api), controls.clone());
                    let confirmed = button.node().confirm(FACTORY_RESET_WARNING);
                    async move {
                        if !confirmed {
                            return Ok(());
                        }
                        controls.disable();
                        let reset = api.factory_reset().await;
                        controls.enable();
                        reset?;
                        tracing::info!("gateway factory reset requested");
                        Ok(())
                    }
                });
            Ok(())
        })
    }

    fn leave(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}
