//! Typed gateway API over [`HttpClient`].
//!
//! One method per endpoint of the device REST API (latest shapes only).
//! Config endpoints speak the `category.key=value;` text format, the rest
//! JSON.

use std::time::Duration;

use serde::Serialize;

use gateway_ui_domain::config_text::{ConfigDocument, FlatConfig};
use gateway_ui_domain::conversion::{Codec, Converter};
use gateway_ui_domain::data_config::{DataConfigEntry, DataConfigFlags, LegacyDataKey};
use gateway_ui_domain::datapoint::DataSnapshot;
use gateway_ui_domain::definition::Definition;
use gateway_ui_domain::query::DataQuery;
use gateway_ui_domain::source::DataKey;
use gateway_ui_domain::status::{DeviceList, SystemStatus};

use crate::client::{ClientError, HttpClient};
use crate::ports::{Timer, Transport};

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ClientError> {
    Ok(serde_json::to_string(value)?)
}

/// Client for the gateway REST API.
#[derive(Debug, Clone)]
pub struct GatewayApi<T, K> {
    client: HttpClient<T, K>,
}

impl<T: Transport, K: Timer> GatewayApi<T, K> {
    #[must_use]
    pub fn new(client: HttpClient<T, K>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &HttpClient<T, K> {
        &self.client
    }

    // -- system ---------------------------------------------------------

    /// `GET /system/config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure or malformed config text.
    #[tracing::instrument(skip(self))]
    pub async fn system_config(&self) -> Result<ConfigDocument, ClientError> {
        let response = self.client.get("/system/config").await?;
        Ok(response.text().parse()?)
    }

    /// `PUT /system/config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, config))]
    pub async fn save_system_config(&self, config: &ConfigDocument) -> Result<(), ClientError> {
        self.client.put("/system/config", config.to_string()).await?;
        Ok(())
    }

    /// `GET /system/config/{category}` for one flat category such as `mqc`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure or malformed config text.
    #[tracing::instrument(skip(self))]
    pub async fn category_config(&self, category: &str) -> Result<FlatConfig, ClientError> {
        let response = self
            .client
            .get(&format!("/system/config/{category}"))
            .await?;
        Ok(response.text().parse()?)
    }

    /// `PUT /system/config/{category}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, config))]
    pub async fn save_category_config(
        &self,
        category: &str,
        config: &FlatConfig,
    ) -> Result<(), ClientError> {
        self.client
            .put(&format!("/system/config/{category}"), config.to_string())
            .await?;
        Ok(())
    }

    /// `GET /system/status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn system_status(&self) -> Result<SystemStatus, ClientError> {
        self.client.get("/system/status").await?.json()
    }

    /// `GET /system/logs` as plain text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self))]
    pub async fn system_logs(&self) -> Result<String, ClientError> {
        Ok(self.client.get("/system/logs").await?.into_text())
    }

    /// `POST /system/reset`: restart the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self) -> Result<(), ClientError> {
        self.client.post("/system/reset", "").await?;
        Ok(())
    }

    /// `POST /system/factory-reset`: wipe every setting, WiFi included.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self))]
    pub async fn factory_reset(&self) -> Result<(), ClientError> {
        self.client.post("/system/factory-reset", "").await?;
        Ok(())
    }

    /// `GET /devices`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn devices(&self) -> Result<DeviceList, ClientError> {
        self.client.get("/devices").await?.json()
    }

    // -- definitions and conversions -----------------------------------

    /// `GET /definitions`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn definitions(&self) -> Result<Vec<Definition>, ClientError> {
        self.client.get("/definitions").await?.json()
    }

    /// `PUT /definitions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, definition), fields(id = definition.id))]
    pub async fn save_definition(&self, definition: &Definition) -> Result<(), ClientError> {
        let body = to_json(definition)?;
        self.client
            .put(&format!("/definitions/{}", definition.id), body)
            .await?;
        Ok(())
    }

    /// `DELETE /definitions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_definition(&self, id: u16) -> Result<(), ClientError> {
        self.client.delete(&format!("/definitions/{id}")).await?;
        Ok(())
    }

    /// `GET /codecs`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn codecs(&self) -> Result<Vec<Codec>, ClientError> {
        self.client.get("/codecs").await?.json()
    }

    /// `GET /converters`, built-in and custom.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn converters(&self) -> Result<Vec<Converter>, ClientError> {
        self.client.get("/converters").await?.json()
    }

    /// `GET /converters/custom/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn custom_converter(&self, id: u32) -> Result<Converter, ClientError> {
        self.client
            .get(&format!("/converters/custom/{id}"))
            .await?
            .json()
    }

    /// `PUT /converters/custom/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, converter), fields(id = converter.id))]
    pub async fn save_custom_converter(&self, converter: &Converter) -> Result<(), ClientError> {
        let body = to_json(converter)?;
        self.client
            .put(&format!("/converters/custom/{}", converter.id), body)
            .await?;
        Ok(())
    }

    /// `DELETE /converters/custom/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_custom_converter(&self, id: u32) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/converters/custom/{id}"))
            .await?;
        Ok(())
    }

    // -- data -----------------------------------------------------------

    /// `GET /data{query}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self), fields(query = %query))]
    pub async fn data(&self, query: &DataQuery) -> Result<DataSnapshot, ClientError> {
        self.client.get(&format!("/data{query}")).await?.json()
    }

    /// `PUT /data/{type}/{address}/{id}` with the new value as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn write_value(
        &self,
        key: &DataKey,
        value: &serde_json::Value,
    ) -> Result<(), ClientError> {
        self.client
            .put(&format!("/data/{}", key.path()), to_json(value)?)
            .await?;
        Ok(())
    }

    /// `GET /data/config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request or decoding failure.
    #[tracing::instrument(skip(self))]
    pub async fn data_config(&self) -> Result<Vec<DataConfigEntry>, ClientError> {
        self.client.get("/data/config").await?.json()
    }

    /// `PUT /data/config/{type}/{address}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn configure_data(
        &self,
        key: &DataKey,
        flags: DataConfigFlags,
    ) -> Result<(), ClientError> {
        self.client
            .put(&format!("/data/config/{}", key.path()), to_json(&flags)?)
            .await?;
        Ok(())
    }

    /// `DELETE /data/config/{type}/{address}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn delete_data_config(&self, key: &DataKey) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/data/config/{}", key.path()))
            .await?;
        Ok(())
    }

    // -- legacy subscriptions / writables --------------------------------

    /// `POST /subscriptions` with the keys to subscribe to.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, keys))]
    pub async fn subscribe(&self, keys: &[DataKey]) -> Result<(), ClientError> {
        self.post_keys("/subscriptions", keys).await
    }

    /// `DELETE /subscriptions/{type}/{address}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn unsubscribe(&self, key: &DataKey) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/subscriptions/{}", key.path()))
            .await?;
        Ok(())
    }

    /// `POST /writable` with the keys to accept writes for.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self, keys))]
    pub async fn allow_writes(&self, keys: &[DataKey]) -> Result<(), ClientError> {
        self.post_keys("/writable", keys).await
    }

    /// `DELETE /writable/{type}/{address}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn deny_writes(&self, key: &DataKey) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/writable/{}", key.path()))
            .await?;
        Ok(())
    }

    async fn post_keys(&self, path: &str, keys: &[DataKey]) -> Result<(), ClientError> {
        let keys: Vec<LegacyDataKey> = keys.iter().copied().map(LegacyDataKey::from).collect();
        self.client.post(path, to_json(&keys)?).await?;
        Ok(())
    }

    /// Default timeout of the underlying client.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.client.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::future::{Future, Pending, pending};
    use std::rc::Rc;

    use gateway_ui_domain::source::{DeviceType, Source};

    use crate::ports::{HttpMethod, HttpRequest, HttpResponse, TransportError};

    /// Replies by `METHOD url`; unknown routes get a 404.
    #[derive(Clone, Default)]
    struct RouteTransport {
        routes: Rc<RefCell<HashMap<String, HttpResponse>>>,
        sent: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl RouteTransport {
        fn route(&self, method: HttpMethod, url: &str, body: &str) {
            self.routes
                .borrow_mut()
                .insert(format!("{method} {url}"), HttpResponse::ok(body));
        }
    }

    impl Transport for RouteTransport {
        fn send(
            &self,
            request: HttpRequest,
        ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
            let reply = self
                .routes
                .borrow()
                .get(&format!("{} {}", request.method, request.url))
                .cloned()
                .unwrap_or(HttpResponse {
                    status: 404,
                    status_text: "Not Found".to_string(),
                    body: String::new(),
                });
            self.sent.borrow_mut().push(request);
            std::future::ready(Ok(reply))
        }
    }

    struct NeverTimer;

    impl Timer for NeverTimer {
        type Sleep = Pending<()>;

        fn sleep(&self, _duration: Duration) -> Self::Sleep {
            pending()
        }
    }

    fn api(transport: &RouteTransport) -> GatewayApi<RouteTransport, NeverTimer> {
        GatewayApi::new(HttpClient::new(
            transport.clone(),
            NeverTimer,
            "/api",
            Duration::from_secs(5),
        ))
    }

    fn key() -> DataKey {
        DataKey::new(Source::new(DeviceType::HeatingCircuit, 1), 9)
    }

    #[tokio::test]
    async fn should_parse_grouped_system_config() {
        let transport = RouteTransport::default();
        transport.route(HttpMethod::Get, "/api/system/config", "dta.mode=Any;\nsep.display=2;\n");
        let config = api(&transport).system_config().await.unwrap();
        assert_eq!(config.get("dta", "mode"), Some("Any"));
        assert_eq!(config.get("sep", "display"), Some("2"));
    }

    #[tokio::test]
    async fn should_put_flat_category_config() {
        let transport = RouteTransport::default();
        transport.route(HttpMethod::Put, "/api/system/config/mqc", "");
        let mut config = FlatConfig::default();
        config.set("enabled", true);
        api(&transport)
            .save_category_config("mqc", &config)
            .await
            .unwrap();
        let sent = transport.sent.borrow();
        assert_eq!(sent[0].body.as_deref(), Some("enabled=true;"));
    }

    #[tokio::test]
    async fn should_send_data_config_flags_as_json() {
        let transport = RouteTransport::default();
        transport.route(HttpMethod::Put, "/api/data/config/HEA/1/9", "");
        api(&transport)
            .configure_data(
                &key(),
                DataConfigFlags {
                    subscribed: true,
                    writable: false,
                },
            )
            .await
            .unwrap();
        let sent = transport.sent.borrow();
        assert_eq!(
            sent[0].body.as_deref(),
            Some(r#"{"subscribed":true,"writable":false}"#)
        );
    }

    #[tokio::test]
    async fn should_post_legacy_subscription_keys() {
        let transport = RouteTransport::default();
        transport.route(HttpMethod::Post, "/api/subscriptions", "");
        api(&transport).subscribe(&[key()]).await.unwrap();
        let sent = transport.sent.borrow();
        assert_eq!(
            sent[0].body.as_deref(),
            Some(r#"[{"valueId":9,"source":"HEA/1"}]"#)
        );
    }

    #[tokio::test]
    async fn should_address_items_by_path() {
        let transport = RouteTransport::default();
        transport.route(HttpMethod::Put, "/api/data/HEA/1/9", "");
        transport.route(HttpMethod::Delete, "/api/writable/HEA/1/9", "");
        let api = api(&transport);
        api.write_value(&key(), &serde_json::json!(21.5)).await.unwrap();
        api.deny_writes(&key()).await.unwrap();
        let sent = transport.sent.borrow();
        assert_eq!(sent[0].body.as_deref(), Some("21.5"));
        assert_eq!(sent[1].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn should_append_data_query() {
        let transport = RouteTransport::default();
        transport.route(
            HttpMethod::Get,
            "/api/data?filter=configured&numbersAsDecimals",
            r#"{"totalItems":0,"actualItems":0,"items":{}}"#,
        );
        let query = DataQuery::new(gateway_ui_domain::query::DataFilter::Configured)
            .numbers_as_decimals(true);
        let data = api(&transport).data(&query).await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn should_surface_missing_endpoint_as_http_error() {
        let transport = RouteTransport::default();
        let error = api(&transport).codecs().await.unwrap_err();
        assert_eq!(error.to_string(), "HTTP error: 404 Not Found.");
    }
}
