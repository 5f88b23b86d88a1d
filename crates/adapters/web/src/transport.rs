//! `fetch` transport built on `gloo-net`.
//!
//! Each request carries its own `AbortController`; dropping the request
//! future before the body arrived aborts the underlying fetch.

use std::future::Future;

use gloo_net::http::{Request, RequestBuilder};
use web_sys::AbortController;

use gateway_ui_app::ports::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

/// Aborts the fetch unless it was disarmed after completion.
struct AbortOnDrop {
    controller: AbortController,
    armed: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("aborting fetch");
            self.controller.abort();
        }
    }
}

fn network(error: impl std::fmt::Display) -> TransportError {
    TransportError::Network(error.to_string())
}

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

impl Transport for FetchTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        async move {
            let controller =
                AbortController::new().map_err(|error| network(format!("{error:?}")))?;
            let mut guard = AbortOnDrop {
                controller,
                armed: true,
            };
            let signal = guard.controller.signal();
            let builder = builder(request.method, &request.url).abort_signal(Some(&signal));
            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(network)?;

            let response = prepared.send().await.map_err(network)?;
            let body = response.text().await.map_err(network)?;
            guard.armed = false;
            Ok(HttpResponse {
                status: response.status(),
                status_text: response.status_text(),
                body,
            })
        }
    }
}
