//! HTTP client: base URL, per-call timeout and status normalisation.
//!
//! Every call is independent and at-most-once: no retries, no caching.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{self, Either};
use serde::de::DeserializeOwned;

use gateway_ui_domain::error::ParseError;

use crate::ports::{HttpMethod, HttpRequest, HttpResponse, Timer, Transport, TransportError};

/// Errors returned by [`HttpClient`] and the typed API built on it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The timeout elapsed before the response arrived.
    #[error("Request timed out after {} ms.", after.as_millis())]
    Timeout { after: Duration },
    /// The gateway answered with a non-success status.
    #[error("HTTP error: {status} {status_text}.")]
    Http { status: u16, status_text: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid config response: {0}")]
    Format(#[from] ParseError),
}

impl ClientError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    inner: HttpResponse,
}

impl Response {
    #[must_use]
    pub fn status(&self) -> u16 {
        self.inner.status
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.inner.body
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.inner.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.inner.body)?)
    }
}

/// Issues requests against `base_url`, racing each one against a timer.
#[derive(Debug, Clone)]
pub struct HttpClient<T, K> {
    transport: T,
    timer: K,
    base_url: String,
    timeout: Duration,
}

impl<T: Transport, K: Timer> HttpClient<T, K> {
    /// Create a client for `base_url` (e.g. `http://192.168.1.2/api`, or
    /// `/api` for the same origin) with a default per-call `timeout`.
    pub fn new(transport: T, timer: K, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            timer,
            base_url: base_url.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `method path` with an optional body.
    ///
    /// `timeout` overrides the client default for this call. When it elapses
    /// first, the in-flight transport future is dropped, which aborts the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] when the timeout elapses,
    /// [`ClientError::Http`] for a non-2xx status and
    /// [`ClientError::Transport`] for network failures.
    #[tracing::instrument(skip(self, body), fields(base_url = %self.base_url))]
    pub async fn fetch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Response, ClientError> {
        let after = timeout.unwrap_or(self.timeout);
        let request = HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            body,
        };
        let send = pin!(self.transport.send(request));
        let sleep = pin!(self.timer.sleep(after));
        let response = match future::select(send, sleep).await {
            Either::Left((result, _)) => result?,
            Either::Right(((), _)) => {
                tracing::debug!(?after, "request timed out");
                return Err(ClientError::Timeout { after });
            }
        };
        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(Response { inner: response })
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub fn get<'a>(&'a self, path: &'a str) -> impl Future<Output = Result<Response, ClientError>> + 'a {
        self.fetch(HttpMethod::Get, path, None, None)
    }

    /// `POST path` with `body`.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub fn post<'a>(
        &'a self,
        path: &'a str,
        body: impl Into<String>,
    ) -> impl Future<Output = Result<Response, ClientError>> + 'a {
        self.fetch(HttpMethod::Post, path, Some(body.into()), None)
    }

    /// `PUT path` with `body`.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub fn put<'a>(
        &'a self,
        path: &'a str,
        body: impl Into<String>,
    ) -> impl Future<Output = Result<Response, ClientError>> + 'a {
        self.fetch(HttpMethod::Put, path, Some(body.into()), None)
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub fn delete<'a>(&'a self, path: &'a str) -> impl Future<Output = Result<Response, ClientError>> + 'a {
        self.fetch(HttpMethod::Delete, path, None, None)
    }
}
