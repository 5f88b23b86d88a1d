//! Scripted transport: canned replies per `(method, url)`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::{self, Future};
use std::rc::Rc;

use gateway_ui_app::ports::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(TransportError),
    /// Never answers, like a gateway that went away mid-request.
    Hang,
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<(HttpMethod, String), Reply>,
    requests: Vec<HttpRequest>,
    in_flight: usize,
}

/// Answers requests from a script and records every request sent.
///
/// Unscripted routes answer `404 Not Found`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&self, method: HttpMethod, url: &str, reply: Reply) -> &Self {
        self.script
            .borrow_mut()
            .routes
            .insert((method, url.to_string()), reply);
        self
    }

    /// Answer `method url` with `200 OK` and `body`.
    pub fn ok(&self, method: HttpMethod, url: &str, body: &str) -> &Self {
        self.route(method, url, Reply::Respond(HttpResponse::ok(body)))
    }

    /// Answer `method url` with an empty body and `status`.
    pub fn status(&self, method: HttpMethod, url: &str, status: u16, status_text: &str) -> &Self {
        let response = HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: String::new(),
        };
        self.route(method, url, Reply::Respond(response))
    }

    /// Never answer `method url`.
    pub fn hang(&self, method: HttpMethod, url: &str) -> &Self {
        self.route(method, url, Reply::Hang)
    }

    /// Fail `method url` at the network level.
    pub fn fail(&self, method: HttpMethod, url: &str, message: &str) -> &Self {
        self.route(method, url, Reply::Fail(TransportError::Network(message.to_string())))
    }

    /// Every request sent so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.borrow().requests.clone()
    }

    /// Requests sent to `method url` so far.
    #[must_use]
    pub fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.script
            .borrow()
            .requests
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }

    /// Hanging requests whose future is still alive.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.script.borrow().in_flight
    }
}

/// Counts a hanging request until its future is dropped.
struct InFlight(Rc<RefCell<Script>>);

impl InFlight {
    fn enter(script: Rc<RefCell<Script>>) -> Self {
        script.borrow_mut().in_flight += 1;
        Self(script)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.borrow_mut().in_flight -= 1;
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        tracing::debug!(method = %request.method, url = %request.url, "scripted request");
        let reply = {
            let mut script = self.script.borrow_mut();
            let reply = script
                .routes
                .get(&(request.method, request.url.clone()))
                .cloned();
            script.requests.push(request);
            reply
        };
        let script = Rc::clone(&self.script);
        async move {
            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(error)) => Err(error),
                Some(Reply::Hang) => {
                    let _in_flight = InFlight::enter(script);
                    future::pending().await
                }
                None => Ok(HttpResponse {
                    status: 404,
                    status_text: "Not Found".to_string(),
                    body: String::new(),
                }),
            }
        }
    }
}
