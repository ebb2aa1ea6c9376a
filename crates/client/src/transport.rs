//! HTTP transport seam.
//!
//! Everything above this module speaks `Request`/`Response`. `HttpTransport`
//! sends them with reqwest; `InMemoryTransport` answers from canned responses
//! for tests and offline demos.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use stockroom_views::{MultipartForm, WireBody};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One API call. `path` is relative to the API base and starts with `/api/`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<WireBody>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: WireBody) -> Self {
        self.body = Some(body);
        self
    }

    /// JSON body from any serializable value.
    pub fn json<B: serde::Serialize>(self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body)?;
        Ok(self.body(WireBody::Json(value)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Non-2xx becomes `ClientError::Api` with the server's message.
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::api(self.status, &self.body))
        }
    }

    /// Decode a 2xx body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        let this = self.error_for_status()?;
        let body = if this.body.trim().is_empty() {
            "null"
        } else {
            this.body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request. Only connection-level failures are errors; any HTTP
    /// status comes back as a `Response`.
    async fn send(&self, request: Request) -> ClientResult<Response>;
}

/// reqwest-backed transport with bearer auth and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = Self::new(&config.api_url, config.request_timeout)?;
        Ok(match &config.auth_token {
            Some(token) => transport.with_token(token.clone()),
            None => transport,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn multipart(form: MultipartForm) -> ClientResult<reqwest::multipart::Form> {
        let mut out = reqwest::multipart::Form::new();
        for (name, value) in form.fields {
            out = out.text(name, value);
        }
        if let Some((name, file)) = form.file {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| ClientError::Decode(format!("invalid content type: {e}")))?;
            out = out.part(name, part);
        }
        Ok(out)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> ClientResult<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut req = self.client.request(method, &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req = match request.body {
            None => req,
            Some(WireBody::Json(value)) => req.json(&value),
            Some(WireBody::Multipart(form)) => req.multipart(Self::multipart(form)?),
        };

        let resp = req.send().await.map_err(|e| {
            error!(method = request.method.as_str(), path = %request.path, error = %e, "request failed");
            ClientError::Network(e.to_string())
        })?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        debug!(method = request.method.as_str(), path = %request.path, status, "response");
        Ok(Response { status, body })
    }
}

type Route = (Method, String);

/// Canned-response transport.
///
/// Responses are queued per `(method, path)`; the last queued response for a
/// route keeps answering once the queue is down to one. Unrouted requests get
/// a 404. Every request is recorded.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransport {
    inner: Arc<Mutex<InMemoryState>>,
    latency: Option<Duration>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    routes: HashMap<Route, VecDeque<ClientResult<Response>>>,
    requests: Vec<Request>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, to exercise in-flight behaviour.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn respond(&self, method: Method, path: &str, response: ClientResult<Response>) {
        self.state()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn respond_json(&self, method: Method, path: &str, value: serde_json::Value) {
        self.respond(method, path, Ok(Response::ok_json(&value)));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: Request) -> ClientResult<Response> {
        let reply = {
            let mut state = self.state();
            let route = (request.method, request.path.clone());
            state.requests.push(request);
            match state.routes.get_mut(&route) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        reply.unwrap_or_else(|| Ok(Response::new(404, r#"{"message":"no such route"}"#)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_decoding_and_status_mapping() {
        let ok = Response::new(200, r#"[1,2]"#);
        assert_eq!(ok.json::<Vec<i64>>().unwrap(), vec![1, 2]);
        let empty = Response::new(204, "");
        assert_eq!(empty.json::<Option<i64>>().unwrap(), None);
        let bad = Response::new(422, r#"{"message":"SKU taken"}"#);
        assert_eq!(
            bad.json::<serde_json::Value>().unwrap_err(),
            ClientError::Api {
                status: 422,
                message: "SKU taken".into()
            }
        );
        let garbage = Response::new(200, "<html>");
        assert!(matches!(garbage.json::<Vec<i64>>(), Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn in_memory_routes_and_records() {
        let t = InMemoryTransport::new();
        t.respond(Method::Get, "/api/x", Ok(Response::new(500, "first")));
        t.respond(Method::Get, "/api/x", Ok(Response::new(200, "second")));

        let first = t.send(Request::get("/api/x")).await.unwrap();
        let second = t.send(Request::get("/api/x")).await.unwrap();
        let third = t.send(Request::get("/api/x")).await.unwrap();
        let missing = t.send(Request::get("/api/y")).await.unwrap();

        assert_eq!((first.status, second.status, third.status), (500, 200, 200));
        assert_eq!(missing.status, 404);
        assert_eq!(t.count(Method::Get, "/api/x"), 3);
        assert_eq!(t.requests().len(), 4);
    }

    #[test]
    fn request_builder() {
        let req = Request::get("/api/orders/search").query("q", "SO 1");
        assert_eq!(req.query, vec![("q".to_string(), "SO 1".to_string())]);
        let req = Request::post("/api/x").json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(req.body, Some(WireBody::Json(serde_json::json!({"a": 1}))));
    }
}
