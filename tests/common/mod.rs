// Shared fixtures: an in-memory transport that records requests and replays
// scripted responses per route.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use spacetraders_graph::config::RetryConfig;
use spacetraders_graph::{ApiRequest, ApiResponse, HttpTransport, Proxy, Result, Session, SpaceTradersClient};

pub const BASE_URL: &str = "http://fake.spacetraders.test/v2";

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn route_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for `METHOD path` (path relative to the base URL).
    /// The last queued response for a route keeps answering.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.routes
            .lock()
            .entry(route_key(&method, path))
            .or_default()
            .push_back(ApiResponse::new(status, body));
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, 200, body);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests whose path (relative to the base URL) equals `path`
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| relative_path(r) == path)
            .collect()
    }
}

pub fn relative_path(request: &ApiRequest) -> String {
    request.url.path().trim_start_matches("/v2").to_string()
}

pub fn body_json(request: &ApiRequest) -> Value {
    request
        .body
        .as_deref()
        .map(|body| serde_json::from_str(body).expect("request body is JSON"))
        .unwrap_or(Value::Null)
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().push(request.clone());
        let key = route_key(&request.method, &relative_path(request));
        let mut routes = self.routes.lock();
        let response = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| {
            ApiResponse::new(404, format!(r#"{{"error":{{"message":"no route for {}"}}}}"#, key))
        }))
    }
}

pub fn client(transport: &Arc<FakeTransport>, session: Arc<Session>) -> SpaceTradersClient {
    SpaceTradersClient::with_transport(BASE_URL, transport.clone(), RetryConfig::default(), session)
}

pub fn proxy(transport: &Arc<FakeTransport>) -> Proxy {
    Proxy::new(client(transport, Arc::new(Session::with_token("test-token"))))
}
