use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::client::transport::{sanitize_url, ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
use crate::config::{ApiConfig, RetryConfig};
use crate::error::{ProxyError, Result};
use crate::storage::Session;

/// One query parameter; `None` values are dropped before encoding
pub type QueryParam<'a> = (&'a str, Option<String>);

#[derive(Clone)]
pub struct SpaceTradersClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
    base_url: String,
    retry: RetryConfig,
}

impl SpaceTradersClient {
    pub fn new(config: &ApiConfig, retry: RetryConfig, session: Arc<Session>) -> Result<Self> {
        let timeout = (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds));
        let transport = Arc::new(ReqwestTransport::new(timeout)?);
        Ok(Self::with_transport(&config.base_url, transport, retry, session))
    }

    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        retry: RetryConfig,
        session: Arc<Session>,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Base URL + path + encoded query of the defined parameters
    pub fn build_url(&self, path: &str, query: &[QueryParam<'_>]) -> Result<Url> {
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ProxyError::Config(format!("Invalid request URL for {}: {}", path, e)))?;

        let defined: Vec<(&str, &String)> = query
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (*key, v)))
            .collect();
        if !defined.is_empty() {
            url.query_pairs_mut().extend_pairs(defined);
        }
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.bearer_token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ProxyError::Config("Token contains characters not allowed in a header".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Issue one API call, retrying throttled responses with backoff.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[QueryParam<'_>],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.build_url(path, query)?;
        let body = body.map(serde_json::to_string).transpose()?;

        let mut retries = 0;
        loop {
            let request = ApiRequest {
                method: method.clone(),
                url: url.clone(),
                headers: self.headers()?,
                body: body.clone(),
            };

            debug!(retries, "{} {}", method, sanitize_url(&url));
            let response = self.transport.send(&request).await?;

            if self.retry.should_retry(response.status, retries) {
                let delay = self.retry.backoff_delay(retries);
                warn!(
                    status = response.status,
                    retries,
                    "Throttled on {} {}, retrying in {:.1}s",
                    method,
                    sanitize_url(&url),
                    delay.as_secs_f64()
                );
                sleep(delay).await;
                retries += 1;
                continue;
            }

            return Self::interpret(response);
        }
    }

    fn interpret(response: ApiResponse) -> Result<Value> {
        match response.status {
            status if status >= 300 => Err(ProxyError::api(status, response.body)),
            204 => Ok(json!({})),
            _ => Ok(serde_json::from_str(&response.body)?),
        }
    }

    pub async fn get(&self, path: &str, query: &[QueryParam<'_>]) -> Result<Value> {
        self.call(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.call(Method::POST, path, &[], body).await
    }

    pub async fn patch(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.call(Method::PATCH, path, &[], body).await
    }
}
