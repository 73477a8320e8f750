//! HTTP client for the billing probe
//!
//! Thin wrapper over reqwest with a base URL, a bearer token, and
//! response capture suited to per-call outcome recording.

#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for probe calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create a client bound to a base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, 30)
    }

    /// Create client with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            default_headers: HeaderMap::new(),
            timeout_secs,
        })
    }

    /// Attach a bearer token sent on every request
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Result<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
            .context("Invalid bearer token")?;
        self.default_headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add default header
    pub fn default_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("Invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("Invalid header value")?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Build full URL
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    /// Send a request, capturing status/body/duration
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.build_url(&request.path);
        debug!("Sending {} request to {}", request.method, url);

        let method =
            Method::from_bytes(request.method.as_bytes()).context("Invalid HTTP method")?;

        let mut req_builder = self.client.request(method, &url);

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        // Correlation headers are operator-supplied probes; drop what
        // the wire cannot carry rather than aborting the call.
        for (key, value) in &request.headers {
            match HeaderValue::from_str(value) {
                Ok(v) => req_builder = req_builder.header(key.as_str(), v),
                Err(_) => warn!("Skipping unencodable header {key}"),
            }
        }

        if let Some(body) = &request.json {
            req_builder = req_builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let start = std::time::Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(HttpError::Timeout(self.timeout_secs))
            } else if e.is_connect() {
                anyhow::anyhow!(HttpError::ConnectionRefused(url.clone()))
            } else {
                anyhow::anyhow!(HttpError::RequestFailed(e.to_string()))
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        let mut response_headers = HashMap::new();
        for (key, value) in response.headers().iter() {
            if let Ok(v) = value.to_str() {
                response_headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
            duration_ms,
        })
    }

    /// Convenience method for GET request
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::get(path)).await
    }

    /// POST a JSON body
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        self.send(HttpRequest::post(path).json(body)?).await
    }

    /// POST a JSON body with extra per-call headers
    pub async fn post_json_with_headers<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        headers: HashMap<String, String>,
    ) -> Result<HttpResponse> {
        self.send(HttpRequest::post(path).json(body)?.headers(headers))
            .await
    }
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub json: Option<String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            json: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.json = Some(serde_json::to_string(body).context("Failed to serialize body")?);
        Ok(self)
    }
}

/// HTTP response
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Parse the body as JSON
    pub fn json_body(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).context("Response body is not valid JSON")
    }
}
