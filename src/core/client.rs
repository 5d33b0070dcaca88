//! Resilient HTTP client for the course backend.
//!
//! One logical request is at most `max_attempts` HTTP calls. Only
//! transport-level failures (timeouts, refused or reset connections) are
//! retried, after `retry_delay × attempt`. Any status the server answers
//! with is final.
//!
//! A 2xx whose JSON body does not decode into the expected type is also
//! final (`ApiError::Decode`): the server already handled the request, and
//! sending it again would repeat any side effect and get the same body back.
//!
//! Non-idempotent calls that must reach the server at most once, such as
//! course generation, go through [`ResilientClient::request_once`].

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// JSON fields, in order of preference, that carry a backend error message.
const ERROR_MESSAGE_FIELDS: [&str; 3] = ["message", "error", "detail"];

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ApiError::InvalidRequest {
                message: format!("invalid header name '{}': {}", name, e),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidRequest {
            message: format!("invalid value for header '{}': {}", name, e),
        })?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct ResilientClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration,
}

impl ResilientClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("course-portal-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self::with_http_client(http, config))
    }

    /// Reuses an existing connection pool.
    pub fn with_http_client<C: ConfigProvider + ?Sized>(http: Client, config: &C) -> Self {
        Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            max_attempts: config.max_attempts(),
            retry_delay: config.retry_delay(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request_with_attempt(endpoint, options, 1).await
    }

    /// Runs the request starting from `attempt`; attempts already spent
    /// count against the retry budget.
    pub async fn request_with_attempt<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        attempt: u32,
    ) -> Result<T> {
        let mut attempt = attempt.max(1);
        loop {
            match self.send_once(endpoint, &options).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = backoff_delay(self.retry_delay, attempt);
                    tracing::warn!(
                        "API request failed, retrying ({}/{}) in {:?}: {}",
                        attempt,
                        self.max_attempts,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!(
                        "API request {} {} failed after {} attempt(s): {}",
                        options.method,
                        endpoint,
                        attempt,
                        err
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Exactly one HTTP call, whatever the retry budget.
    pub async fn request_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.send_once(endpoint, &options).await
    }

    /// Status of a single GET; the body is discarded unread.
    pub async fn status_of(&self, endpoint: &str) -> Result<StatusCode> {
        let response = self
            .build(endpoint, &RequestOptions::new(Method::GET))
            .send()
            .await
            .map_err(classify)?;
        Ok(response.status())
    }

    fn build(&self, endpoint: &str, options: &RequestOptions) -> RequestBuilder {
        let url = self.url_for(endpoint);
        let headers = merge_headers(default_headers(), &options.headers);
        tracing::debug!("Making API request: {} {}", options.method, url);

        let request = self
            .http
            .request(options.method.clone(), &url)
            .headers(headers)
            .timeout(self.timeout);
        match &options.body {
            Some(body) => request.body(body.clone()),
            None => request,
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<T> {
        let response = self
            .build(endpoint, options)
            .send()
            .await
            .map_err(classify)?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let text = response.text().await.map_err(classify)?;
            return Err(ApiError::http(status.as_u16(), error_message(status, &text)));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            return empty_object();
        }

        let bytes = response.bytes().await.map_err(classify)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return empty_object();
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::new(Method::POST).json(body)?)
            .await
    }

    /// POST without a body, for action endpoints such as `/content/{id}/complete`.
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(endpoint, RequestOptions::new(Method::POST)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::new(Method::PUT).json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(endpoint, RequestOptions::new(Method::DELETE)).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Caller headers replace defaults of the same name; everything else from
/// both maps is kept as is.
pub fn merge_headers(defaults: HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults;
    for name in overrides.keys() {
        merged.remove(name);
    }
    for (name, value) in overrides.iter() {
        merged.append(name.clone(), value.clone());
    }
    merged
}

/// Linear in the attempt number.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

/// Message for a non-2xx response body: a JSON message field, else the raw
/// text, else the status line.
pub fn error_message(status: StatusCode, text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => ERROR_MESSAGE_FIELDS
            .iter()
            .find_map(|field| {
                json.get(field)
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
            })
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        Err(_) if !text.is_empty() => text.to_string(),
        Err(_) => match status.canonical_reason() {
            Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        },
    }
}

fn empty_object<T: DeserializeOwned>() -> Result<T> {
    serde_json::from_value(Value::Object(serde_json::Map::new())).map_err(|e| ApiError::Decode {
        message: format!("response had no JSON body: {}", e),
    })
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_builder() {
        ApiError::InvalidRequest {
            message: error_chain(&err),
        }
    } else {
        ApiError::network(error_chain(&err))
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
