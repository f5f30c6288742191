//! HTTP client service
//!
//! Encapsulates HTTP communication with the reconciliation backend

use crate::config::ApiConfig;
use crate::utils::error::{ApiError, ApiResult, AppResult};
use crate::utils::logging::{summarize_body, truncate_content};
use anyhow::Context;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn, Instrument};
use url::Url;
use uuid::Uuid;

/// JSON request/response operations against the backend
///
/// Every failure is reported as a single [`ApiError`]. A successful call
/// returns the parsed body, or `None` when the body was empty or not JSON.
/// A literal JSON `null` body is also returned as `None`.
#[async_trait]
pub trait JsonApi: Send + Sync {
    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;

    /// GET with query parameters appended in the given order
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Option<Value>>;

    /// POST a JSON body (`{}` when `data` is absent)
    async fn post(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>>;

    /// PUT a JSON body (`{}` when `data` is absent)
    async fn put(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>>;

    /// DELETE, with no body at all when `data` is absent
    async fn remove(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>>;
}

/// Backend API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    origin: Option<Url>,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a client for the base URL selected by `config`
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name in configuration: {}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name.as_str()))?;
            default_headers.insert(name, value);
        }

        let base_url = config.resolve_base_url();
        debug!("API client using base URL '{}'", base_url);

        Self::build(base_url, config.origin_url(), default_headers)
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        Self::build(base_url.into(), None, HeaderMap::new())
    }

    fn build(base_url: String, origin: Option<Url>, default_headers: HeaderMap) -> AppResult<Self> {
        // No timeout: a call lasts as long as the backend takes
        let client = Client::builder()
            .user_agent(concat!("recondash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            origin,
            default_headers,
        })
    }

    /// Resolve an endpoint and its query parameters to an absolute URL
    pub fn resolve_url(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Url> {
        let joined = join_url(&self.base_url, endpoint);

        let mut url = match Url::parse(&joined) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.origin {
                Some(origin) => origin.join(&joined).map_err(ApiError::unexpected)?,
                None => {
                    return Err(ApiError::unexpected(format!(
                        "relative URL '{}' needs a configured origin",
                        joined
                    )))
                }
            },
            Err(e) => return Err(ApiError::unexpected(e)),
        };

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Build the outgoing request
    ///
    /// Headers are layered: `Content-Type: application/json`, then the
    /// configured defaults, then the caller's headers.
    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> ApiResult<Request> {
        let url = self.resolve_url(endpoint, params)?;

        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.default_headers {
            header_map.insert(name.clone(), value.clone());
        }
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(ApiError::unexpected)?;
            let value = HeaderValue::from_str(value).map_err(ApiError::unexpected)?;
            header_map.insert(name, value);
        }

        let mut builder = self.client.request(method, url).headers(header_map);
        if let Some(body) = body {
            let encoded = serde_json::to_string(body).map_err(ApiError::unexpected)?;
            builder = builder.body(encoded);
        }

        builder.build().map_err(ApiError::unexpected)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> ApiResult<Option<Value>> {
        let request = self.build_request(method, endpoint, params, body.as_ref(), headers)?;

        let span = tracing::info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            url = %request.url(),
        );

        self.execute(request).instrument(span).await
    }

    /// Perform one round trip and classify the outcome
    async fn execute(&self, request: Request) -> ApiResult<Option<Value>> {
        let start_time = Instant::now();
        debug!("Request started");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;
        let body = parse_body(&text);
        let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), body);
            warn!("Request failed: {} - {} - Duration: {:.2}ms", status, err, duration_ms);
            return Err(err);
        }

        debug!(
            "Request completed: {} - Duration: {:.2}ms - Body: {}",
            status,
            duration_ms,
            summarize_body(body.as_ref())
        );
        Ok(body)
    }
}

#[async_trait]
impl JsonApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Option<Value>> {
        self.send(Method::GET, endpoint, params, None, &[]).await
    }

    async fn post(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>> {
        let body = data.unwrap_or_else(empty_object);
        self.send(Method::POST, endpoint, &[], Some(body), headers).await
    }

    async fn put(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>> {
        let body = data.unwrap_or_else(empty_object);
        self.send(Method::PUT, endpoint, &[], Some(body), headers).await
    }

    async fn remove(&self, endpoint: &str, data: Option<Value>, headers: &[(&str, &str)]) -> ApiResult<Option<Value>> {
        self.send(Method::DELETE, endpoint, &[], data, headers).await
    }
}

/// Join a base URL and an endpoint with exactly one slash between them
///
/// An empty base yields a root-relative path.
pub fn join_url(base: &str, endpoint: &str) -> String {
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("{}/{}", base.trim_end_matches('/'), endpoint)
}

/// Characters that would end or split a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a value so it is sent as exactly one path segment
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Parse a response body; an unparseable body is absent, not an error
fn parse_body(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse response body as JSON: {} - body: {}", e, truncate_content(text, 200));
            None
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if !err.is_builder()
        && (err.is_connect() || err.is_timeout() || err.is_request() || err.is_body())
    {
        error!("Network error: {}", err);
        ApiError::network()
    } else {
        error!("Unexpected request error: {}", err);
        ApiError::unexpected(err)
    }
}
