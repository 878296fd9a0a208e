use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::{HubSpotError, QueryParams, RequestOptions, Result};

/// Fluent builder for one bearer-authenticated API request.
///
/// Configuration calls take `&mut self` and return `&mut Self`, so they chain.
/// [`RequestBuilder::execute`] sends the accumulated state and stores the
/// response metadata and body on the builder. Executing again re-sends the
/// same state and overwrites the stored response.
///
/// ```no_run
/// use hubspot_http::RequestBuilder;
///
/// # async fn run() -> hubspot_http::Result<()> {
/// let mut request = RequestBuilder::new("https://api.hubapi.com", "my-token");
/// let body = request
///     .set_endpoint("crm/v3/objects/contacts")
///     .set_page_size(100)
///     .set_properties("email,firstname")
///     .execute()
///     .await?;
/// println!("{} -> {} bytes", request.status_code(), body.len());
/// # Ok(())
/// # }
/// ```
pub struct RequestBuilder {
    http: reqwest::Client,
    base_url: String,
    token: String,
    options: RequestOptions,
    method: String,
    endpoint: String,
    query: QueryParams,
    json_body: Option<Bytes>,
    status: String,
    status_code: u16,
    headers: HeaderMap,
    content_length: Option<u64>,
    content: Bytes,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("options", &self.options)
            .field("status_code", &self.status_code)
            .finish()
    }
}

impl RequestBuilder {
    /// Creates a `GET` request with no endpoint, parameters or body.
    ///
    /// `base_url` is used verbatim: the target is `base_url + "/" + endpoint`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            options: RequestOptions::default(),
            method: Method::GET.as_str().to_owned(),
            endpoint: String::new(),
            query: QueryParams::new(),
            json_body: None,
            status: String::new(),
            status_code: 0,
            headers: HeaderMap::new(),
            content_length: None,
            content: Bytes::new(),
        }
    }

    /// Creates a request from environment variables.
    ///
    /// Reads:
    /// - `HUBSPOT_BASE_URL`: API root, e.g. `https://api.hubapi.com`
    /// - `HUBSPOT_TOKEN`: private app access token
    ///
    /// Returns [`HubSpotError::Config`] if either variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        let base_url = required_env("HUBSPOT_BASE_URL")?;
        let token = required_env("HUBSPOT_TOKEN")?;
        Ok(Self::new(base_url, token))
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: RequestOptions) -> Self {
        self.options = opts;
        self
    }

    /// Uses an existing client, e.g. to share its connection pool.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.method = method.into();
        self
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Adds every pair. Keys already present gain another value.
    pub fn add_query_params<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs);
        self
    }

    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.query.add("page", page.to_string());
        self
    }

    pub fn set_page_size(&mut self, page_size: i64) -> &mut Self {
        self.query.add("pageSize", page_size.to_string());
        self
    }

    /// Adds a comma-separated `properties` list.
    pub fn set_properties(&mut self, properties: impl Into<String>) -> &mut Self {
        self.query.add("properties", properties);
        self
    }

    /// Adds a comma-separated `associations` list.
    pub fn set_associations(&mut self, associations: impl Into<String>) -> &mut Self {
        self.query.add("associations", associations);
        self
    }

    /// Serializes `payload` to JSON and sends it as the request body.
    ///
    /// On error the previously stored body, if any, is kept.
    pub fn set_json_body<T>(&mut self, payload: &T) -> Result<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_vec(payload)?;
        self.json_body = Some(Bytes::from(encoded));
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn json_body(&self) -> Option<&[u8]> {
        self.json_body.as_deref()
    }

    /// Status line of the last response, e.g. `"404 Not Found"`. Empty before execution.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Status code of the last response. `0` before execution.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Content length announced by the last response, if known.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Body of the last response.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Full request target: base URL, endpoint and encoded query string.
    ///
    /// `?` is only appended when at least one parameter is set.
    pub fn url(&self) -> String {
        let mut target = format!("{}/{}", self.base_url, self.endpoint);
        if !self.query.is_empty() {
            target.push('?');
            target.push_str(&self.query.encode());
        }
        target
    }

    /// Sends the request and returns the response body.
    ///
    /// Transport failures are retried on the configured backoff schedule.
    /// HTTP error statuses are not failures: they are returned like any other
    /// response and can be inspected with [`RequestBuilder::status_code`].
    pub async fn execute(&mut self) -> Result<Bytes> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| HubSpotError::InvalidMethod(self.method.clone()))?;
        let target = self.url();
        let url = Url::parse(&target).map_err(|err| HubSpotError::InvalidUrl {
            url: target.clone(),
            reason: err.to_string(),
        })?;
        let headers = self.request_headers()?;
        let timeout = self.options.timeout_ms.map(Duration::from_millis);

        let http = &self.http;
        let body = &self.json_body;
        let response = self
            .options
            .backoff
            .run(|| {
                let mut request = http
                    .request(method.clone(), url.clone())
                    .headers(headers.clone());
                if let Some(body) = body {
                    request = request.body(body.clone());
                }
                if let Some(timeout) = timeout {
                    request = request.timeout(timeout);
                }
                request.send()
            })
            .await
            .map_err(|exhausted| HubSpotError::Transport {
                attempts: exhausted.attempts,
                source: exhausted.last,
            })?;

        self.status = status_line(response.status());
        self.status_code = response.status().as_u16();
        self.content_length = response.content_length();
        self.headers = response.headers().clone();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %self.method,
            url = %target,
            status = self.status_code,
            content_length = ?self.content_length,
            "request completed"
        );

        // `bytes` consumes the response, releasing the connection on every path.
        let content = response.bytes().await.map_err(HubSpotError::Body)?;
        self.content = content.clone();
        Ok(content)
    }

    fn request_headers(&self) -> Result<HeaderMap> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| {
                HubSpotError::Config("bearer token is not a valid header value".to_owned())
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, authorization);
        Ok(headers)
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_str()),
        None => status.as_str().to_owned(),
    }
}

fn required_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .map_err(|_| HubSpotError::Config(format!("missing {name} environment variable")))?;
    if value.trim().is_empty() {
        return Err(HubSpotError::Config(format!("{name} is set but empty")));
    }
    Ok(value)
}
