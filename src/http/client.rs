//! JSON:API HTTP client
//!
//! Every request carries the JSON:API media type in `Accept`, and bodies are
//! sent with it as `Content-Type`. Failed attempts are retried with doubling
//! delays according to the method:
//!
//! - `GET` is safe, so any transient failure is retried (timeouts, connection
//!   errors, 429 and 5xx).
//! - `PATCH` is retried only when the server cannot have applied it: the
//!   connection was never made, or the server answered 429 or 503.

use crate::error::{Error, Result};
use crate::types::{StringMap, JSONAPI_MEDIA_TYPE};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Connection settings for one server
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Root every request path is resolved against
    pub base_url: Url,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub retry_delay: Duration,
    /// Upper bound for any single delay
    pub max_retry_delay: Duration,
}

impl HttpClientConfig {
    /// Settings for the server at `base_url` with default timeouts and retries
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining relative request paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_delay: Duration::from_millis(100),
            max_retry_delay: Duration::from_secs(5),
        })
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Delay before retry number `attempt + 1`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.retry_delay
            .checked_mul(1 << attempt.min(16))
            .map_or(self.max_retry_delay, |d| d.min(self.max_retry_delay))
    }

    pub(crate) fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Client for one JSON:API server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// `GET path?query` and decode the response document
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &StringMap) -> Result<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        decode(response).await
    }

    /// `PATCH path` with `document` as the body and decode the response document
    pub async fn patch<B, T>(&self, path: &str, document: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(document)?;
        let response = self
            .send(Method::PATCH, path, &StringMap::new(), Some(body))
            .await?;
        decode(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &StringMap,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let url = self.config.resolve(path)?;
        let mut attempt = 0;

        loop {
            match self.attempt(&method, &url, query, body.as_deref()).await {
                Ok(response) => {
                    debug!(%method, %url, "Request succeeded");
                    return Ok(response);
                }
                Err(e) if attempt < self.config.max_retries && should_retry(&method, &e) => {
                    let delay = self.config.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        %method, %url, attempt, max_retries = self.config.max_retries,
                        "Retrying in {:?} after: {}", delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        query: &StringMap,
        body: Option<&[u8]>,
    ) -> Result<Response> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, JSONAPI_MEDIA_TYPE);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, JSONAPI_MEDIA_TYPE)
                .body(body.to_vec());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found_for(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn should_retry(method: &Method, err: &Error) -> bool {
    if *method == Method::GET {
        return err.is_retryable();
    }
    match err {
        Error::Http(e) => e.is_connect(),
        Error::HttpStatus { status, .. } => matches!(status, 429 | 503),
        _ => false,
    }
}

/// `NotFound` naming the last two path segments, `/{kind}/{id}`
fn not_found_for(url: &Url) -> Error {
    let mut segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .rev();
    let id = segments.next().unwrap_or_default();
    let kind = segments.next().unwrap_or_default();
    Error::not_found(kind, id)
}
