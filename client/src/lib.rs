//! HTTP client for the Moodping backend.
//!
//! Three endpoints, all relative to a configured base URL:
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | [`ApiClient::create_record`] | `POST api/records/` with [`NewRecord`] | [`CreatedRecord`] |
//! | [`ApiClient::request_feedback`] | `POST api/feedback/?record_id=<id>`, no body | [`Feedback`] |
//! | [`ApiClient::post_event`] | `POST api/events/` with [`EventPayload`] | ignored |
//!
//! Requests are sent once. Nothing here retries; callers decide what a failure
//! means.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use moodping_types::{CreatedRecord, EventPayload, Feedback, NewRecord, RecordId};

pub const RECORDS_PATH: &str = "api/records/";
pub const FEEDBACK_PATH: &str = "api/feedback/";
pub const EVENTS_PATH: &str = "api/events/";

const CONNECT_TIMEOUT_SECS: u64 = 30;
// reqwest only exposes the keepalive idle time; interval and retries use platform defaults.
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

const USER_AGENT: &str = concat!("moodping/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The server answered with a non-success status.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, ClientError::Status { .. })
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Read an error body for diagnostics, truncating after 32 KiB.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is treated as a directory: a missing trailing slash is added
    /// so endpoint paths join beneath it.
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = client_builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;

        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    pub async fn create_record(&self, record: &NewRecord) -> Result<CreatedRecord, ClientError> {
        let url = self.endpoint(RECORDS_PATH)?;
        let request = self.http.post(url.clone()).json(record);
        let created: CreatedRecord = self.send_json(request, &url).await?;
        tracing::debug!(record_id = %created.id, "Record created");
        Ok(created)
    }

    pub async fn request_feedback(&self, record_id: RecordId) -> Result<Feedback, ClientError> {
        let mut url = self.endpoint(FEEDBACK_PATH)?;
        url.query_pairs_mut()
            .append_pair("record_id", &record_id.to_string());
        let request = self.http.post(url.clone());
        self.send_json(request, &url).await
    }

    /// Post a UX event. The response body is discarded.
    pub async fn post_event(&self, payload: &EventPayload) -> Result<(), ClientError> {
        let url = self.endpoint(EVENTS_PATH)?;
        let request = self.http.post(url.clone()).json(payload);
        self.send(request, &url).await?;
        Ok(())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        let response = self.send(request, url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
