//! Retrieval of remote feed documents.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use url::Url;

use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::error::FetchError;

/// Status code and body of a completed request. Non-2xx statuses are not errors here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Fetches feeds over HTTP(S). `webcal://` links are requested over HTTPS.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        HttpFetcher {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        HttpFetcher { client, timeout }
    }

    async fn send(&self, url: Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/calendar, text/plain;q=0.9, */*;q=0.1")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }
}

/// Map subscription schemes onto the transport they stand for.
fn request_url(url: &Url) -> Result<Url, FetchError> {
    let scheme = match url.scheme() {
        "webcal" | "webcals" => "https",
        "http" | "https" => return Ok(url.clone()),
        other => return Err(FetchError::Transport(format!("unsupported scheme '{other}'"))),
    };

    // Url::set_scheme refuses to switch between special and non-special schemes
    let rewritten = format!("{scheme}{}", &url.as_str()[url.scheme().len()..]);
    Url::parse(&rewritten).map_err(|e| FetchError::Transport(e.to_string()))
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let target = request_url(url)?;
        tracing::debug!(url = %target, timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX), "fetching feed");

        timeout(self.timeout, self.send(target))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }
}
