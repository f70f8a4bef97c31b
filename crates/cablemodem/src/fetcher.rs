use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::TransportError;

/// Request timeout used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client used to talk to modems.
///
/// Modems only serve plain HTTP and never ask for credentials, so the client
/// carries nothing but the request timeout.
pub fn default_client(timeout: Duration) -> Result<Client, TransportError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(TransportError::Http)
}

/// Normalizes a configured host into the URL of the modem's root page.
///
/// Accepts a bare host or IP, optionally with a port, and tolerates a leading
/// `http://` or a trailing slash.
pub fn modem_url(host: &str) -> Result<Url, TransportError> {
    let trimmed = host.trim();
    let bare = trimmed
        .strip_prefix("http://")
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if bare.is_empty() || bare.contains(['/', '?', '#', '@', ' ']) {
        return Err(TransportError::InvalidHost(host.to_string()));
    }

    let url = Url::parse(&format!("http://{bare}/"))
        .map_err(|e| TransportError::InvalidHost(format!("{host}: {e}")))?;
    if url.host_str().is_none() {
        return Err(TransportError::InvalidHost(host.to_string()));
    }
    Ok(url)
}

/// Issues the single unauthenticated GET that a poll cycle consists of.
///
/// Holds no state between calls and never retries; retry cadence belongs to
/// whoever schedules the polls.
#[derive(Debug, Clone)]
pub struct Fetcher {
    url: Url,
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(host: &str) -> Result<Self, TransportError> {
        let client = default_client(DEFAULT_TIMEOUT)?;
        Self::with_client(host, client)
    }

    /// Reuse an existing client. The fetcher still applies its own timeout to
    /// every request.
    pub fn with_client(host: &str, client: Client) -> Result<Self, TransportError> {
        Ok(Self {
            url: modem_url(host)?,
            client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the raw markup of the status page.
    pub async fn fetch(&self) -> Result<String, TransportError> {
        let url = self.url.as_str();
        debug!(url, timeout = ?self.timeout, "Fetching modem status page");

        let response = self
            .client
            .get(self.url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_request(url, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }
            } else {
                TransportError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        debug!(url, bytes = body.len(), "Fetched modem status page");
        Ok(body)
    }
}
