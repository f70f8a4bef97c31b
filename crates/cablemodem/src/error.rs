use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain the status page from the modem.
///
/// This is the only error that aborts a poll cycle. Everything that goes wrong
/// after the markup has been received degrades to partial or empty results.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid modem host: {0}")]
    InvalidHost(String),
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("modem at {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// Classify a reqwest error raised while sending a request to `url`.
    pub(crate) fn from_request(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else {
            TransportError::Http(err)
        }
    }
}

/// A single table cell that could not be converted to its column type.
///
/// Never escalates: the row carrying it is dropped and logged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("column `{column}`: expected an integer, got {text:?}")]
    Int { column: &'static str, text: String },
    #[error("column `{column}`: expected a number, got {text:?}")]
    Float { column: &'static str, text: String },
}
