use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::error::TransportError;
use crate::fetcher::Fetcher;
use crate::parser::{detect_model, parse_downstream, parse_startup, parse_upstream};
use crate::status::Snapshot;

/// Parses a status page into a [`Snapshot`].
///
/// Never fails: sections that cannot be found come back empty and the model
/// falls back to [`UNKNOWN_MODEL`](crate::parser::UNKNOWN_MODEL).
pub fn parse_status(html: &str) -> Snapshot {
    let document = Html::parse_document(html);
    Snapshot {
        model: detect_model(&document),
        startup: parse_startup(&document),
        downstream: parse_downstream(&document),
        upstream: parse_upstream(&document),
    }
}

/// Anything that can produce a fresh snapshot on demand.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Host the snapshots come from, for logging and display.
    fn host(&self) -> &str;

    async fn get_status(&self) -> Result<Snapshot, TransportError>;
}

/// A modem reached over HTTP.
#[derive(Debug, Clone)]
pub struct ArrisModem {
    host: String,
    fetcher: Fetcher,
}

impl ArrisModem {
    pub fn new(host: impl Into<String>) -> Result<Self, TransportError> {
        let host = host.into();
        let fetcher = Fetcher::new(&host)?;
        Ok(Self { host, fetcher })
    }

    pub fn with_timeout(host: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let mut modem = Self::new(host)?;
        modem.fetcher = modem.fetcher.with_timeout(timeout);
        Ok(modem)
    }

}

#[async_trait]
impl StatusSource for ArrisModem {
    fn host(&self) -> &str {
        &self.host
    }

    async fn get_status(&self) -> Result<Snapshot, TransportError> {
        let html = self.fetcher.fetch().await?;
        let snapshot = parse_status(&html);
        debug!(
            host = %self.host,
            model = %snapshot.model,
            downstream = snapshot.downstream.len(),
            upstream = snapshot.upstream.len(),
            "Parsed modem status"
        );
        Ok(snapshot)
    }
}

/// Fetches and parses the status page of the modem at `host`.
pub async fn get_status(host: &str) -> Result<Snapshot, TransportError> {
    ArrisModem::new(host)?.get_status().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{UNKNOWN_MODEL, test_pages};
    use axum::{Router, http::StatusCode, response::Html as HtmlBody, routing::get};
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr.to_string()
    }

    #[test]
    fn test_parse_status_full_page() {
        let snapshot = parse_status(test_pages::SB6183_PAGE);
        assert_eq!(snapshot.model, "SB6183");
        assert_eq!(snapshot.startup.connectivity.as_deref(), Some("OK"));
        assert_eq!(snapshot.downstream.len(), 4);
        assert_eq!(snapshot.upstream.len(), 2);
    }

    #[test]
    fn test_parse_status_garbage_degrades_to_empty() {
        let snapshot = parse_status("<<<not html at all");
        assert_eq!(snapshot.model, UNKNOWN_MODEL);
        assert!(snapshot.startup.is_empty());
        assert!(snapshot.downstream.is_empty());
        assert!(snapshot.upstream.is_empty());
    }

    #[tokio::test]
    async fn test_get_status_over_http() {
        let app = Router::new().route("/", get(|| async { HtmlBody(test_pages::SB6183_PAGE) }));
        let host = serve(app).await;

        let snapshot = get_status(&host).await.unwrap();
        assert_eq!(snapshot.model, "SB6183");
        assert_eq!(snapshot.downstream[1].channel_id, 17);
        assert_eq!(snapshot.upstream[0].frequency_hz, 36_000_000);
    }

    #[tokio::test]
    async fn test_get_status_propagates_transport_error() {
        let app = Router::new().route("/", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let host = serve(app).await;

        let modem = ArrisModem::new(&host).unwrap();
        assert_eq!(modem.host(), host);
        let err = modem.get_status().await.unwrap_err();
        assert!(matches!(err, TransportError::Status { .. }));
    }

    #[tokio::test]
    async fn test_timeout_yields_no_snapshot() {
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                HtmlBody(test_pages::SB6183_PAGE)
            }),
        );
        let host = serve(app).await;

        let modem = ArrisModem::with_timeout(&host, Duration::from_millis(200)).unwrap();
        let result = modem.get_status().await;
        assert!(matches!(result, Err(TransportError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_invalid_host() {
        let err = get_status("").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidHost(_)));
    }
}
