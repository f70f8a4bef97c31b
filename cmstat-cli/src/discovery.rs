use std::time::Duration;

use cablemodem_parser::parser::SUPPORTED_MODELS;
use cablemodem_parser::{ArrisModem, StatusSource};
use serde::Serialize;
use tracing::{debug, info};

/// Address most ARRIS modems answer on.
pub const DEFAULT_HOST: &str = "192.168.100.1";

/// Addresses probed during discovery, most likely first.
pub const DISCOVERY_HOSTS: [&str; 3] = [DEFAULT_HOST, "192.168.0.1", "10.0.0.1"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredModem {
    pub host: String,
    pub model: String,
}

impl DiscoveredModem {
    pub fn display(&self) -> String {
        format!("{} at {}", self.model, self.host)
    }
}

pub fn is_supported(model: &str) -> bool {
    SUPPORTED_MODELS.iter().any(|supported| model.contains(supported))
}

/// Probes `hosts` one after another and returns the supported modems that
/// answered. Hosts that fail or serve something else are skipped.
pub async fn discover<I, S>(hosts: I, timeout: Duration) -> Vec<DiscoveredModem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut discovered = Vec::new();

    for host in hosts {
        let host = host.as_ref();
        let modem = match ArrisModem::with_timeout(host, timeout) {
            Ok(modem) => modem,
            Err(e) => {
                debug!(host, error = %e, "Skipping discovery host");
                continue;
            }
        };

        match modem.get_status().await {
            Ok(snapshot) if is_supported(&snapshot.model) => {
                info!(host, model = %snapshot.model, "Discovered ARRIS modem");
                discovered.push(DiscoveredModem {
                    host: host.to_string(),
                    model: snapshot.model,
                });
            }
            Ok(snapshot) => {
                debug!(host, model = %snapshot.model, "Device is not a supported modem");
            }
            Err(e) => {
                debug!(host, error = %e, "No modem found");
            }
        }
    }

    discovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, response::Html, routing::get};
    use tokio::net::TcpListener;

    async fn serve(page: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/", get(move || async move { Html(page) }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr.to_string()
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("SB6183"));
        assert!(is_supported("ARRIS TG3482G"));
        assert!(!is_supported("SB8200"));
        assert!(!is_supported("ARRIS Unknown"));
    }

    #[tokio::test]
    async fn test_discover_skips_dead_and_unsupported_hosts() {
        let modem = serve("<html><head><title>ARRIS SB6190 Status</title></head></html>").await;
        let router = serve("<html><head><title>Router Login</title></head></html>").await;

        let closed = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().to_string()
        };

        let found = discover([closed, router, modem.clone()], Duration::from_secs(2)).await;
        assert_eq!(
            found,
            vec![DiscoveredModem {
                host: modem.clone(),
                model: "SB6190".to_string(),
            }]
        );
        assert_eq!(found[0].display(), format!("SB6190 at {modem}"));
    }
}
