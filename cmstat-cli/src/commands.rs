use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cablemodem_parser::fetcher::modem_url;
use cablemodem_parser::{ArrisModem, StatusPoller, StatusSource};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::discovery::{DISCOVERY_HOSTS, discover};
use crate::error::{AppError, Result};
use crate::output::OutputManager;

pub struct CommandExecutor {
    config: AppConfig,
    config_path: Option<PathBuf>,
    output: OutputManager,
}

impl CommandExecutor {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, colored: bool) -> Self {
        Self {
            config,
            config_path,
            output: OutputManager::new(colored),
        }
    }

    fn modem(&self, host: Option<String>) -> Result<ArrisModem> {
        let host = host.unwrap_or_else(|| self.config.host.clone());
        Ok(ArrisModem::with_timeout(host, self.config.timeout())?)
    }

    fn format(&self, format: Option<OutputFormat>) -> OutputFormat {
        format.unwrap_or(self.config.output)
    }

    /// Runs a single poll cycle and prints the result.
    pub async fn status(&self, host: Option<String>, format: Option<OutputFormat>) -> Result<()> {
        let format = self.format(format);
        let modem = self.modem(host)?;
        let host = modem.host().to_string();
        let poller = StatusPoller::new(modem, self.config.poll_interval());

        poller.poll_once().await?;

        let rendered = self.output.format_state(&host, &poller.state(), format)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }

    /// Polls until Ctrl-C, re-rendering after every cycle.
    pub async fn watch(
        &self,
        host: Option<String>,
        interval: Option<u64>,
        format: Option<OutputFormat>,
    ) -> Result<()> {
        let format = self.format(format);
        let interval = match interval {
            Some(0) => return Err(AppError::config("interval must be at least 1 second")),
            Some(secs) => Duration::from_secs(secs),
            None => self.config.poll_interval(),
        };

        let modem = self.modem(host)?;
        let host = modem.host().to_string();
        let poller = Arc::new(StatusPoller::new(modem, interval));
        let mut updates = poller.subscribe();

        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let poller = poller.clone();
            let cancel = cancel.clone();
            async move { poller.run(cancel).await }
        });

        info!(%host, ?interval, "Watching modem, press Ctrl-C to stop");

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let result = loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                    let state = updates.borrow_and_update().clone();
                    match self.output.format_state(&host, &state, format) {
                        Ok(rendered) => println!("{}", rendered.trim_end()),
                        Err(e) => break Err(e),
                    }
                }
                signal = &mut ctrl_c => {
                    if let Err(e) = signal {
                        warn!(error = %e, "Failed to listen for Ctrl-C");
                    }
                    break Ok(());
                }
            }
        };

        cancel.cancel();
        if let Err(e) = task.await {
            warn!(error = %e, "Poller task ended abnormally");
        }
        result
    }

    pub async fn discover(&self, save: bool, format: Option<OutputFormat>) -> Result<()> {
        self.discover_in(&DISCOVERY_HOSTS, save, format).await
    }

    async fn discover_in(
        &self,
        hosts: &[&str],
        save: bool,
        format: Option<OutputFormat>,
    ) -> Result<()> {
        let format = self.format(format);
        let found = discover(hosts, self.config.timeout()).await;

        println!(
            "{}",
            self.output.format_discovered(&found, format)?.trim_end()
        );

        let Some(first) = found.first() else {
            return Err(AppError::NoModemFound(hosts.join(", ")));
        };

        if save {
            let config = AppConfig {
                host: first.host.clone(),
                ..self.config.clone()
            };
            let path = config.save(self.config_path.as_deref())?;
            if !format.is_json() {
                println!(
                    "{}",
                    self.output
                        .success(&format!("Saved {} to {}", first.host, path.display()))
                );
            }
        }

        Ok(())
    }

    pub fn config(&self, show: bool, reset: bool, set_host: Option<String>) -> Result<()> {
        let path = self.config_path.as_deref();

        if reset {
            let path = AppConfig::reset(path)?;
            println!(
                "{}",
                self.output
                    .success(&format!("Configuration reset to defaults ({})", path.display()))
            );
        } else if let Some(host) = set_host {
            modem_url(&host)?;
            let config = AppConfig {
                host,
                ..self.config.clone()
            };
            config.save(path)?;
            println!(
                "{}",
                self.output
                    .success(&format!("Modem host set to {}", config.host))
            );
        } else if show {
            println!("{}", self.config.show()?.trim_end());
        } else {
            println!("Use --show to display the configuration, --reset to restore defaults or --set-host to change the modem host");
        }

        Ok(())
    }
}
