use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use cablemodem_parser::{PollState, Snapshot};

use crate::cli::OutputFormat;
use crate::discovery::DiscoveredModem;
use crate::error::Result;
use crate::readings::{Reading, collect_readings};

pub struct OutputManager {
    colored: bool,
}

/// Everything a JSON consumer needs from one poll.
#[derive(Serialize)]
struct StatusReport<'a> {
    host: &'a str,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_success: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a Snapshot>,
    readings: Vec<Reading>,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_state(&self, host: &str, state: &PollState, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_pretty(host, state)),
            OutputFormat::Json => self.format_json(host, state, true),
            OutputFormat::JsonCompact => self.format_json(host, state, false),
            OutputFormat::Table => Ok(self.format_table(host, state)),
        }
    }

    fn format_pretty(&self, host: &str, state: &PollState) -> String {
        let mut output = String::new();

        let Some(snapshot) = state.current() else {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("Modem unavailable:", &Color::Red, true),
                self.colorize(host, &Color::Blue, false)
            ));
            if let Some(error) = &state.last_error {
                output.push_str(&format!(
                    "  {}: {}\n",
                    self.colorize("Error", &Color::Yellow, false),
                    error
                ));
            }
            if let Some(last_success) = state.last_success {
                output.push_str(&format!(
                    "  {}: {}\n",
                    self.colorize("Last success", &Color::Yellow, false),
                    last_success.to_rfc3339()
                ));
            }
            return output;
        };

        output.push_str(&format!(
            "{} {}\n",
            self.colorize(&snapshot.model, &Color::Green, true),
            self.colorize(&format!("({host})"), &Color::Blue, false)
        ));

        for reading in collect_readings(state) {
            let value = match (&reading.value, reading.unit) {
                (Some(value), Some(unit)) => format!("{value} {unit}"),
                (Some(value), None) => value.to_string(),
                (None, _) => "unavailable".to_string(),
            };
            output.push_str(&format!(
                "  {}: {}\n",
                self.colorize(&reading.name, &Color::Yellow, false),
                self.colorize(&value, &Color::Cyan, false)
            ));
        }

        output
    }

    fn format_json(&self, host: &str, state: &PollState, pretty: bool) -> Result<String> {
        let report = StatusReport {
            host,
            available: state.available,
            last_success: state.last_success,
            last_error: state.last_error.as_deref(),
            snapshot: state.current(),
            readings: collect_readings(state),
        };
        if pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(Into::into)
    }

    fn format_table(&self, host: &str, state: &PollState) -> String {
        #[derive(Tabled)]
        struct DownstreamRow {
            #[tabled(rename = "Ch")]
            channel: u32,
            #[tabled(rename = "Lock")]
            lock_status: String,
            #[tabled(rename = "Modulation")]
            modulation: String,
            #[tabled(rename = "ID")]
            channel_id: u32,
            #[tabled(rename = "Freq (Hz)")]
            frequency_hz: u64,
            #[tabled(rename = "Power (dBmV)")]
            power: String,
            #[tabled(rename = "SNR (dB)")]
            snr: String,
            #[tabled(rename = "Corrected")]
            corrected: u64,
            #[tabled(rename = "Uncorrectable")]
            uncorrectable: u64,
        }

        #[derive(Tabled)]
        struct UpstreamRow<'a> {
            #[tabled(rename = "Ch")]
            channel: u32,
            #[tabled(rename = "Lock")]
            lock_status: &'a str,
            #[tabled(rename = "Type")]
            channel_type: &'a str,
            #[tabled(rename = "ID")]
            channel_id: u32,
            #[tabled(rename = "Symbol Rate")]
            symbol_rate: &'a str,
            #[tabled(rename = "Freq (Hz)")]
            frequency_hz: u64,
            #[tabled(rename = "Power (dBmV)")]
            power: String,
        }

        #[derive(Tabled)]
        struct ReadingRow {
            #[tabled(rename = "Reading")]
            name: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Unit")]
            unit: &'static str,
        }

        let Some(snapshot) = state.current() else {
            return self.format_pretty(host, state);
        };

        let mut output = String::new();
        output.push_str(&self.colorize(
            &format!("{} ({host})", snapshot.model),
            &Color::Green,
            true,
        ));
        output.push('\n');

        if !snapshot.downstream.is_empty() {
            let rows = snapshot.downstream.iter().map(|c| DownstreamRow {
                channel: c.channel,
                lock_status: c.lock_status.clone(),
                modulation: c.modulation.clone(),
                channel_id: c.channel_id,
                frequency_hz: c.frequency_hz,
                power: format!("{:.1}", c.power_dbmv),
                snr: format!("{:.1}", c.snr_db),
                corrected: c.corrected,
                uncorrectable: c.uncorrectable,
            });
            output.push_str(&self.colorize("Downstream", &Color::Yellow, true));
            output.push('\n');
            output.push_str(&Table::new(rows).with(Style::modern()).to_string());
            output.push('\n');
        }

        if !snapshot.upstream.is_empty() {
            let rows = snapshot.upstream.iter().map(|c| UpstreamRow {
                channel: c.channel,
                lock_status: &c.lock_status,
                channel_type: &c.channel_type,
                channel_id: c.channel_id,
                symbol_rate: &c.symbol_rate,
                frequency_hz: c.frequency_hz,
                power: format!("{:.1}", c.power_dbmv),
            });
            output.push_str(&self.colorize("Upstream", &Color::Yellow, true));
            output.push('\n');
            output.push_str(&Table::new(rows).with(Style::modern()).to_string());
            output.push('\n');
        }

        let rows = collect_readings(state).into_iter().map(|r| ReadingRow {
            name: r.name,
            value: r.value.map_or_else(|| "-".to_string(), |v| v.to_string()),
            unit: r.unit.unwrap_or(""),
        });
        output.push_str(&Table::new(rows).with(Style::modern()).to_string());
        output.push('\n');

        output
    }

    pub fn format_discovered(&self, modems: &[DiscoveredModem], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(modems)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(modems)?),
            OutputFormat::Table => {
                #[derive(Tabled)]
                struct ModemRow<'a> {
                    #[tabled(rename = "Host")]
                    host: &'a str,
                    #[tabled(rename = "Model")]
                    model: &'a str,
                }

                let rows = modems.iter().map(|m| ModemRow {
                    host: &m.host,
                    model: &m.model,
                });
                Ok(format!("{}\n", Table::new(rows).with(Style::modern())))
            }
            OutputFormat::Pretty => {
                let mut output = String::new();
                if modems.is_empty() {
                    output.push_str(&self.colorize("No supported modem found", &Color::Red, true));
                    output.push('\n');
                }
                for modem in modems {
                    output.push_str(&format!(
                        "{} {}\n",
                        self.colorize("✓", &Color::Green, true),
                        self.colorize(&modem.display(), &Color::Cyan, false)
                    ));
                }
                Ok(output)
            }
        }
    }

    pub fn success(&self, message: &str) -> String {
        format!("{} {}", self.colorize("✓", &Color::Green, true), message)
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        if !self.colored {
            return text.to_string();
        }
        let colored_text = match color {
            Color::Green => text.green(),
            Color::Yellow => text.yellow(),
            Color::Blue => text.blue(),
            Color::Cyan => text.cyan(),
            Color::Red => text.red(),
        };
        if bold {
            colored_text.bold().to_string()
        } else {
            colored_text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cablemodem_parser::{DownstreamChannel, StartupStatus};
    use std::sync::Arc;

    fn state(available: bool) -> PollState {
        PollState {
            snapshot: Some(Arc::new(Snapshot {
                model: "SB6183".to_string(),
                startup: StartupStatus {
                    connectivity: Some("OK".to_string()),
                    ..Default::default()
                },
                downstream: vec![DownstreamChannel {
                    channel: 1,
                    lock_status: "Locked".to_string(),
                    modulation: "QAM256".to_string(),
                    channel_id: 17,
                    frequency_hz: 603_000_000,
                    power_dbmv: 5.7,
                    snr_db: 40.3,
                    corrected: 12,
                    uncorrectable: 0,
                }],
                upstream: Vec::new(),
            })),
            available,
            last_error: (!available).then(|| "request timed out".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_pretty_output() {
        let output = OutputManager::new(false)
            .format_state("192.168.100.1", &state(true), OutputFormat::Pretty)
            .unwrap();
        assert!(output.starts_with("SB6183 (192.168.100.1)\n"));
        assert!(output.contains("  Connectivity State: OK\n"));
        assert!(output.contains("  Security: unavailable\n"));
        assert!(output.contains("  DS Channel 1 Power: 5.7 dBmV\n"));
    }

    #[test]
    fn test_pretty_output_unavailable() {
        let output = OutputManager::new(false)
            .format_state("192.168.100.1", &state(false), OutputFormat::Pretty)
            .unwrap();
        assert!(output.starts_with("Modem unavailable: 192.168.100.1\n"));
        assert!(output.contains("Error: request timed out"));
        assert!(!output.contains("SB6183"));
    }

    #[test]
    fn test_json_report() {
        let output = OutputManager::new(false)
            .format_state("192.168.100.1", &state(true), OutputFormat::JsonCompact)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["host"], "192.168.100.1");
        assert_eq!(value["available"], true);
        assert_eq!(value["snapshot"]["model"], "SB6183");
        assert_eq!(value["snapshot"]["downstream"][0]["channel_id"], 17);
        assert!(value["readings"].as_array().unwrap().len() > 3);

        let output = OutputManager::new(false)
            .format_state("192.168.100.1", &state(false), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["available"], false);
        assert!(value.get("snapshot").is_none());
        assert_eq!(value["last_error"], "request timed out");
    }

    #[test]
    fn test_table_output() {
        let output = OutputManager::new(false)
            .format_state("192.168.100.1", &state(true), OutputFormat::Table)
            .unwrap();
        assert!(output.contains("Downstream"));
        assert!(!output.contains("Upstream\n"));
        assert!(output.contains("QAM256"));
        assert!(output.contains("Power (dBmV)"));
    }

    #[test]
    fn test_discovered_output() {
        let manager = OutputManager::new(false);
        let modems = vec![DiscoveredModem {
            host: "192.168.100.1".to_string(),
            model: "SB6190".to_string(),
        }];

        let pretty = manager.format_discovered(&modems, OutputFormat::Pretty).unwrap();
        assert_eq!(pretty, "✓ SB6190 at 192.168.100.1\n");

        let json = manager.format_discovered(&modems, OutputFormat::JsonCompact).unwrap();
        assert_eq!(json, r#"[{"host":"192.168.100.1","model":"SB6190"}]"#);

        let empty = manager.format_discovered(&[], OutputFormat::Pretty).unwrap();
        assert_eq!(empty, "No supported modem found\n");
    }
}
