use serde::{Deserialize, Serialize};

/// Everything scraped from one fetch of the modem status page.
///
/// Built from scratch on every poll. Channels keep the order in which they
/// appear on the page; the channel number is the only identity that carries
/// over between polls.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub model: String,
    pub startup: StartupStatus,
    pub downstream: Vec<DownstreamChannel>,
    pub upstream: Vec<UpstreamChannel>,
}

/// Rows of the startup procedure table. `None` means the row was not present
/// in this page layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StartupStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
}

impl StartupStatus {
    pub fn is_empty(&self) -> bool {
        self.connectivity.is_none()
            && self.boot.is_none()
            && self.config.is_none()
            && self.security.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DownstreamChannel {
    pub channel: u32,
    pub lock_status: String,
    pub modulation: String,
    pub channel_id: u32,
    pub frequency_hz: u64,
    pub power_dbmv: f64,
    pub snr_db: f64,
    pub corrected: u64,
    pub uncorrectable: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpstreamChannel {
    pub channel: u32,
    pub lock_status: String,
    pub channel_type: String,
    pub channel_id: u32,
    pub symbol_rate: String,
    pub frequency_hz: u64,
    pub power_dbmv: f64,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let len = values.len();
    if len == 0 {
        return None;
    }
    Some(values.sum::<f64>() / len as f64)
}

impl Snapshot {
    pub fn downstream_channel(&self, channel: u32) -> Option<&DownstreamChannel> {
        self.downstream.iter().find(|c| c.channel == channel)
    }

    pub fn upstream_channel(&self, channel: u32) -> Option<&UpstreamChannel> {
        self.upstream.iter().find(|c| c.channel == channel)
    }

    /// Mean downstream power in dBmV, `None` without downstream channels.
    pub fn downstream_avg_power(&self) -> Option<f64> {
        mean(self.downstream.iter().map(|c| c.power_dbmv))
    }

    /// Mean downstream SNR in dB, `None` without downstream channels.
    pub fn downstream_avg_snr(&self) -> Option<f64> {
        mean(self.downstream.iter().map(|c| c.snr_db))
    }

    /// Mean upstream power in dBmV, `None` without upstream channels.
    pub fn upstream_avg_power(&self) -> Option<f64> {
        mean(self.upstream.iter().map(|c| c.power_dbmv))
    }

    pub fn downstream_total_corrected(&self) -> u64 {
        self.downstream.iter().map(|c| c.corrected).sum()
    }

    pub fn downstream_total_uncorrectable(&self) -> u64 {
        self.downstream.iter().map(|c| c.uncorrectable).sum()
    }
}
