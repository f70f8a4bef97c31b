//! Individually addressable readings derived from a poll state.
//!
//! Each reading is described declaratively: a stable key, a display name, a
//! unit and a function extracting its value from a snapshot. Per-channel
//! readings are generated from the channels present in the snapshot and look
//! their channel up by number, so a channel that disappears between polls
//! simply reads as unavailable.

use std::fmt;

use cablemodem_parser::{PollState, Snapshot};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    /// Free-text state
    State,
    /// Instantaneous value
    Measurement,
    /// Monotonic counter
    TotalIncreasing,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ReadingValue {
    Text(String),
    Count(u64),
    Number(f64),
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Text(text) => f.write_str(text),
            ReadingValue::Count(count) => write!(f, "{count}"),
            ReadingValue::Number(number) => write!(f, "{number:.1}"),
        }
    }
}

pub struct ReadingDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub kind: ReadingKind,
    pub value: fn(&Snapshot) -> Option<ReadingValue>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn number(value: Option<f64>) -> Option<ReadingValue> {
    value.map(|v| ReadingValue::Number(round1(v)))
}

fn text(value: &Option<String>) -> Option<ReadingValue> {
    value.clone().map(ReadingValue::Text)
}

/// Readings every modem exposes.
pub static READINGS: &[ReadingDescriptor] = &[
    ReadingDescriptor {
        key: "connectivity",
        name: "Connectivity State",
        unit: None,
        kind: ReadingKind::State,
        value: |s| text(&s.startup.connectivity),
    },
    ReadingDescriptor {
        key: "boot",
        name: "Boot State",
        unit: None,
        kind: ReadingKind::State,
        value: |s| text(&s.startup.boot),
    },
    ReadingDescriptor {
        key: "security",
        name: "Security",
        unit: None,
        kind: ReadingKind::State,
        value: |s| text(&s.startup.security),
    },
    ReadingDescriptor {
        key: "ds_channels",
        name: "Downstream Channels",
        unit: None,
        kind: ReadingKind::Measurement,
        value: |s| Some(ReadingValue::Count(s.downstream.len() as u64)),
    },
    ReadingDescriptor {
        key: "us_channels",
        name: "Upstream Channels",
        unit: None,
        kind: ReadingKind::Measurement,
        value: |s| Some(ReadingValue::Count(s.upstream.len() as u64)),
    },
    ReadingDescriptor {
        key: "ds_avg_power",
        name: "Downstream Average Power",
        unit: Some("dBmV"),
        kind: ReadingKind::Measurement,
        value: |s| number(s.downstream_avg_power()),
    },
    ReadingDescriptor {
        key: "ds_avg_snr",
        name: "Downstream Average SNR",
        unit: Some("dB"),
        kind: ReadingKind::Measurement,
        value: |s| number(s.downstream_avg_snr()),
    },
    ReadingDescriptor {
        key: "us_avg_power",
        name: "Upstream Average Power",
        unit: Some("dBmV"),
        kind: ReadingKind::Measurement,
        value: |s| number(s.upstream_avg_power()),
    },
    ReadingDescriptor {
        key: "ds_total_corrected",
        name: "Downstream Total Corrected Errors",
        unit: None,
        kind: ReadingKind::TotalIncreasing,
        value: |s| Some(ReadingValue::Count(s.downstream_total_corrected())),
    },
    ReadingDescriptor {
        key: "ds_total_uncorrectable",
        name: "Downstream Total Uncorrectable Errors",
        unit: None,
        kind: ReadingKind::TotalIncreasing,
        value: |s| Some(ReadingValue::Count(s.downstream_total_uncorrectable())),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelField {
    DownstreamPower,
    DownstreamSnr,
    UpstreamPower,
}

impl ChannelField {
    fn key_prefix(self) -> &'static str {
        match self {
            ChannelField::DownstreamPower | ChannelField::DownstreamSnr => "ds",
            ChannelField::UpstreamPower => "us",
        }
    }

    fn name_prefix(self) -> &'static str {
        match self {
            ChannelField::DownstreamPower | ChannelField::DownstreamSnr => "DS",
            ChannelField::UpstreamPower => "US",
        }
    }

    fn suffix(self) -> (&'static str, &'static str) {
        match self {
            ChannelField::DownstreamPower | ChannelField::UpstreamPower => ("power", "Power"),
            ChannelField::DownstreamSnr => ("snr", "SNR"),
        }
    }

    fn unit(self) -> &'static str {
        match self {
            ChannelField::DownstreamPower | ChannelField::UpstreamPower => "dBmV",
            ChannelField::DownstreamSnr => "dB",
        }
    }

    fn value(self, snapshot: &Snapshot, channel: u32) -> Option<f64> {
        match self {
            ChannelField::DownstreamPower => {
                snapshot.downstream_channel(channel).map(|c| c.power_dbmv)
            }
            ChannelField::DownstreamSnr => snapshot.downstream_channel(channel).map(|c| c.snr_db),
            ChannelField::UpstreamPower => snapshot.upstream_channel(channel).map(|c| c.power_dbmv),
        }
    }
}

/// One reading bound to a channel number.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReading {
    pub channel: u32,
    pub field: ChannelField,
}

impl ChannelReading {
    pub fn key(&self) -> String {
        let (key, _) = self.field.suffix();
        format!("{}_ch{}_{}", self.field.key_prefix(), self.channel, key)
    }

    pub fn name(&self) -> String {
        let (_, name) = self.field.suffix();
        format!("{} Channel {} {}", self.field.name_prefix(), self.channel, name)
    }
}

/// Per-channel readings for the channels present in `snapshot`, downstream
/// first.
pub fn channel_readings(snapshot: &Snapshot) -> Vec<ChannelReading> {
    let downstream = snapshot.downstream.iter().flat_map(|c| {
        [ChannelField::DownstreamPower, ChannelField::DownstreamSnr].map(|field| ChannelReading {
            channel: c.channel,
            field,
        })
    });
    let upstream = snapshot.upstream.iter().map(|c| ChannelReading {
        channel: c.channel,
        field: ChannelField::UpstreamPower,
    });
    downstream.chain(upstream).collect()
}

/// A reading with its current value. `value` is `None` when the modem is
/// unavailable or the page did not carry the field.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Reading {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub kind: ReadingKind,
    pub value: Option<ReadingValue>,
}

/// Evaluates every reading against the poll state.
///
/// Channel readings are derived from the retained snapshot, so they stay
/// listed (as unavailable) while the modem cannot be reached.
pub fn collect_readings(state: &PollState) -> Vec<Reading> {
    let current = state.current();

    let mut readings: Vec<Reading> = READINGS
        .iter()
        .map(|descriptor| Reading {
            key: descriptor.key.to_string(),
            name: descriptor.name.to_string(),
            unit: descriptor.unit,
            kind: descriptor.kind,
            value: current.and_then(descriptor.value),
        })
        .collect();

    if let Some(retained) = state.snapshot.as_deref() {
        readings.extend(channel_readings(retained).into_iter().map(|reading| Reading {
            key: reading.key(),
            name: reading.name(),
            unit: Some(reading.field.unit()),
            kind: ReadingKind::Measurement,
            value: number(current.and_then(|s| reading.field.value(s, reading.channel))),
        }));
    }

    readings
}
