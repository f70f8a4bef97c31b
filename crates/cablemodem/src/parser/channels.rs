use std::str::FromStr;

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::{data_rows, row_cells, status_tables, table_header};
use crate::error::RowError;
use crate::status::{DownstreamChannel, UpstreamChannel};

/// Header text identifying the downstream channel table.
pub const DOWNSTREAM_MARKER: &str = "Downstream Bonded Channels";
/// Header text identifying the upstream channel table.
pub const UPSTREAM_MARKER: &str = "Upstream Bonded Channels";

/// Minimum number of cells for a downstream data row.
pub const DOWNSTREAM_COLUMNS: usize = 9;
/// Minimum number of cells for an upstream data row.
pub const UPSTREAM_COLUMNS: usize = 7;

const HZ: &str = "Hz";
const DBMV: &str = "dBmV";
const DB: &str = "dB";

/// Parses the downstream bonded channel table.
///
/// Rows that are too short are skipped; rows with a malformed numeric cell
/// are dropped with a warning. Page order is kept.
pub fn parse_downstream(document: &Html) -> Vec<DownstreamChannel> {
    parse_channel_table(
        document,
        DOWNSTREAM_MARKER,
        DOWNSTREAM_COLUMNS,
        parse_downstream_row,
    )
}

/// Parses the upstream bonded channel table. Same rules as
/// [`parse_downstream`].
pub fn parse_upstream(document: &Html) -> Vec<UpstreamChannel> {
    parse_channel_table(
        document,
        UPSTREAM_MARKER,
        UPSTREAM_COLUMNS,
        parse_upstream_row,
    )
}

fn find_channel_table<'a>(document: &'a Html, marker: &str) -> Option<ElementRef<'a>> {
    status_tables(document).find(|table| {
        table_header(*table).is_some_and(|header| header.contains(marker))
    })
}

fn parse_channel_table<T>(
    document: &Html,
    marker: &'static str,
    min_columns: usize,
    parse_row: fn(&[String]) -> Result<T, RowError>,
) -> Vec<T> {
    let Some(table) = find_channel_table(document, marker) else {
        debug!(table = marker, "Channel table not found");
        return Vec::new();
    };

    let mut channels = Vec::new();
    for (index, row) in data_rows(table).enumerate() {
        let cells = row_cells(row);
        if cells.len() < min_columns {
            debug!(
                table = marker,
                row = index,
                columns = cells.len(),
                "Skipping short channel row"
            );
            continue;
        }

        match parse_row(&cells) {
            Ok(channel) => channels.push(channel),
            Err(e) => warn!(
                table = marker,
                row = index,
                error = %e,
                "Dropping channel row that failed to parse"
            ),
        }
    }
    channels
}

fn parse_downstream_row(cells: &[String]) -> Result<DownstreamChannel, RowError> {
    Ok(DownstreamChannel {
        channel: parse_int(&cells[0], "channel")?,
        lock_status: cells[1].clone(),
        modulation: cells[2].clone(),
        channel_id: parse_int(&cells[3], "channel_id")?,
        frequency_hz: parse_int(strip_unit(&cells[4], HZ), "frequency")?,
        power_dbmv: parse_float(strip_unit(&cells[5], DBMV), "power")?,
        snr_db: parse_float(strip_unit(&cells[6], DB), "snr")?,
        corrected: parse_int(&cells[7], "corrected")?,
        uncorrectable: parse_int(&cells[8], "uncorrectable")?,
    })
}

fn parse_upstream_row(cells: &[String]) -> Result<UpstreamChannel, RowError> {
    Ok(UpstreamChannel {
        channel: parse_int(&cells[0], "channel")?,
        lock_status: cells[1].clone(),
        channel_type: cells[2].clone(),
        channel_id: parse_int(&cells[3], "channel_id")?,
        symbol_rate: cells[4].clone(),
        frequency_hz: parse_int(strip_unit(&cells[5], HZ), "frequency")?,
        power_dbmv: parse_float(strip_unit(&cells[6], DBMV), "power")?,
    })
}

/// Removes a trailing unit, with or without the separating space.
fn strip_unit<'a>(text: &'a str, unit: &str) -> &'a str {
    let text = text.trim();
    text.strip_suffix(unit).unwrap_or(text).trim_end()
}

fn parse_int<T: FromStr>(text: &str, column: &'static str) -> Result<T, RowError> {
    text.trim().parse().map_err(|_| RowError::Int {
        column,
        text: text.to_string(),
    })
}

fn parse_float(text: &str, column: &'static str) -> Result<f64, RowError> {
    text.trim().parse().map_err(|_| RowError::Float {
        column,
        text: text.to_string(),
    })
}
