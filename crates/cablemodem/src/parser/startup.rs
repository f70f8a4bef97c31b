use scraper::Html;
use tracing::debug;

use super::{data_rows, row_cells, status_tables};
use crate::status::StartupStatus;

/// Parses the startup procedure table, the first status table on the page.
///
/// Rows are classified by substring match on their label so that wording
/// differences between firmwares still land in the right field. Rows with an
/// unknown label are ignored. Returns an empty status when the table is
/// missing.
pub fn parse_startup(document: &Html) -> StartupStatus {
    let mut startup = StartupStatus::default();

    let Some(table) = status_tables(document).next() else {
        debug!("Startup procedure table not found");
        return startup;
    };

    for row in data_rows(table) {
        let cells = row_cells(row);
        let [label, status, ..] = cells.as_slice() else {
            continue;
        };

        let field = if label.contains("Connectivity State") {
            &mut startup.connectivity
        } else if label.contains("Boot State") {
            &mut startup.boot
        } else if label.contains("Configuration File") {
            &mut startup.config
        } else if label.contains("Security") {
            &mut startup.security
        } else {
            continue;
        };
        *field = Some(status.clone());
    }

    startup
}
