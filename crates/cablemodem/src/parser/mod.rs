//! Layout-tolerant scraping of the modem status page.
//!
//! Firmware revisions and models render slightly different markup, so nothing
//! here relies on a fixed document structure. Tables are located by their
//! style class and header text, startup rows by substring match on their
//! label, and the model by a chain of increasingly loose lookups. Every entry
//! point returns a (possibly empty) result instead of failing.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

mod channels;
mod model;
mod startup;

#[cfg(test)]
pub(crate) mod test_pages;

pub use channels::{
    DOWNSTREAM_COLUMNS, DOWNSTREAM_MARKER, UPSTREAM_COLUMNS, UPSTREAM_MARKER, parse_downstream,
    parse_upstream,
};
pub use model::{MODEL_NUMBER_ID, SUPPORTED_MODELS, UNKNOWN_MODEL, detect_model};
pub use startup::parse_startup;

/// Leading rows of every status table that hold the title and column labels.
pub const HEADER_ROWS: usize = 2;

static STATUS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.simpleTable").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());

/// All tables carrying the status table style, in document order.
pub(crate) fn status_tables(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&STATUS_TABLE)
}

/// Text of the first header cell of `table`, if it has one.
pub(crate) fn table_header(table: ElementRef<'_>) -> Option<String> {
    table
        .select(&HEADER_CELL)
        .next()
        .map(|th| th.text().collect())
}

/// Rows of `table` after the header rows.
pub(crate) fn data_rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    table.select(&ROW).skip(HEADER_ROWS)
}

/// Texts of the data cells of `row`.
pub(crate) fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL).map(cell_text).collect()
}

/// Concatenation of the element's text nodes, each stripped of surrounding
/// whitespace.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_strips_each_text_node() {
        let document = Html::parse_fragment("<div>\n  <b> 5.7 </b>\n dBmV </div>");
        let div = document
            .select(&Selector::parse("div").unwrap())
            .next()
            .unwrap();
        assert_eq!(cell_text(div), "5.7dBmV");
    }

    #[test]
    fn test_data_rows_skip_header_rows() {
        let document = Html::parse_document(test_pages::SB6183_PAGE);
        let startup = status_tables(&document).next().unwrap();
        let first = data_rows(startup).next().map(row_cells).unwrap();
        assert_eq!(first[0], "Acquire Downstream Channel");
        assert_eq!(table_header(startup).as_deref(), Some("Startup Procedure"));
    }
}
