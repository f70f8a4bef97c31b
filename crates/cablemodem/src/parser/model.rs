use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::cell_text;

/// Returned when no detection strategy recognises the page.
pub const UNKNOWN_MODEL: &str = "ARRIS Unknown";

/// Models known to render the status page this crate understands.
pub const SUPPORTED_MODELS: [&str; 4] = ["SB6183", "SB6190", "TG1682G", "TG3482G"];

/// Id of the element some firmwares use to print the model number.
pub const MODEL_NUMBER_ID: &str = "thisModelNumberIs";

static MODEL_NUMBER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&format!("#{MODEL_NUMBER_ID}")).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static MODEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(SB\d{4}|TG\d{4}[A-Z]?)").unwrap());

/// Works out which modem produced the page.
///
/// Tries the dedicated model number element, then the page title against
/// [`SUPPORTED_MODELS`], then a pattern scan over the whole document text.
/// Falls back to [`UNKNOWN_MODEL`].
pub fn detect_model(document: &Html) -> String {
    if let Some(model) = model_number_element(document) {
        debug!(model = %model, "Model detected from model number element");
        return model;
    }
    if let Some(model) = model_from_title(document) {
        debug!(model, "Model detected from page title");
        return model.to_string();
    }
    if let Some(model) = model_from_text(document) {
        debug!(model = %model, "Model detected from page text");
        return model;
    }

    debug!("Could not detect modem model");
    UNKNOWN_MODEL.to_string()
}

fn model_number_element(document: &Html) -> Option<String> {
    document
        .select(&MODEL_NUMBER)
        .next()
        .map(cell_text)
        .filter(|text| !text.is_empty())
}

fn model_from_title(document: &Html) -> Option<&'static str> {
    let title: String = document.select(&TITLE).next()?.text().collect();
    SUPPORTED_MODELS
        .into_iter()
        .find(|model| title.contains(model))
}

fn model_from_text(document: &Html) -> Option<String> {
    let text: String = document.root_element().text().collect();
    MODEL_REGEX
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
