use crate::catalog::error::CatalogError;
use crate::error::WisError;
use crate::fetch::Transport;
use crate::html::{elements_named, raw_text};
use crate::portal::search_url;
use crate::types::kind::StationKind;
use crate::types::station::WatershedRecord;
use log::{debug, info};
use scraper::Html;

// The watershed selector sits in the eleventh cell of the search form.
const SELECTOR_CELL: usize = 10;

/// Fetches the search form and reads every watershed option.
pub(crate) fn fetch_watersheds<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
) -> Result<Vec<WatershedRecord>, WisError> {
    let url = search_url(base_url, StationKind::WaterLevelFlow, "", 0);
    let html = transport.get_text(&url)?;
    let watersheds = parse_watersheds(&html, &url)?;
    info!("Found {} watersheds", watersheds.len());
    Ok(watersheds)
}

pub(crate) fn parse_watersheds(html: &str, url: &str) -> Result<Vec<WatershedRecord>, CatalogError> {
    let document = Html::parse_document(html);
    let cell = elements_named(document.root_element(), "td")
        .nth(SELECTOR_CELL)
        .ok_or_else(|| CatalogError::MissingWatershedSelector(url.to_string()))?;

    Ok(elements_named(cell, "option")
        .filter_map(|option| {
            let Some(id) = option.value().attr("value") else {
                debug!("Skipping watershed option without a value");
                return None;
            };
            Some(WatershedRecord {
                name: raw_text(option).replace('\n', "").trim().to_string(),
                id: id.to_string(),
            })
        })
        .collect())
}
