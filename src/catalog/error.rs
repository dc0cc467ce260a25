use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Page {url} has no table at position {index}")]
    MissingTable { url: String, index: usize },

    #[error("Row {row} of {url} has {found} cells, expected at least {expected}")]
    ShortRow {
        url: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    // The station id is the first quoted argument of the name cell's link
    #[error("Row {row} of {url} has no station link")]
    MissingStationLink { url: String, row: usize },

    #[error("Page {0} has no watershed selector cell")]
    MissingWatershedSelector(String),
}
