use crate::catalog::error::CatalogError;
use crate::fetch::error::FetchError;
use crate::series::error::SeriesError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Unknown kind '{0}'")]
    UnknownKind(String),

    #[error("Failed to build DataFrame")]
    DataFrame(#[from] PolarsError),
}
