mod catalog;
mod config;
mod error;
mod fetch;
mod html;
mod portal;
mod series;
mod types;
mod wis;

pub use config::*;
pub use error::WisError;
pub use wis::*;

pub use catalog::coordinates::parse_coordinates;
pub use catalog::error::CatalogError;
pub use catalog::pages::CatalogScan;

pub use fetch::error::FetchError;
pub use fetch::http::HttpTransport;
pub use fetch::retry::{get_with_retry, RetryOutcome};
pub use fetch::Transport;

pub use html::{read_tables, HtmlCell, HtmlRow, HtmlTable};

pub use series::error::SeriesError;
pub use series::non_numeric::{replace_non_numeric, scan_non_numeric};

pub use types::crs::Crs;
pub use types::kind::*;
pub use types::month::{Month, MonthRange};
pub use types::series::*;
pub use types::station::*;
