use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Page {0} has no data table")]
    MissingTable(String),

    // The dam data itself is served by the page the iframe points to
    #[error("Page {0} has no data frame")]
    MissingFrame(String),

    #[error("Malformed time '{value}' on {date}")]
    MalformedTime { date: NaiveDate, value: String },
}
