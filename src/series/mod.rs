//! Hourly time series: the month-by-month station and dam fetchers and the
//! non-numeric cell pass applied to their results.

pub mod dam;
pub mod error;
pub mod non_numeric;
pub mod station;
