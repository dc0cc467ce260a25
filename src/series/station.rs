use crate::error::WisError;
use crate::fetch::Transport;
use crate::html::read_tables;
use crate::portal::station_data_url;
use crate::series::error::SeriesError;
use crate::types::kind::Quantity;
use crate::types::month::Month;
use crate::types::series::{SeriesColumn, SeriesTable};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};

// Rows above the hourly grid: title and unit lines.
const LEADING_ROWS: usize = 2;

/// Fetches every month from the start month through the end month and
/// stitches them into one hourly table.
///
/// Each month is requested from its first day, so the stitched values begin
/// at 01:00 on the first of the start month (the first hourly slot of the
/// day). The table is then cut to `[start 00:00, end 00:00]`.
pub(crate) fn fetch_station_table<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    station_id: &str,
    quantity: Quantity,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SeriesTable, WisError> {
    if start > end {
        return Err(SeriesError::InvalidDateRange { start, end }.into());
    }

    let first_month = Month::of(start);
    let mut values = Vec::new();
    for month in Month::range(first_month, Month::of(end)) {
        let url = station_data_url(base_url, quantity, station_id, month);
        debug!("Fetching {} for station {} from {}", quantity, station_id, month);
        let html = transport.get_text(&url)?;
        values.extend(parse_station_month(&html, quantity, &url)?);
    }

    let origin = first_month.first_day().and_time(NaiveTime::MIN) + Duration::hours(1);
    let index: Vec<NaiveDateTime> = (0..values.len() as i64)
        .map(|i| origin + Duration::hours(i))
        .collect();

    let mut table = SeriesTable {
        index,
        columns: vec![SeriesColumn::new(quantity.column_name(), values)],
    };
    table.retain_window(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
    info!(
        "Station {} {}: {} hourly values from {} to {}",
        station_id,
        quantity,
        table.len(),
        start,
        end
    );
    Ok(table)
}

/// Flattens one month page into hourly values, row by row.
///
/// The row label (the date) is dropped, short rows are padded with empty
/// cells, and the water level table's trailing summary row is skipped.
pub(crate) fn parse_station_month(
    html: &str,
    quantity: Quantity,
    url: &str,
) -> Result<Vec<String>, SeriesError> {
    let tables = read_tables(html);
    let table = tables
        .first()
        .ok_or_else(|| SeriesError::MissingTable(url.to_string()))?;

    let mut rows = table.data_rows(LEADING_ROWS);
    if quantity.has_trailer_row() {
        rows = rows.split_last().map(|(_, rest)| rest).unwrap_or(rows);
    }

    let width = rows
        .iter()
        .map(|r| r.cells.len().saturating_sub(1))
        .max()
        .unwrap_or(0);
    let mut values = Vec::with_capacity(rows.len() * width);
    for row in rows {
        let before = values.len();
        values.extend(row.values().map(str::to_string));
        values.resize(before + width, String::new());
    }
    Ok(values)
}
