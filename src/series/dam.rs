use crate::error::WisError;
use crate::fetch::error::FetchError;
use crate::fetch::retry::{get_with_retry, RetryOutcome};
use crate::fetch::Transport;
use crate::html::{elements_named, read_tables};
use crate::portal::dam_data_url;
use crate::series::error::SeriesError;
use crate::types::kind::DamVariable;
use crate::types::month::Month;
use crate::types::series::{SeriesColumn, SeriesTable};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::{debug, info, warn};
use scraper::Html;
use url::Url;

const DATE_CELL: usize = 0;
const TIME_CELL: usize = 1;
const FIRST_VALUE_CELL: usize = 2;
const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y-%m-%d", "%Y%m%d"];

/// One reading of the dam table: the reconstructed timestamp and the five
/// variable cells in [`DamVariable::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DamRow {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) values: Vec<String>,
}

/// Fetches the dam table month by month.
///
/// Each month page only embeds the data through an iframe, and the frame
/// target can take a while to become available, so it is requested up to
/// `max_attempts` times. A month whose attempts all fail is logged and
/// skipped; a frame without a table contributes nothing. Returns `None` when
/// no month produced a table.
pub(crate) fn fetch_dam_table<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    dam_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    max_attempts: u32,
) -> Result<Option<SeriesTable>, WisError> {
    if start > end {
        return Err(SeriesError::InvalidDateRange { start, end }.into());
    }

    let mut rows = Vec::new();
    let mut found_table = false;
    for month in Month::range(Month::of(start), Month::of(end)) {
        let url = dam_data_url(base_url, dam_id, month);
        debug!("Fetching dam {} for {}", dam_id, month);
        let page = transport.get_text(&url)?;
        let frame_url = frame_url(base_url, &page, &url)?;

        match get_with_retry(transport, &frame_url, max_attempts)? {
            RetryOutcome::Fetched(body) => match parse_dam_frame(&body)? {
                Some(month_rows) => {
                    found_table = true;
                    rows.extend(month_rows);
                }
                None => debug!("No dam table for {} at {}", month, frame_url),
            },
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                let status = last_error
                    .status()
                    .map(|s| s.as_u16().to_string())
                    .unwrap_or_else(|| last_error.to_string());
                warn!(
                    "Skipping dam {} month {} after {} attempts, error code: {}",
                    dam_id, month, attempts, status
                );
            }
        }
    }

    if !found_table {
        info!("Dam {}: no data between {} and {}", dam_id, start, end);
        return Ok(None);
    }

    let mut table = into_table(rows);
    table.retain_window(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
    info!("Dam {}: {} hourly rows from {} to {}", dam_id, table.len(), start, end);
    Ok(Some(table))
}

/// Resolves the month page's first iframe against the portal root.
fn frame_url(base_url: &str, page: &str, page_url: &str) -> Result<String, WisError> {
    let document = Html::parse_document(page);
    let src = elements_named(document.root_element(), "iframe")
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .ok_or_else(|| SeriesError::MissingFrame(page_url.to_string()))?;

    let joined = Url::parse(base_url)
        .and_then(|base| base.join(src))
        .map_err(|e| FetchError::InvalidUrl(src.to_string(), e))?;
    Ok(joined.into())
}

/// Reads the first table of a frame page. `None` means the frame has no
/// table at all; rows whose first cell is not a date are headers or notes.
pub(crate) fn parse_dam_frame(html: &str) -> Result<Option<Vec<DamRow>>, SeriesError> {
    let tables = read_tables(html);
    let Some(table) = tables.first() else {
        return Ok(None);
    };

    let mut rows = Vec::new();
    for row in &table.rows {
        let Some(date) = row.cell(DATE_CELL).and_then(parse_date) else {
            continue;
        };
        let time = row.cell(TIME_CELL).unwrap_or_default();
        let timestamp = parse_time_offset(time)
            .and_then(|offset| date.and_time(NaiveTime::MIN).checked_add_signed(offset))
            .ok_or_else(|| SeriesError::MalformedTime {
                date,
                value: time.to_string(),
            })?;

        let values = (0..DamVariable::ALL.len())
            .map(|i| row.cell(FIRST_VALUE_CELL + i).unwrap_or_default().to_string())
            .collect();
        rows.push(DamRow {
            timestamp,
            values,
        });
    }
    Ok(Some(rows))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// `HH:MM` as an offset from midnight; `24:00` lands on the next day.
/// Hours run `0..=24` and minutes `0..=59`, and `24` only takes `:00`.
fn parse_time_offset(text: &str) -> Option<TimeDelta> {
    let (hours, minutes) = text.split_once(':')?;
    let hours: u8 = hours.trim().parse().ok()?;
    let minutes: u8 = minutes.trim().parse().ok()?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes != 0) {
        return None;
    }
    TimeDelta::try_hours(hours.into())?.checked_add(&TimeDelta::try_minutes(minutes.into())?)
}

fn into_table(rows: Vec<DamRow>) -> SeriesTable {
    let mut index = Vec::with_capacity(rows.len());
    let mut columns: Vec<SeriesColumn> = DamVariable::ALL
        .iter()
        .map(|v| SeriesColumn::new(v.column_name(), Vec::with_capacity(rows.len())))
        .collect();
    for row in rows {
        index.push(row.timestamp);
        for (column, value) in columns.iter_mut().zip(row.values) {
            column.values.push(value);
        }
    }
    SeriesTable { index, columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fixtures::FixtureTransport;
    use reqwest::StatusCode;

    const BASE: &str = "http://portal.test";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn frame_path(month: Month) -> String {
        format!("/frame/{}-{:02}.html", month.year(), month.month())
    }

    fn month_page(month: Month) -> String {
        format!(
            "<html><body><iframe src=\"{}\"></iframe></body></html>",
            frame_path(month)
        )
    }

    /// Hourly rows for `days` days of `month`, written with the portal's
    /// 01:00..24:00 hours. Inflow holds `DD-HH` for identification.
    fn frame_page(month: Month, days: u32) -> String {
        let mut rows = String::new();
        for day in 1..=days {
            for hour in 1..=24 {
                rows.push_str(&format!(
                    "<tr><td>{}/{:02}/{:02}</td><td>{hour:02}:00</td>\
                     <td>0</td><td>1000</td><td>{day}-{hour}</td><td>5.0</td><td>80.0</td></tr>",
                    month.year(),
                    month.month(),
                    day
                ));
            }
        }
        format!(
            "<html><body><table>\
             <tr><th>日付</th><th>時刻</th><th>雨量</th><th>貯水量</th><th>流入量</th><th>放流量</th><th>貯水率</th></tr>\
             {rows}\
             </table></body></html>"
        )
    }

    fn frame_url_of(month: Month) -> String {
        format!("{BASE}{}", frame_path(month))
    }

    #[test]
    fn test_time_offset_rolls_24_over() {
        assert_eq!(parse_time_offset("01:00"), Some(TimeDelta::hours(1)));
        assert_eq!(parse_time_offset("24:00"), Some(TimeDelta::hours(24)));
        assert_eq!(parse_time_offset("12:30"), Some(TimeDelta::minutes(750)));
        assert_eq!(parse_time_offset("noon"), None);
    }

    #[test]
    fn test_time_outside_the_day_is_rejected() {
        for text in ["-5:75", "25:00", "24:30", "12:60", "3000000000:00", "1:-1"] {
            assert_eq!(parse_time_offset(text), None, "{text}");
        }
    }

    #[test]
    fn test_frame_rows_are_reconstructed_in_order() {
        let rows = parse_dam_frame(&frame_page(Month(2020, 1), 2)).unwrap().unwrap();
        assert_eq!(rows.len(), 48);
        assert_eq!(rows[0].timestamp, date(2020, 1, 1).and_hms_opt(1, 0, 0).unwrap());
        assert_eq!(rows[23].timestamp, date(2020, 1, 2).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(rows[23].values[2], "1-24");
        assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_frame_without_table_is_none() {
        assert_eq!(parse_dam_frame("<html><body>準備中</body></html>").unwrap(), None);
    }

    #[test]
    fn test_malformed_time_is_an_error() {
        let html = "<table><tr><td>2020/01/01</td><td>--</td><td>0</td></tr></table>";
        assert!(matches!(
            parse_dam_frame(html),
            Err(SeriesError::MalformedTime { .. })
        ));
    }

    #[test]
    fn test_out_of_range_time_is_an_error() {
        for time in ["3000000000:00", "-5:75", "24:15"] {
            let html = format!(
                "<table><tr><td>2020/01/02</td><td>{time}</td><td>0</td></tr></table>"
            );
            assert!(
                matches!(
                    parse_dam_frame(&html),
                    Err(SeriesError::MalformedTime { ref value, .. }) if value == time
                ),
                "{time}"
            );
        }
    }

    #[test]
    fn test_dam_table_spans_months_with_rollover() {
        let (jan, feb) = (Month(2020, 1), Month(2020, 2));
        let transport = FixtureTransport::new()
            .page(&dam_data_url(BASE, "9", jan), &month_page(jan))
            .page(&dam_data_url(BASE, "9", feb), &month_page(feb))
            .page(&frame_url_of(jan), &frame_page(jan, 31))
            .page(&frame_url_of(feb), &frame_page(feb, 29));

        let table = fetch_dam_table(&transport, BASE, "9", date(2020, 1, 31), date(2020, 2, 2), 20)
            .unwrap()
            .unwrap();

        assert!(table.is_regular_hourly());
        assert_eq!(
            table.first_timestamp(),
            Some(date(2020, 1, 31).and_hms_opt(1, 0, 0).unwrap())
        );
        assert_eq!(
            table.last_timestamp(),
            Some(date(2020, 2, 2).and_hms_opt(0, 0, 0).unwrap())
        );
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["rainfall", "storage", "inflow", "outflow", "storage_ratio"]);
        // 00:00 on Feb 1 is the 24:00 reading of Jan 31
        let inflow = &table.column("inflow").unwrap().values;
        assert_eq!(inflow[23], "31-24");
    }

    #[test]
    fn test_month_without_table_does_not_stop_later_months() {
        let (jan, feb) = (Month(2020, 1), Month(2020, 2));
        let transport = FixtureTransport::new()
            .page(&dam_data_url(BASE, "9", jan), &month_page(jan))
            .page(&dam_data_url(BASE, "9", feb), &month_page(feb))
            .page(&frame_url_of(jan), "<html><body></body></html>")
            .page(&frame_url_of(feb), &frame_page(feb, 29));

        let table = fetch_dam_table(&transport, BASE, "9", date(2020, 1, 1), date(2020, 2, 29), 20)
            .unwrap()
            .unwrap();
        assert_eq!(
            table.first_timestamp(),
            Some(date(2020, 2, 1).and_hms_opt(1, 0, 0).unwrap())
        );
        assert_eq!(transport.request_count(&frame_url_of(jan)), 1);
    }

    #[test]
    fn test_no_table_in_any_month_is_none() {
        let jan = Month(2020, 1);
        let transport = FixtureTransport::new()
            .page(&dam_data_url(BASE, "9", jan), &month_page(jan))
            .page(&frame_url_of(jan), "<html></html>");
        let result =
            fetch_dam_table(&transport, BASE, "9", date(2020, 1, 1), date(2020, 1, 31), 20).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_exhausted_month_is_skipped() {
        let (jan, feb) = (Month(2020, 1), Month(2020, 2));
        let transport = FixtureTransport::new()
            .page(&dam_data_url(BASE, "9", jan), &month_page(jan))
            .page(&dam_data_url(BASE, "9", feb), &month_page(feb))
            .status(&frame_url_of(jan), StatusCode::SERVICE_UNAVAILABLE)
            .page(&frame_url_of(feb), &frame_page(feb, 29));

        let table = fetch_dam_table(&transport, BASE, "9", date(2020, 1, 1), date(2020, 2, 29), 3)
            .unwrap()
            .unwrap();
        assert_eq!(transport.request_count(&frame_url_of(jan)), 3);
        assert_eq!(transport.request_count(&frame_url_of(feb)), 1);
        assert_eq!(
            table.first_timestamp(),
            Some(date(2020, 2, 1).and_hms_opt(1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_fatal_frame_error_propagates() {
        let jan = Month(2020, 1);
        let transport = FixtureTransport::new()
            .page(&dam_data_url(BASE, "9", jan), &month_page(jan))
            .fatal(&frame_url_of(jan));
        let result = fetch_dam_table(&transport, BASE, "9", date(2020, 1, 1), date(2020, 1, 2), 20);
        assert!(matches!(result, Err(WisError::Fetch(FetchError::InvalidUrl(..)))));
        assert_eq!(transport.request_count(&frame_url_of(jan)), 1);
    }

    #[test]
    fn test_page_without_frame_is_an_error() {
        let jan = Month(2020, 1);
        let transport =
            FixtureTransport::new().page(&dam_data_url(BASE, "9", jan), "<html></html>");
        let result = fetch_dam_table(&transport, BASE, "9", date(2020, 1, 1), date(2020, 1, 2), 20);
        assert!(matches!(
            result,
            Err(WisError::Series(SeriesError::MissingFrame(_)))
        ));
    }
}
