use crate::catalog::error::CatalogError;
use crate::catalog::metadata::resolve_metadata;
use crate::error::WisError;
use crate::fetch::Transport;
use crate::html::{cell_text, elements_named, raw_text};
use crate::portal::search_url;
use crate::types::kind::StationKind;
use crate::types::station::StationRecord;
use log::{debug, info};
use scraper::{ElementRef, Html};
use std::collections::VecDeque;

// Position of the listing among the page's tables, counted in document order.
const LISTING_TABLE: usize = 2;
const ITEM_CELL: usize = 1;
const WATERSHED_CELL: usize = 2;
const RIVER_CELL: usize = 3;
const NAME_CELL: usize = 4;
const LOCATION_CELL: usize = 5;
const CELLS_PER_ROW: usize = 6;

/// How a listing page ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageEnd {
    /// Every row was a station; the next page may hold more.
    Continues,
    /// The page held the terminal row, or no rows at all.
    EndOfCatalog,
}

#[derive(Debug)]
pub(crate) struct ListingPage {
    pub(crate) records: Vec<StationRecord>,
    pub(crate) end: PageEnd,
}

/// Parses one search result page into station records.
///
/// Scanning stops at the first row whose watershed cell holds exactly one
/// character: the portal pads the listing with such a row once it runs out
/// of stations. That row is discarded.
pub(crate) fn parse_listing_page(
    html: &str,
    kind: StationKind,
    url: &str,
) -> Result<ListingPage, CatalogError> {
    let document = Html::parse_document(html);
    let table = elements_named(document.root_element(), "table")
        .nth(LISTING_TABLE)
        .ok_or_else(|| CatalogError::MissingTable {
            url: url.to_string(),
            index: LISTING_TABLE,
        })?;

    let mut records = Vec::new();
    for (row, tr) in elements_named(table, "tr").enumerate().skip(1) {
        let cells: Vec<ElementRef<'_>> = elements_named(tr, "td").collect();

        if let Some(marker) = cells.get(WATERSHED_CELL) {
            if raw_text(*marker).chars().count() == 1 {
                debug!("End of catalog at row {} of {}", row, url);
                return Ok(ListingPage {
                    records,
                    end: PageEnd::EndOfCatalog,
                });
            }
        }
        if cells.len() < CELLS_PER_ROW {
            return Err(CatalogError::ShortRow {
                url: url.to_string(),
                row,
                found: cells.len(),
                expected: CELLS_PER_ROW,
            });
        }

        let station_code = station_link_id(cells[NAME_CELL]).ok_or_else(|| {
            CatalogError::MissingStationLink {
                url: url.to_string(),
                row,
            }
        })?;
        records.push(StationRecord {
            kind,
            item_label: (kind != StationKind::Dam).then(|| cell_text(cells[ITEM_CELL])),
            watershed_name: cell_text(cells[WATERSHED_CELL]),
            river_name: cell_text(cells[RIVER_CELL]),
            station_name: cell_text(cells[NAME_CELL]),
            location: cell_text(cells[LOCATION_CELL]),
            station_code,
            longitude: None,
            latitude: None,
            zero_point_elevation: None,
        });
    }

    let end = if records.is_empty() {
        PageEnd::EndOfCatalog
    } else {
        PageEnd::Continues
    };
    Ok(ListingPage { records, end })
}

/// The first single-quoted argument of the cell's link, e.g. the id in
/// `javascript:SiteDetail1('303031283310010')`.
fn station_link_id(cell: ElementRef<'_>) -> Option<String> {
    let href = elements_named(cell, "a").next()?.value().attr("href")?;
    href.split('\'').nth(1).map(str::to_string)
}

/// Lazily walks the site search listing page by page.
///
/// Pages are requested only as records are consumed, and no page past the
/// end of the catalog is ever requested. In verbose mode every record is
/// enriched from its detail page before it is yielded. The first error ends
/// the scan.
pub struct CatalogScan<'a, T: Transport + ?Sized> {
    transport: &'a T,
    base_url: &'a str,
    kind: StationKind,
    watershed_id: String,
    verbose: bool,
    page: u32,
    pending: VecDeque<StationRecord>,
    finished: bool,
}

impl<'a, T: Transport + ?Sized> CatalogScan<'a, T> {
    pub(crate) fn new(
        transport: &'a T,
        base_url: &'a str,
        kind: StationKind,
        watershed_id: Option<String>,
        verbose: bool,
    ) -> Self {
        Self {
            transport,
            base_url,
            kind,
            watershed_id: watershed_id.unwrap_or_default(),
            verbose,
            page: 0,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Number of listing pages requested so far.
    pub fn pages_fetched(&self) -> u32 {
        self.page
    }

    fn fetch_page(&mut self) -> Result<(), WisError> {
        let url = search_url(self.base_url, self.kind, &self.watershed_id, self.page);
        debug!("Fetching {} listing page {}", self.kind, self.page);
        let html = self.transport.get_text(&url)?;
        self.page += 1;

        let listing = parse_listing_page(&html, self.kind, &url)?;
        if listing.end == PageEnd::EndOfCatalog {
            info!("{} listing ended after {} page(s)", self.kind, self.page);
            self.finished = true;
        }
        self.pending.extend(listing.records);
        Ok(())
    }

    fn enrich(&self, record: StationRecord) -> Result<StationRecord, WisError> {
        if !self.verbose {
            return Ok(record);
        }
        let metadata = resolve_metadata(self.transport, self.base_url, &record.station_code)?;
        Ok(record.with_metadata(metadata))
    }
}

impl<T: Transport + ?Sized> Iterator for CatalogScan<'_, T> {
    type Item = Result<StationRecord, WisError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                let enriched = self.enrich(record);
                if enriched.is_err() {
                    self.finished = true;
                    self.pending.clear();
                }
                return Some(enriched);
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fetch::fixtures::FixtureTransport;
    use crate::portal::site_info_url;

    const BASE: &str = "http://portal.test";

    pub(crate) fn station_row(item: &str, watershed: &str, name: &str, id: &str) -> String {
        format!(
            "<tr><td>1</td><td>{item}</td><td>{watershed}</td><td>利根川</td>\
             <td><a href=\"javascript:SiteDetail1('{id}')\">{name}</a></td>\
             <td>群馬県伊勢崎市</td></tr>"
        )
    }

    pub(crate) const END_ROW: &str =
        "<tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>";

    pub(crate) fn listing_page(rows: &[String]) -> String {
        format!(
            "<html><body>\
             <table><tr><td>menu</td></tr></table>\
             <table><tr><td>form</td></tr></table>\
             <table>\
               <tr><th>No</th><th>項目</th><th>水系名</th><th>河川名</th><th>観測所名</th><th>所在地</th></tr>\
               {}\
             </table>\
             </body></html>",
            rows.concat()
        )
    }

    #[test]
    fn test_parse_page_extracts_fixed_cells() {
        let html = listing_page(&[station_row("水位流量", "利根川", "八斗島", "303031283310010")]);
        let page = parse_listing_page(&html, StationKind::WaterLevelFlow, "page0").unwrap();
        assert_eq!(page.end, PageEnd::Continues);
        let record = &page.records[0];
        assert_eq!(record.item_label.as_deref(), Some("水位流量"));
        assert_eq!(record.watershed_name, "利根川");
        assert_eq!(record.river_name, "利根川");
        assert_eq!(record.station_name, "八斗島");
        assert_eq!(record.location, "群馬県伊勢崎市");
        assert_eq!(record.station_code, "303031283310010");
    }

    #[test]
    fn test_dam_rows_have_no_item_label() {
        let html = listing_page(&[station_row("ダム", "利根川", "矢木沢ダム", "1368030375010")]);
        let page = parse_listing_page(&html, StationKind::Dam, "page0").unwrap();
        assert_eq!(page.records[0].item_label, None);
    }

    #[test]
    fn test_terminal_row_is_discarded() {
        let html = listing_page(&[
            station_row("雨量", "利根川", "藤原", "1"),
            END_ROW.to_string(),
            station_row("雨量", "利根川", "never", "2"),
        ]);
        let page = parse_listing_page(&html, StationKind::Rainfall, "page0").unwrap();
        assert_eq!(page.end, PageEnd::EndOfCatalog);
        assert_eq!(page.records.len(), 1);
    }

    #[test]
    fn test_missing_listing_table_is_an_error() {
        let html = "<table><tr><td>only</td></tr></table>";
        let result = parse_listing_page(html, StationKind::Dam, "page0");
        assert!(matches!(
            result,
            Err(CatalogError::MissingTable { index: 2, .. })
        ));
    }

    #[test]
    fn test_row_without_link_is_an_error() {
        let row = "<tr><td>1</td><td>雨量</td><td>利根川</td><td>利根川</td><td>藤原</td><td>群馬県</td></tr>";
        let html = listing_page(&[row.to_string()]);
        let result = parse_listing_page(&html, StationKind::Rainfall, "page0");
        assert!(matches!(
            result,
            Err(CatalogError::MissingStationLink { row: 1, .. })
        ));
    }

    #[test]
    fn test_scan_stops_without_requesting_next_page() {
        let kind = StationKind::WaterLevelFlow;
        let page0 = listing_page(&[
            station_row("水位流量", "利根川", "八斗島", "100"),
            station_row("水位流量", "利根川", "栗橋", "101"),
        ]);
        let page1 = listing_page(&[END_ROW.to_string()]);
        let transport = FixtureTransport::new()
            .page(&search_url(BASE, kind, "", 0), &page0)
            .page(&search_url(BASE, kind, "", 1), &page1);

        let mut scan = CatalogScan::new(&transport, BASE, kind, None, false);
        let codes: Vec<String> = scan
            .by_ref()
            .map(|r| r.unwrap().station_code)
            .collect();

        assert_eq!(codes, ["100", "101"]);
        assert_eq!(scan.pages_fetched(), 2);
        assert_eq!(transport.request_count(&search_url(BASE, kind, "", 2)), 0);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_empty_page_ends_scan() {
        let kind = StationKind::Rainfall;
        let transport = FixtureTransport::new()
            .page(&search_url(BASE, kind, "87", 0), &listing_page(&[]));
        let records: Vec<_> = CatalogScan::new(&transport, BASE, kind, Some("87".into()), false)
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_verbose_scan_enriches_each_record() {
        let kind = StationKind::WaterLevelFlow;
        let page0 = listing_page(&[
            station_row("水位流量", "利根川", "八斗島", "100"),
            END_ROW.to_string(),
        ]);
        let site_info = r#"<table>
            <tr><td>緯度経度</td><td>北緯 36度15分00秒 東経 139度30分36秒</td></tr>
            <tr><td>最新の零点高</td><td>45.370</td></tr>
        </table>"#;
        let transport = FixtureTransport::new()
            .page(&search_url(BASE, kind, "", 0), &page0)
            .page(&site_info_url(BASE, "100"), site_info);

        let records: Vec<_> = CatalogScan::new(&transport, BASE, kind, None, true)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].latitude.unwrap() - 36.25).abs() < 1e-9);
        assert_eq!(records[0].zero_point_elevation.as_deref(), Some("45.370"));
    }

    #[test]
    fn test_fetch_error_ends_scan() {
        let kind = StationKind::Dam;
        let transport = FixtureTransport::new();
        let mut scan = CatalogScan::new(&transport, BASE, kind, None, false);
        assert!(matches!(scan.next(), Some(Err(WisError::Fetch(_)))));
        assert!(scan.next().is_none());
    }
}
