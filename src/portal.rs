//! Endpoint names and URL construction for the portal's CGI programs.

use crate::types::kind::{Quantity, StationKind};
use crate::types::month::Month;

const SEARCH_PROGRAM: &str = "SrchSite.exe";
const SITE_INFO_PROGRAM: &str = "SiteInfo.exe";
const DAM_DATA_PROGRAM: &str = "DspDamData.exe";

// The station endpoints serve from BGNDATE up to their own maximum, so the end
// bound is left open.
const OPEN_END_DATE: &str = "21001231";

fn cgi(base_url: &str, program: &str) -> String {
    format!("{}/cgi-bin/{}", base_url.trim_end_matches('/'), program)
}

/// One page of the site search listing. Page numbers start at 0.
pub(crate) fn search_url(
    base_url: &str,
    kind: StationKind,
    watershed_id: &str,
    page: u32,
) -> String {
    format!(
        "{}?KOMOKU={}&NAME=&SUIKEI={}&KASEN=&KEN=-1&CITY=&PAGE={}",
        cgi(base_url, SEARCH_PROGRAM),
        kind.code(),
        watershed_id,
        page
    )
}

/// Detail page of a single station or dam.
pub(crate) fn site_info_url(base_url: &str, station_id: &str) -> String {
    format!("{}?ID={}", cgi(base_url, SITE_INFO_PROGRAM), station_id)
}

/// Hourly table for a station, anchored at the first day of `month`.
pub(crate) fn station_data_url(
    base_url: &str,
    quantity: Quantity,
    station_id: &str,
    month: Month,
) -> String {
    format!(
        "{}?KIND={}&ID={}&BGNDATE={}&ENDDATE={}&KAWABOU=NO",
        cgi(base_url, quantity.program()),
        quantity.code(),
        station_id,
        month.first_day().format("%Y%m%d"),
        OPEN_END_DATE
    )
}

/// Dam page for one month; the data itself sits behind an iframe on it.
pub(crate) fn dam_data_url(base_url: &str, dam_id: &str, month: Month) -> String {
    format!(
        "{}?KIND=1&ID={}&BGNDATE={}&ENDDATE={}&KAWABOU=NO",
        cgi(base_url, DAM_DATA_PROGRAM),
        dam_id,
        month.first_day().format("%Y%m%d"),
        month.last_day().format("%Y%m%d")
    )
}
