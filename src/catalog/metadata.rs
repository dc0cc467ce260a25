use crate::catalog::coordinates::parse_coordinates;
use crate::error::WisError;
use crate::fetch::Transport;
use crate::html::read_tables;
use crate::portal::site_info_url;
use crate::types::station::StationMetadata;
use log::debug;

const COORDINATES_LABEL: &str = "緯度経度";
const ZERO_POINT_LABEL: &str = "最新の零点高";

/// Fetches a station's detail page and reads its location and zero point.
pub(crate) fn resolve_metadata<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    station_id: &str,
) -> Result<StationMetadata, WisError> {
    let url = site_info_url(base_url, station_id);
    debug!("Resolving metadata for station {}", station_id);
    let html = transport.get_text(&url)?;
    Ok(parse_site_info(&html))
}

/// Reads the first table of a detail page. Rows that are absent leave their
/// fields empty.
pub(crate) fn parse_site_info(html: &str) -> StationMetadata {
    let tables = read_tables(html);
    let Some(table) = tables.first() else {
        debug!("Detail page has no table");
        return StationMetadata::default();
    };

    let coordinates = table.labelled_value(COORDINATES_LABEL).and_then(parse_coordinates);
    if coordinates.is_none() {
        debug!("Detail page carries no usable coordinates");
    }
    StationMetadata {
        longitude: coordinates.map(|(lon, _)| lon),
        latitude: coordinates.map(|(_, lat)| lat),
        zero_point_elevation: table.labelled_value(ZERO_POINT_LABEL).map(str::to_string),
    }
}
