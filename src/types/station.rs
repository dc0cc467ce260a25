//! Records produced by the catalog operations and the station metadata
//! resolver.

use crate::types::crs::Crs;
use crate::types::kind::StationKind;
use geo::Point;
use polars::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};

/// A watershed (水系) as listed in the search form's selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatershedRecord {
    pub name: String,
    /// Identifier accepted by the `SUIKEI` search filter.
    pub id: String,
}

/// Details resolved from a station's detail page.
///
/// Every field is optional: detail page layouts differ by station kind, and
/// missing rows are a normal outcome rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationMetadata {
    /// Decimal degrees east.
    pub longitude: Option<f64>,
    /// Decimal degrees north.
    pub latitude: Option<f64>,
    /// Most recent zero-point elevation (最新の零点高), verbatim.
    pub zero_point_elevation: Option<String>,
}

impl StationMetadata {
    /// The station location, or `None` when either coordinate is missing.
    pub fn point(&self) -> Option<Point<f64>> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}

/// One station row of the site search listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    /// Category the listing was searched for.
    pub kind: StationKind,
    /// The listing's observed-item cell (観測項目). Dam listings omit it.
    pub item_label: Option<String>,
    pub watershed_name: String,
    pub river_name: String,
    pub station_name: String,
    /// Address text (所在地).
    pub location: String,
    /// Opaque station identifier (観測所記号), used by every other endpoint.
    pub station_code: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub zero_point_elevation: Option<String>,
}

impl StationRecord {
    /// Copies resolved metadata onto the record.
    pub(crate) fn with_metadata(mut self, metadata: StationMetadata) -> Self {
        self.longitude = metadata.longitude;
        self.latitude = metadata.latitude;
        if self.kind.has_zero_point() {
            self.zero_point_elevation = metadata.zero_point_elevation;
        }
        self
    }

    pub fn point(&self) -> Option<Point<f64>> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}

/// Result of [`crate::Wis::list_stations`] and [`crate::Wis::list_dams`].
///
/// `crs` is set when geospatial output was requested; [`StationCatalog::points`]
/// and [`StationCatalog::to_geojson`] are meaningful in either case.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCatalog {
    pub kind: StationKind,
    /// Whether each record was enriched from its detail page.
    pub verbose: bool,
    pub crs: Option<Crs>,
    pub stations: Vec<StationRecord>,
}

impl StationCatalog {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// One geometry per station, `None` standing in for an empty point.
    pub fn points(&self) -> Vec<Option<Point<f64>>> {
        self.stations.iter().map(StationRecord::point).collect()
    }

    /// Tabular view of the catalog.
    ///
    /// Coordinate columns are present only for verbose catalogs, and the
    /// zero-point column only for verbose water level/flow catalogs.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::new();
        if self.kind != StationKind::Dam {
            let items: Vec<Option<&str>> = self
                .stations
                .iter()
                .map(|s| s.item_label.as_deref())
                .collect();
            columns.push(Column::new("item".into(), items));
        }
        columns.push(text_column("watershed", &self.stations, |s| s.watershed_name.as_str()));
        columns.push(text_column("river", &self.stations, |s| s.river_name.as_str()));
        columns.push(text_column("station", &self.stations, |s| s.station_name.as_str()));
        columns.push(text_column("location", &self.stations, |s| s.location.as_str()));
        columns.push(text_column("station_code", &self.stations, |s| s.station_code.as_str()));

        if self.verbose {
            let lon: Vec<Option<f64>> = self.stations.iter().map(|s| s.longitude).collect();
            let lat: Vec<Option<f64>> = self.stations.iter().map(|s| s.latitude).collect();
            columns.push(Column::new("lon".into(), lon));
            columns.push(Column::new("lat".into(), lat));
            if self.kind.has_zero_point() {
                let zero: Vec<Option<&str>> = self
                    .stations
                    .iter()
                    .map(|s| s.zero_point_elevation.as_deref())
                    .collect();
                columns.push(Column::new("zero_point_elevation".into(), zero));
            }
        }

        DataFrame::new(columns)
    }

    /// GeoJSON `FeatureCollection` of the catalog. Stations without
    /// coordinates get a `null` geometry. The named CRS member is written
    /// when the catalog carries a CRS.
    pub fn to_geojson(&self) -> Result<Value, serde_json::Error> {
        let features = self
            .stations
            .iter()
            .map(|station| {
                let geometry = match station.point() {
                    Some(p) => json!({ "type": "Point", "coordinates": [p.x(), p.y()] }),
                    None => Value::Null,
                };
                Ok(json!({
                    "type": "Feature",
                    "geometry": geometry,
                    "properties": serde_json::to_value(station)?,
                }))
            })
            .collect::<Result<Vec<Value>, serde_json::Error>>()?;

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let (Some(crs), Some(object)) = (self.crs, collection.as_object_mut()) {
            object.insert(
                "crs".to_string(),
                json!({ "type": "name", "properties": { "name": crs.urn() } }),
            );
        }
        Ok(collection)
    }
}

fn text_column(name: &str, stations: &[StationRecord], field: fn(&StationRecord) -> &str) -> Column {
    let values: Vec<&str> = stations.iter().map(field).collect();
    Column::new(name.into(), values)
}
