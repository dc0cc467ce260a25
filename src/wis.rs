//! The main entry point: a client for the Water Information System portal
//! (水文水質データベース) that lists stations and fetches hourly series.

use crate::catalog::metadata::resolve_metadata;
use crate::catalog::pages::CatalogScan;
use crate::catalog::watersheds::fetch_watersheds;
use crate::config::WisConfig;
use crate::error::WisError;
use crate::fetch::http::HttpTransport;
use crate::fetch::Transport;
use crate::series::dam::fetch_dam_table;
use crate::series::non_numeric;
use crate::series::station::fetch_station_table;
use crate::types::crs::Crs;
use crate::types::kind::{Quantity, StationKind};
use crate::types::series::{DamSeries, StationSeries};
use crate::types::station::{StationCatalog, StationMetadata, WatershedRecord};
use bon::bon;
use chrono::NaiveDate;
use log::warn;

/// Client for the portal.
///
/// Every operation is a blocking, single-shot retrieval: nothing is cached
/// between calls, and each call returns a self-contained result.
///
/// Create one with [`Wis::new()`] for the public portal,
/// [`Wis::with_config()`] to adjust the HTTP settings, or
/// [`Wis::with_transport()`] to serve pages from any [`Transport`].
///
/// # Examples
///
/// ```no_run
/// # use wis_scraper::{Wis, WisError, StationKind};
/// # fn main() -> Result<(), WisError> {
/// let wis = Wis::new()?;
/// let watersheds = wis.list_watersheds()?;
/// let tone = watersheds.iter().find(|w| w.name == "利根川").unwrap();
///
/// let gauges = wis
///     .list_stations()
///     .kind(StationKind::WaterLevelFlow)
///     .watershed_id(tone.id.clone())
///     .call()?;
/// println!("{} gauges on the Tone", gauges.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Wis<T: Transport = HttpTransport> {
    transport: T,
    config: WisConfig,
}

impl Wis<HttpTransport> {
    /// Creates a client for the public portal with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Fetch`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, WisError> {
        Self::with_config(WisConfig::default())
    }

    /// Creates a client using `config` for the base URL, user agent, timeout,
    /// fallback charset and frame retry bound.
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Fetch`] if the HTTP client cannot be built.
    pub fn with_config(config: WisConfig) -> Result<Self, WisError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

#[bon]
impl<T: Transport> Wis<T> {
    /// Creates a client that fetches every page through `transport`. Only the
    /// base URL and frame retry bound of `config` are used.
    pub fn with_transport(transport: T, config: WisConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &WisConfig {
        &self.config
    }

    /// Lists every watershed (水系) offered by the site search form, in the
    /// form's order. The ids feed [`Wis::list_stations`].
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Fetch`] on network failures and
    /// [`WisError::Catalog`] if the form has no watershed selector.
    pub fn list_watersheds(&self) -> Result<Vec<WatershedRecord>, WisError> {
        fetch_watersheds(&self.transport, &self.config.base_url)
    }

    /// Resolves a station's location and zero-point elevation from its detail
    /// page. Rows missing from the page leave their fields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Fetch`] if the detail page cannot be fetched.
    pub fn station_metadata(&self, station_id: &str) -> Result<StationMetadata, WisError> {
        resolve_metadata(&self.transport, &self.config.base_url, station_id)
    }

    /// Lazily walks the site search listing for `kind`, yielding one record
    /// per station in listing order. Pages are requested as the iterator is
    /// advanced.
    ///
    /// # Arguments
    ///
    /// * `.kind(StationKind)`: **Required.** The category to search.
    /// * `.watershed_id(String)`: Optional. Restricts the search to one watershed.
    /// * `.verbose(bool)`: Optional. Enriches each record from its detail page,
    ///   one extra request per station. Defaults to `false`.
    #[builder]
    pub fn scan_stations(
        &self,
        kind: StationKind,
        #[builder(into)] watershed_id: Option<String>,
        #[builder(default)] verbose: bool,
    ) -> CatalogScan<'_, T> {
        CatalogScan::new(
            &self.transport,
            &self.config.base_url,
            kind,
            watershed_id,
            verbose,
        )
    }

    /// Lists every station of `kind`, optionally within one watershed.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.kind(StationKind)`: **Required.** Water level/flow gauges, rain gauges or dams.
    /// * `.watershed_id(String)`: Optional. A [`WatershedRecord::id`]; all watersheds when unset.
    /// * `.verbose(bool)`: Optional. Adds coordinates (and, for water level
    ///   gauges, the zero-point elevation) from each station's detail page.
    ///   Defaults to `false`.
    /// * `.geospatial(bool)`: Optional. Tags the catalog with `crs` for
    ///   [`StationCatalog::to_geojson`]. Requires `verbose`; without it a
    ///   warning is logged and the plain catalog is returned. Defaults to `false`.
    /// * `.crs(Crs)`: Optional. Defaults to [`Crs::JGD2011`].
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Fetch`] on network failures and
    /// [`WisError::Catalog`] if a listing page does not have the expected layout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use wis_scraper::{Wis, WisError, StationKind};
    /// # fn main() -> Result<(), WisError> {
    /// let wis = Wis::new()?;
    /// let rain_gauges = wis
    ///     .list_stations()
    ///     .kind(StationKind::Rainfall)
    ///     .watershed_id("87")
    ///     .verbose(true)
    ///     .geospatial(true)
    ///     .call()?;
    /// let geojson = rain_gauges.to_geojson().unwrap();
    /// println!("{}", geojson);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn list_stations(
        &self,
        kind: StationKind,
        #[builder(into)] watershed_id: Option<String>,
        #[builder(default)] verbose: bool,
        #[builder(default)] geospatial: bool,
        crs: Option<Crs>,
    ) -> Result<StationCatalog, WisError> {
        let stations = self
            .scan_stations()
            .kind(kind)
            .maybe_watershed_id(watershed_id)
            .verbose(verbose)
            .call()
            .collect::<Result<Vec<_>, _>>()?;

        let crs = match (geospatial, verbose) {
            (true, true) => Some(crs.unwrap_or_default()),
            (true, false) => {
                warn!("Geospatial output needs verbose=true; returning the plain catalog");
                None
            }
            (false, _) => None,
        };
        Ok(StationCatalog {
            kind,
            verbose,
            crs,
            stations,
        })
    }

    /// Lists every dam. Shorthand for [`Wis::list_stations`] with
    /// [`StationKind::Dam`] and no watershed filter.
    ///
    /// # Arguments
    ///
    /// * `.verbose(bool)`: Optional. Adds coordinates from each dam's detail page.
    /// * `.geospatial(bool)`: Optional. See [`Wis::list_stations`].
    /// * `.crs(Crs)`: Optional. Defaults to [`Crs::JGD2011`].
    #[builder]
    pub fn list_dams(
        &self,
        #[builder(default)] verbose: bool,
        #[builder(default)] geospatial: bool,
        crs: Option<Crs>,
    ) -> Result<StationCatalog, WisError> {
        self.list_stations()
            .kind(StationKind::Dam)
            .verbose(verbose)
            .geospatial(geospatial)
            .maybe_crs(crs)
            .call()
    }

    /// Fetches the hourly series of one quantity at a station.
    ///
    /// The portal serves a station's data one month at a time, so every month
    /// from `start` through `end` is requested and the pages are stitched
    /// into one table. The returned index is hourly and spans
    /// `start 01:00` through `end 00:00`; the portal writes the last reading
    /// of each day as that day's 24:00.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.station_id(String)`: **Required.** A [`crate::StationRecord::station_code`].
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** Inclusive dates.
    /// * `.quantity(Quantity)`: **Required.** Water level, flow or rainfall.
    /// * `.verbose(bool)`: Optional. Attaches the station's [`StationMetadata`].
    /// * `.sentinel(String)`: Optional. Replaces every non-numeric cell
    ///   (placeholders such as `欠測`) with this text.
    /// * `.report_non_numeric(bool)`: Optional. Returns the distinct
    ///   non-numeric cells found in [`StationSeries::non_numeric_values`].
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Series`] for a reversed date range or a month page
    /// without a table, and [`WisError::Fetch`] on network failures.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use wis_scraper::{Wis, WisError, Quantity};
    /// # use chrono::NaiveDate;
    /// # fn main() -> Result<(), WisError> {
    /// let wis = Wis::new()?;
    /// let series = wis
    ///     .station_series()
    ///     .station_id("303031283310010")
    ///     .start(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap())
    ///     .quantity(Quantity::Flow)
    ///     .sentinel("NaN")
    ///     .call()?;
    /// let df = series.table.to_float_dataframe()?;
    /// println!("{}", df);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn station_series(
        &self,
        #[builder(into)] station_id: String,
        start: NaiveDate,
        end: NaiveDate,
        quantity: Quantity,
        #[builder(default)] verbose: bool,
        #[builder(into)] sentinel: Option<String>,
        #[builder(default)] report_non_numeric: bool,
    ) -> Result<StationSeries, WisError> {
        let table = fetch_station_table(
            &self.transport,
            &self.config.base_url,
            &station_id,
            quantity,
            start,
            end,
        )?;
        let (table, non_numeric_values) =
            non_numeric::apply(table, sentinel.as_deref(), report_non_numeric);
        let metadata = verbose
            .then(|| self.station_metadata(&station_id))
            .transpose()?;

        Ok(StationSeries {
            station_id,
            quantity,
            table,
            non_numeric_values,
            metadata,
        })
    }

    /// Fetches the hourly dam table: basin rainfall, storage, inflow, outflow
    /// and storage ratio.
    ///
    /// Each month's data frame is retried up to
    /// [`WisConfig::max_frame_attempts`] times; a month that never loads is
    /// logged and left out. [`DamSeries::table`] is `None` when no month of
    /// the range has data.
    ///
    /// # Arguments
    ///
    /// * `.dam_id(String)`: **Required.** A dam's [`crate::StationRecord::station_code`].
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** Inclusive dates.
    /// * `.verbose(bool)`, `.sentinel(String)`, `.report_non_numeric(bool)`:
    ///   Optional, as for [`Wis::station_series`].
    ///
    /// # Errors
    ///
    /// Returns [`WisError::Series`] for a reversed date range, a month page
    /// without a data frame or an unreadable time cell, and
    /// [`WisError::Fetch`] on non-retryable network failures.
    #[builder]
    pub fn dam_series(
        &self,
        #[builder(into)] dam_id: String,
        start: NaiveDate,
        end: NaiveDate,
        #[builder(default)] verbose: bool,
        #[builder(into)] sentinel: Option<String>,
        #[builder(default)] report_non_numeric: bool,
    ) -> Result<DamSeries, WisError> {
        let table = fetch_dam_table(
            &self.transport,
            &self.config.base_url,
            &dam_id,
            start,
            end,
            self.config.max_frame_attempts,
        )?;
        let (table, non_numeric_values) = match table {
            Some(table) => {
                let (table, found) =
                    non_numeric::apply(table, sentinel.as_deref(), report_non_numeric);
                (Some(table), found)
            }
            None => (None, None),
        };
        let metadata = verbose
            .then(|| self.station_metadata(&dam_id))
            .transpose()?;

        Ok(DamSeries {
            dam_id,
            table,
            non_numeric_values,
            metadata,
        })
    }
}
