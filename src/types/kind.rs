//! Closed enumerations for the portal's station categories, measured
//! quantities and dam variables, with their portal codes.

use crate::error::WisError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Station category used to filter the site search (`KOMOKU` code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StationKind {
    /// Water level and flow gauges (水位流量).
    WaterLevelFlow,
    /// Rain gauges (雨量).
    Rainfall,
    /// Dams (ダム).
    Dam,
}

impl StationKind {
    /// The portal's `KOMOKU` code.
    pub fn code(&self) -> &'static str {
        match self {
            StationKind::WaterLevelFlow => "02",
            StationKind::Rainfall => "01",
            StationKind::Dam => "05",
        }
    }

    /// The display name the portal uses.
    pub fn label(&self) -> &'static str {
        match self {
            StationKind::WaterLevelFlow => "水位流量",
            StationKind::Rainfall => "雨量",
            StationKind::Dam => "ダム",
        }
    }

    /// Only water level gauges publish a zero-point elevation.
    pub(crate) fn has_zero_point(&self) -> bool {
        matches!(self, StationKind::WaterLevelFlow)
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parses the portal's Japanese display names or English aliases.
///
/// # Examples
///
/// ```
/// use wis_scraper::StationKind;
///
/// assert_eq!("雨量".parse::<StationKind>().unwrap(), StationKind::Rainfall);
/// assert_eq!("dam".parse::<StationKind>().unwrap(), StationKind::Dam);
/// assert!("snow".parse::<StationKind>().is_err());
/// ```
impl FromStr for StationKind {
    type Err = WisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "水位流量" | "water_level_flow" | "02" => Ok(StationKind::WaterLevelFlow),
            "雨量" | "rainfall" | "01" => Ok(StationKind::Rainfall),
            "ダム" | "dam" | "05" => Ok(StationKind::Dam),
            other => Err(WisError::UnknownKind(other.to_string())),
        }
    }
}

/// Hourly quantity served for a gauging station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantity {
    /// Water level (水位).
    WaterLevel,
    /// Flow rate (流量).
    Flow,
    /// Rainfall (雨量).
    Rainfall,
}

impl Quantity {
    /// CGI program serving the hourly table.
    pub(crate) fn program(&self) -> &'static str {
        match self {
            Quantity::WaterLevel | Quantity::Flow => "DspWaterData.exe",
            Quantity::Rainfall => "DspRainData.exe",
        }
    }

    /// The program's `KIND` code.
    pub(crate) fn code(&self) -> u8 {
        match self {
            Quantity::WaterLevel => 2,
            Quantity::Flow => 6,
            Quantity::Rainfall => 2,
        }
    }

    /// Column name used in series tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            Quantity::WaterLevel => "water_level",
            Quantity::Flow => "flow",
            Quantity::Rainfall => "rainfall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quantity::WaterLevel => "水位",
            Quantity::Flow => "流量",
            Quantity::Rainfall => "雨量",
        }
    }

    /// The water level table ends with a summary row that is not an hourly reading.
    pub(crate) fn has_trailer_row(&self) -> bool {
        matches!(self, Quantity::WaterLevel)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for Quantity {
    type Err = WisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "水位" | "water_level" => Ok(Quantity::WaterLevel),
            "流量" | "flow" => Ok(Quantity::Flow),
            "雨量" | "rainfall" => Ok(Quantity::Rainfall),
            other => Err(WisError::UnknownKind(other.to_string())),
        }
    }
}

/// The five hourly columns of a dam table, in portal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DamVariable {
    /// Basin-average rainfall.
    Rainfall,
    /// Reservoir storage volume.
    Storage,
    Inflow,
    Outflow,
    /// Storage as a percentage of capacity.
    StorageRatio,
}

impl DamVariable {
    pub const ALL: [DamVariable; 5] = [
        DamVariable::Rainfall,
        DamVariable::Storage,
        DamVariable::Inflow,
        DamVariable::Outflow,
        DamVariable::StorageRatio,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            DamVariable::Rainfall => "rainfall",
            DamVariable::Storage => "storage",
            DamVariable::Inflow => "inflow",
            DamVariable::Outflow => "outflow",
            DamVariable::StorageRatio => "storage_ratio",
        }
    }

    /// The portal's column heading, including the unit.
    pub fn label(&self) -> &'static str {
        match self {
            DamVariable::Rainfall => "流域平均雨量[mm/h]",
            DamVariable::Storage => "貯水量[×10^3 m3]",
            DamVariable::Inflow => "流入量[m3/s]",
            DamVariable::Outflow => "放流量[m3/s]",
            DamVariable::StorageRatio => "貯水率[%]",
        }
    }
}

impl fmt::Display for DamVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_kind_codes() {
        assert_eq!(StationKind::WaterLevelFlow.code(), "02");
        assert_eq!(StationKind::Rainfall.code(), "01");
        assert_eq!(StationKind::Dam.code(), "05");
    }

    #[test]
    fn test_station_kind_from_label_round_trips() {
        for kind in [StationKind::WaterLevelFlow, StationKind::Rainfall, StationKind::Dam] {
            assert_eq!(kind.label().parse::<StationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_an_error_value() {
        match "雪".parse::<StationKind>() {
            Err(WisError::UnknownKind(name)) => assert_eq!(name, "雪"),
            other => panic!("Expected UnknownKind, got {:?}", other),
        }
        assert!(matches!("水位流量".parse::<Quantity>(), Err(WisError::UnknownKind(_))));
    }

    #[test]
    fn test_quantity_programs() {
        assert_eq!(Quantity::WaterLevel.program(), "DspWaterData.exe");
        assert_eq!(Quantity::Flow.program(), "DspWaterData.exe");
        assert_eq!(Quantity::Rainfall.program(), "DspRainData.exe");
        assert_eq!(Quantity::Flow.code(), 6);
        assert!(Quantity::WaterLevel.has_trailer_row());
        assert!(!Quantity::Flow.has_trailer_row());
    }

    #[test]
    fn test_dam_variable_order() {
        let names: Vec<_> = DamVariable::ALL.iter().map(|v| v.column_name()).collect();
        assert_eq!(names, ["rainfall", "storage", "inflow", "outflow", "storage_ratio"]);
    }
}
