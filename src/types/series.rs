//! Time-series results.
//!
//! Cells are kept as the portal's text so that placeholder literals survive
//! until the caller decides how to treat them; numeric conversion is the
//! separate [`SeriesTable::to_float_dataframe`] step.

use crate::types::kind::{DamVariable, Quantity};
use crate::types::station::StationMetadata;
use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;
use std::collections::BTreeSet;

/// A named column of cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesColumn {
    pub name: String,
    pub values: Vec<String>,
}

impl SeriesColumn {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Columns of cell text sharing one timestamp index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeriesTable {
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<SeriesColumn>,
}

impl SeriesTable {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&SeriesColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    /// Whether the index is strictly increasing in steps of exactly one hour.
    pub fn is_regular_hourly(&self) -> bool {
        self.index
            .windows(2)
            .all(|pair| pair[1] - pair[0] == Duration::hours(1))
    }

    /// Keeps the rows whose timestamp lies in `[start, end]`, preserving order.
    pub(crate) fn retain_window(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        let keep: Vec<bool> = self
            .index
            .iter()
            .map(|t| *t >= start && *t <= end)
            .collect();

        let mut flags = keep.iter();
        self.index.retain(|_| *flags.next().unwrap_or(&false));
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }

    /// Applies `f` to every cell of every column.
    pub(crate) fn map_cells(&mut self, mut f: impl FnMut(&mut String)) {
        for column in &mut self.columns {
            column.values.iter_mut().for_each(&mut f);
        }
    }

    /// A copy with each column renamed by `label`; columns it returns
    /// `None` for keep their name.
    fn relabelled(&self, label: impl Fn(&str) -> Option<&'static str>) -> SeriesTable {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name = label(&c.name).map_or_else(|| c.name.clone(), String::from);
                SeriesColumn::new(name, c.values.clone())
            })
            .collect();
        SeriesTable {
            index: self.index.clone(),
            columns,
        }
    }

    /// A `datetime` column followed by one string column per series column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![Column::new("datetime".into(), &self.index)];
        columns.extend(
            self.columns
                .iter()
                .map(|c| Column::new(c.name.as_str().into(), &c.values)),
        );
        DataFrame::new(columns)
    }

    /// Like [`SeriesTable::to_dataframe`] with every value column cast to
    /// `Float64`; cells that are not numbers become null.
    pub fn to_float_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![Column::new("datetime".into(), &self.index)];
        for c in &self.columns {
            let series = Series::new(c.name.as_str().into(), &c.values).cast(&DataType::Float64)?;
            columns.push(Column::from(series));
        }
        DataFrame::new(columns)
    }
}

/// Result of [`crate::Wis::station_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    pub station_id: String,
    pub quantity: Quantity,
    /// Hourly table with a single column named after the quantity.
    pub table: SeriesTable,
    /// Distinct non-numeric literals found, when reporting was requested.
    pub non_numeric_values: Option<BTreeSet<String>>,
    /// Detail page metadata, when verbose output was requested.
    pub metadata: Option<StationMetadata>,
}

impl StationSeries {
    /// [`SeriesTable::to_dataframe`] with the value column headed by the
    /// portal's name for the quantity, e.g. `水位`.
    pub fn to_portal_dataframe(&self) -> PolarsResult<DataFrame> {
        self.table
            .relabelled(|_| Some(self.quantity.label()))
            .to_dataframe()
    }
}

/// Result of [`crate::Wis::dam_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct DamSeries {
    pub dam_id: String,
    /// `None` when no month of the range produced a data table.
    pub table: Option<SeriesTable>,
    pub non_numeric_values: Option<BTreeSet<String>>,
    pub metadata: Option<StationMetadata>,
}

impl DamSeries {
    /// The table as text columns headed the way the portal heads them,
    /// units included (`流入量[m3/s]`). `None` when there is no table.
    pub fn to_portal_dataframe(&self) -> PolarsResult<Option<DataFrame>> {
        self.table
            .as_ref()
            .map(|table| {
                table
                    .relabelled(|name| {
                        DamVariable::ALL
                            .iter()
                            .find(|v| v.column_name() == name)
                            .map(|v| v.label())
                    })
                    .to_dataframe()
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn table() -> SeriesTable {
        SeriesTable {
            index: (1..=5).map(|h| at(1, h)).collect(),
            columns: vec![SeriesColumn::new(
                "flow",
                vec!["1.0", "2.0", "欠測", "4.0", "5.0"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            )],
        }
    }

    #[test]
    fn test_retain_window_is_inclusive() {
        let mut t = table();
        t.retain_window(at(1, 2), at(1, 4));
        assert_eq!(t.index, vec![at(1, 2), at(1, 3), at(1, 4)]);
        assert_eq!(t.columns[0].values, vec!["2.0", "欠測", "4.0"]);
    }

    #[test]
    fn test_is_regular_hourly() {
        let mut t = table();
        assert!(t.is_regular_hourly());
        t.index[4] = at(1, 7);
        assert!(!t.is_regular_hourly());
    }

    #[test]
    fn test_to_dataframe_keeps_text() {
        let df = table().to_dataframe().unwrap();
        assert_eq!(df.shape(), (5, 2));
        let flow = df.column("flow").unwrap().str().unwrap();
        assert_eq!(flow.get(2), Some("欠測"));
    }

    #[test]
    fn test_station_portal_headings() {
        let series = StationSeries {
            station_id: "42".into(),
            quantity: Quantity::Flow,
            table: table(),
            non_numeric_values: None,
            metadata: None,
        };
        let df = series.to_portal_dataframe().unwrap();
        let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["datetime", "流量"]);
        // The table itself keeps its column names
        assert!(series.table.column("flow").is_some());
    }

    #[test]
    fn test_dam_portal_headings() {
        let values = |v: &str| vec![v.to_string(); 2];
        let dam = DamSeries {
            dam_id: "9".into(),
            table: Some(SeriesTable {
                index: vec![at(1, 1), at(1, 2)],
                columns: DamVariable::ALL
                    .iter()
                    .map(|v| SeriesColumn::new(v.column_name(), values("1.0")))
                    .collect(),
            }),
            non_numeric_values: None,
            metadata: None,
        };
        let df = dam.to_portal_dataframe().unwrap().unwrap();
        let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "datetime",
                "流域平均雨量[mm/h]",
                "貯水量[×10^3 m3]",
                "流入量[m3/s]",
                "放流量[m3/s]",
                "貯水率[%]"
            ]
        );

        let empty = DamSeries { table: None, ..dam };
        assert!(empty.to_portal_dataframe().unwrap().is_none());
    }

    #[test]
    fn test_to_float_dataframe_nulls_non_numeric() {
        let df = table().to_float_dataframe().unwrap();
        let flow = df.column("flow").unwrap().f64().unwrap();
        assert_eq!(flow.get(0), Some(1.0));
        assert_eq!(flow.get(2), None);
        assert_eq!(flow.null_count(), 1);
    }
}
