use serde::Serialize;
use std::fmt;

/// A coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Crs(pub u32);

impl Crs {
    /// JGD2011 geographic coordinates, the datum the portal publishes in.
    pub const JGD2011: Crs = Crs(6668);

    /// OGC URN form used in GeoJSON `crs` members.
    pub fn urn(self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.0)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::JGD2011
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}
