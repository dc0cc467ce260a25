pub mod crs;
pub mod kind;
pub mod month;
pub mod series;
pub mod station;
