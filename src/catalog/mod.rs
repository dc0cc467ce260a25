//! Station discovery: the watershed selector, the paginated site search and
//! the per-station detail pages.

pub mod coordinates;
pub mod error;
pub mod metadata;
pub mod pages;
pub mod watersheds;
