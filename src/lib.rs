//! World of Tanks wiki scraper.
//!
//! Reads the game version, the per-country vehicle listings and every
//! vehicle page of the wiki, and flattens each vehicle into one row of a
//! tab-delimited sheet.

pub mod armament;
pub mod config;
pub mod detail;
pub mod dom;
pub mod error;
pub mod index;
pub mod net;
pub mod normalize;
pub mod record;
pub mod report;
pub mod rules;
pub mod scrape;
pub mod version;

pub use config::{Config, Layout, Region, Selection, VehicleClass};
pub use detail::DetailExtractor;
pub use error::{Result, ScraperError};
pub use record::VehicleRecord;
pub use scrape::Scraper;
