//! Districtmap - nearby place recommendations and district drill-down maps
//!
//! This library provides the ranking engine, region hierarchy, drill-down
//! controller and marker pipeline shared by the `nearby` and `serve` binaries.

pub mod catalog;
pub mod config;
pub mod drilldown;
pub mod geocode;
pub mod markers;
pub mod models;
pub mod ranking;
pub mod regions;
pub mod screen;
pub mod view;

pub use config::Config;
pub use models::{Coordinate, Place, RankedEntry};
pub use screen::MapScreen;
