//! Core data models for recommendations and region navigation.

pub mod place;
pub mod region;

pub use place::{Coordinate, Place, RankedEntry, ScoredPlace};
pub use region::{Outline, Region, RegionLevel, SubRegion};
