//! Marker placement for candidate places.
//!
//! Resolves a display coordinate for every place (direct coordinate, else one
//! geocoding lookup), draws the markers, and fits the camera to their bounds.

mod bounds;
mod pipeline;

pub use bounds::GeoBounds;
pub use pipeline::{MarkerPipeline, PlacementReport};
