//! Administrative areas for the two-level drill-down.

use geo::{BoundingRect, LineString, MultiLineString, Rect};

/// Outline rings of an area, `x = lng`, `y = lat`.
///
/// Only outer rings are kept; holes are not drawn.
pub type Outline = Vec<LineString<f64>>;

/// Administrative level of an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionLevel {
    /// District (top level, no parent)
    District,
    /// Sub-district, associated to a district by name
    SubDistrict,
}

/// Top-level district
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub outline: Outline,
}

/// Sub-district carrying its parent district's name
#[derive(Debug, Clone, PartialEq)]
pub struct SubRegion {
    pub name: String,
    pub parent_name: String,
    pub outline: Outline,
}

impl Region {
    pub fn new(name: impl Into<String>, outline: Outline) -> Self {
        Self {
            name: name.into(),
            outline,
        }
    }

    /// Get the bounding box of this region
    pub fn bbox(&self) -> Option<Rect<f64>> {
        outline_bbox(&self.outline)
    }
}

impl SubRegion {
    pub fn new(name: impl Into<String>, parent_name: impl Into<String>, outline: Outline) -> Self {
        Self {
            name: name.into(),
            parent_name: parent_name.into(),
            outline,
        }
    }

    pub fn bbox(&self) -> Option<Rect<f64>> {
        outline_bbox(&self.outline)
    }
}

fn outline_bbox(outline: &Outline) -> Option<Rect<f64>> {
    MultiLineString::new(outline.clone()).bounding_rect()
}
