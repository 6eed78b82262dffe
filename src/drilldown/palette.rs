use serde::{Deserialize, Serialize};

use crate::models::RegionLevel;
use crate::view::OverlayStyle;

const STROKE_COLOR: &str = "#26667F";
const HOVER_FILL: &str = "#7dd3a3";

fn style(fill_color: &str, fill_opacity: f32) -> OverlayStyle {
    OverlayStyle {
        fill_color: fill_color.to_string(),
        fill_opacity,
        stroke_color: STROKE_COLOR.to_string(),
        stroke_opacity: 0.8,
        stroke_weight: 2,
    }
}

/// Base and hover styles per level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayPalette {
    pub region: OverlayStyle,
    pub region_hover: OverlayStyle,
    pub sub_region: OverlayStyle,
    pub sub_region_hover: OverlayStyle,
}

impl Default for OverlayPalette {
    fn default() -> Self {
        Self {
            region: style("#DDF4E7", 0.7),
            region_hover: style(HOVER_FILL, 0.7),
            sub_region: style("#67C090", 0.08),
            sub_region_hover: style(HOVER_FILL, 0.2),
        }
    }
}

impl OverlayPalette {
    pub fn base(&self, level: RegionLevel) -> &OverlayStyle {
        match level {
            RegionLevel::District => &self.region,
            RegionLevel::SubDistrict => &self.sub_region,
        }
    }

    pub fn hover(&self, level: RegionLevel) -> &OverlayStyle {
        match level {
            RegionLevel::District => &self.region_hover,
            RegionLevel::SubDistrict => &self.sub_region_hover,
        }
    }
}
