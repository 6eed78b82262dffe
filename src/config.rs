use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::drilldown::{default_anchors, Anchor, OverlayPalette};
use crate::geocode::GeocoderConfig;
use crate::models::Coordinate;
use crate::ranking::RankingConfig;
use crate::regions::RegionSources;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub ranking: RankingConfig,
    pub regions: RegionSources,
    pub anchors: Anchors,
    pub markers: MarkerConfig,
    pub geocoder: GeocoderConfig,
    pub palette: OverlayPalette,
}

/// Camera defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Overview center, also the user position when none is known
    pub default_center: Coordinate,
    pub overview_zoom: u8,
    pub district_zoom: u8,
    pub user_zoom: u8,
    pub anchor_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinate::new(37.5665, 126.9780),
            overview_zoom: 9,
            district_zoom: 7,
            user_zoom: 3,
            anchor_zoom: 6,
        }
    }
}

/// `[[anchors]]` entries; the popular areas when none are configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Anchors(pub Vec<Anchor>);

impl Default for Anchors {
    fn default() -> Self {
        Self(default_anchors())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Place a marker at the default center when no place resolves
    pub fallback_marker: bool,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
