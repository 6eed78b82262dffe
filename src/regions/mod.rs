//! Region datasets and the district → sub-district hierarchy.
//!
//! Top-level regions come from a feature collection; sub-regions come from a
//! topology (or an already converted feature collection) and carry their
//! parent's name. Loading is all-or-nothing: any failure aborts region
//! overlays without affecting the rest of the screen.

mod geojson;
mod hierarchy;
mod source;
mod topology;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::SubRegion;

pub use geojson::parse_regions;
pub use hierarchy::RegionHierarchy;
pub use source::DatasetLocation;
use topology::Topology;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("Failed to read dataset {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch dataset {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("Invalid dataset location: {0}")]
    Location(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Topology object '{0}' not found")]
    MissingObject(String),

    #[error("Topology references missing arc {0}")]
    InvalidArc(i64),
}

/// Where the two region datasets live and how their features are keyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSources {
    /// Feature collection of districts
    pub regions: String,
    /// Topology of sub-districts
    pub sub_regions: String,
    /// Object inside the topology holding the sub-districts
    pub topology_object: String,
    pub region_name_key: String,
    pub sub_region_name_key: String,
    pub parent_name_key: String,
}

impl Default for RegionSources {
    fn default() -> Self {
        Self {
            regions: "seoul.geojson".to_string(),
            sub_regions: "seoul_districts_topo.json".to_string(),
            topology_object: "admdong_seoul_codeEdit_1".to_string(),
            region_name_key: "SIG_KOR_NM".to_string(),
            sub_region_name_key: "DONG_KOR_NM".to_string(),
            parent_name_key: "SIG_KOR_NM".to_string(),
        }
    }
}

/// Parse the sub-region dataset.
///
/// Accepts a topology (decoding `object`) or a plain feature collection.
/// Features missing a name or parent name, or without areal geometry, are
/// skipped.
pub fn parse_sub_regions(bytes: &[u8], sources: &RegionSources) -> Result<Vec<SubRegion>, RegionError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;

    let features = if value.get("type").and_then(|t| t.as_str()) == Some("Topology") {
        let topology: Topology = serde_json::from_value(value)?;
        topology.features(&sources.topology_object)?
    } else {
        serde_json::from_value::<geojson::FeatureCollection>(value)?.features
    };

    let mut sub_regions = Vec::with_capacity(features.len());
    for feature in features {
        let (Some(name), Some(parent)) = (
            feature.property(&sources.sub_region_name_key),
            feature.property(&sources.parent_name_key),
        ) else {
            debug!("Skipping sub-region feature without name or parent");
            continue;
        };

        let outline = feature.outline();
        if outline.is_empty() {
            debug!("Skipping sub-region '{}' without polygon geometry", name);
            continue;
        }

        sub_regions.push(SubRegion::new(name, parent, outline));
    }

    Ok(sub_regions)
}

/// Fetch both datasets concurrently and build the hierarchy.
pub async fn load_hierarchy(
    sources: &RegionSources,
    client: &reqwest::Client,
) -> Result<RegionHierarchy, RegionError> {
    let regions_at = DatasetLocation::parse(&sources.regions)?;
    let sub_regions_at = DatasetLocation::parse(&sources.sub_regions)?;

    info!("Loading regions from {} and {}", regions_at, sub_regions_at);

    let (region_bytes, sub_region_bytes) =
        futures::try_join!(regions_at.read(client), sub_regions_at.read(client))?;

    let regions = parse_regions(&region_bytes, &sources.region_name_key)?;
    let sub_regions = parse_sub_regions(&sub_region_bytes, sources)?;

    Ok(RegionHierarchy::build(regions, sub_regions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sub_regions_from_topology() {
        let data = json!({
            "type": "Topology",
            "arcs": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            "objects": {"admdong_seoul_codeEdit_1": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "arcs": [[0]],
                 "properties": {"DONG_KOR_NM": "Sajik-dong", "SIG_KOR_NM": "Jongno-gu"}},
                {"type": "Polygon", "arcs": [[0]], "properties": {"DONG_KOR_NM": "Lost-dong"}}
            ]}}
        });

        let subs = parse_sub_regions(data.to_string().as_bytes(), &RegionSources::default()).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "Sajik-dong");
        assert_eq!(subs[0].parent_name, "Jongno-gu");
    }

    #[test]
    fn test_parse_sub_regions_from_feature_collection() {
        let data = json!({"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "properties": {"DONG_KOR_NM": "Myeong-dong", "SIG_KOR_NM": "Jung-gu"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                 [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
             ]}}
        ]});

        let subs = parse_sub_regions(data.to_string().as_bytes(), &RegionSources::default()).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].outline.len(), 1);
    }

    #[test]
    fn test_wrong_topology_object() {
        let sources = RegionSources {
            topology_object: "missing".to_string(),
            ..RegionSources::default()
        };
        let data = json!({"type": "Topology", "arcs": [], "objects": {}});
        assert!(matches!(
            parse_sub_regions(data.to_string().as_bytes(), &sources),
            Err(RegionError::MissingObject(_))
        ));
    }
}
