//! Feature collection parsing shared by both region datasets.

use geo::{Coord, LineString};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::RegionError;
use crate::models::{Outline, Region};

/// Feature geometry. Only areal types produce outlines.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Outer ring of each polygon; holes are dropped.
    pub(crate) fn outer_rings(&self) -> Outline {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().and_then(|r| ring(r)).into_iter().collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first())
                .filter_map(|r| ring(r))
                .collect(),
            Geometry::Unsupported => Vec::new(),
        }
    }
}

/// Convert `[lng, lat, ...]` positions into a ring, skipping short positions.
fn ring(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect();

    if coords.len() < 3 {
        return None;
    }

    Some(LineString::new(coords))
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// String-valued property; numbers are rendered, anything else is absent
    pub(crate) fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub(crate) fn outline(&self) -> Outline {
        self.geometry
            .as_ref()
            .map(Geometry::outer_rings)
            .unwrap_or_default()
    }
}

fn properties_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Parse the top-level region dataset.
///
/// Features without a name or without an areal outline are skipped.
pub fn parse_regions(bytes: &[u8], name_key: &str) -> Result<Vec<Region>, RegionError> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)?;

    let mut regions = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(name) = feature.property(name_key) else {
            debug!("Skipping region feature without '{}'", name_key);
            continue;
        };

        let outline = feature.outline();
        if outline.is_empty() {
            debug!("Skipping region '{}' without polygon geometry", name);
            continue;
        }

        regions.push(Region::new(name, outline));
    }

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(x: f64, y: f64) -> Value {
        json!([[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]])
    }

    #[test]
    fn test_polygon_keeps_outer_ring_only() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [square(0.0, 0.0), square(0.2, 0.2)]
        }))
        .unwrap();

        let rings = geometry.outer_rings();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].0[0], Coord { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_multipolygon_contributes_each_outer_ring() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": [[square(0.0, 0.0), square(0.2, 0.2)], [square(5.0, 5.0)]]
        }))
        .unwrap();

        let rings = geometry.outer_rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1].0[0], Coord { x: 5.0, y: 5.0 });
    }

    #[test]
    fn test_non_areal_geometry_has_no_outline() {
        let geometry: Geometry =
            serde_json::from_value(json!({"type": "Point", "coordinates": [1.0, 2.0]})).unwrap();
        assert!(geometry.outer_rings().is_empty());
    }

    #[test]
    fn test_parse_regions_skips_unnamed() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"SIG_KOR_NM": "Jongno-gu"},
                 "geometry": {"type": "Polygon", "coordinates": [square(0.0, 0.0)]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Polygon", "coordinates": [square(1.0, 0.0)]}},
                {"type": "Feature", "properties": {"SIG_KOR_NM": "Jung-gu"}, "geometry": null}
            ]
        });

        let regions = parse_regions(data.to_string().as_bytes(), "SIG_KOR_NM").unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Jongno-gu");
    }

    #[test]
    fn test_parse_regions_rejects_malformed() {
        assert!(parse_regions(b"{\"features\": 3}", "name").is_err());
    }
}
