//! TopoJSON topology decoding.
//!
//! Converts one named object of a topology into plain features: arcs are
//! dequantized, then stitched into rings by index (negative indices walk an
//! arc backwards, `!i`).

use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::geojson::{Feature, Geometry};
use super::RegionError;

#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoObject>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoObject {
    GeometryCollection {
        geometries: Vec<TopoObject>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Other,
}

type Position = Vec<f64>;

impl Topology {
    /// Decode every areal geometry of `object` into features
    pub(crate) fn features(&self, object: &str) -> Result<Vec<Feature>, RegionError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| RegionError::MissingObject(object.to_string()))?;

        let arcs = self.decode_arcs();
        let mut features = Vec::new();
        collect_features(root, &arcs, &mut features)?;
        Ok(features)
    }

    /// Absolute positions for every arc
    fn decode_arcs(&self) -> Vec<Vec<Position>> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(t) => {
                    // Quantized arcs are delta-encoded
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            vec![x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                        })
                        .collect()
                }
                None => arc.iter().filter(|p| p.len() >= 2).cloned().collect(),
            })
            .collect()
    }
}

fn collect_features(
    object: &TopoObject,
    arcs: &[Vec<Position>],
    out: &mut Vec<Feature>,
) -> Result<(), RegionError> {
    match object {
        TopoObject::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect_features(geometry, arcs, out)?;
            }
        }
        TopoObject::Polygon {
            arcs: rings,
            properties,
        } => {
            let coordinates = rings
                .iter()
                .map(|ring| stitch(arcs, ring))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Feature {
                geometry: Some(Geometry::Polygon { coordinates }),
                properties: properties.clone().unwrap_or_default(),
            });
        }
        TopoObject::MultiPolygon {
            arcs: polygons,
            properties,
        } => {
            let coordinates = polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .iter()
                        .map(|ring| stitch(arcs, ring))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Feature {
                geometry: Some(Geometry::MultiPolygon { coordinates }),
                properties: properties.clone().unwrap_or_default(),
            });
        }
        TopoObject::Other => {}
    }
    Ok(())
}

/// Join arcs into one ring, dropping the shared point between consecutive arcs
fn stitch(arcs: &[Vec<Position>], indices: &[i64]) -> Result<Vec<Position>, RegionError> {
    let mut ring: Vec<Position> = Vec::new();

    for &index in indices {
        let (slot, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(RegionError::InvalidArc(index))?;

        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }

        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }

    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(features: &[Feature], key: &str) -> Vec<String> {
        features.iter().filter_map(|f| f.property(key)).collect()
    }

    #[test]
    fn test_decode_quantized_polygon() {
        // Unit square split into two arcs; the second is walked backwards.
        let topo: Topology = serde_json::from_value(json!({
            "type": "Topology",
            "transform": {"scale": [0.5, 0.5], "translate": [126.0, 37.0]},
            "arcs": [
                [[0, 0], [2, 0], [0, 2]],
                [[0, 0], [0, 2], [2, 0]]
            ],
            "objects": {
                "dong": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0, -2]],
                         "properties": {"DONG_KOR_NM": "Sajik-dong", "SIG_KOR_NM": "Jongno-gu"}}
                    ]
                }
            }
        }))
        .unwrap();

        let features = topo.features("dong").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(names(&features, "DONG_KOR_NM"), vec!["Sajik-dong"]);

        let rings = features[0].outline();
        assert_eq!(rings.len(), 1);
        let coords: Vec<(f64, f64)> = rings[0].0.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(
            coords,
            vec![(126.0, 37.0), (127.0, 37.0), (127.0, 38.0), (126.0, 38.0), (126.0, 37.0)]
        );
    }

    #[test]
    fn test_multipolygon_and_unquantized_arcs() {
        let topo: Topology = serde_json::from_value(json!({
            "type": "Topology",
            "arcs": [
                [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
                [[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]
            ],
            "objects": {
                "areas": {"type": "GeometryCollection", "geometries": [
                    {"type": "MultiPolygon", "arcs": [[[0]], [[1]]], "properties": {"name": "split"}},
                    {"type": "LineString", "arcs": [0]}
                ]}
            }
        }))
        .unwrap();

        let features = topo.features("areas").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].outline().len(), 2);
    }

    #[test]
    fn test_missing_object() {
        let topo: Topology =
            serde_json::from_value(json!({"arcs": [], "objects": {}})).unwrap();
        assert!(matches!(
            topo.features("dong"),
            Err(RegionError::MissingObject(name)) if name == "dong"
        ));
    }

    #[test]
    fn test_invalid_arc_index() {
        let topo: Topology = serde_json::from_value(json!({
            "arcs": [[[0.0, 0.0], [1.0, 1.0]]],
            "objects": {"o": {"type": "Polygon", "arcs": [[3]]}}
        }))
        .unwrap();
        assert!(matches!(topo.features("o"), Err(RegionError::InvalidArc(3))));
    }
}
