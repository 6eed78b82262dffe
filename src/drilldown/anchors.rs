use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Named point of interest used to recenter the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Anchor {
    pub fn new(name: &str, display_name: &str, lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            lat,
            lng,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || (!self.display_name.is_empty() && self.display_name == name)
    }
}

/// The popular areas shown on the overview map
pub fn default_anchors() -> Vec<Anchor> {
    vec![
        Anchor::new("Daehangno", "대학로", 37.5791, 126.9990),
        Anchor::new("Hongdae", "홍대", 37.5572, 126.9244),
        Anchor::new("Gangnam", "강남", 37.4979, 127.0276),
        Anchor::new("Insadong", "인사동", 37.5735, 126.9858),
        Anchor::new("Samcheongdong", "삼청동", 37.5847, 126.9807),
    ]
}

/// Small fixed lookup of anchors by name or display name
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRegistry {
    anchors: Vec<Anchor>,
}

impl AnchorRegistry {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    pub fn find(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new(default_anchors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_or_display_name() {
        let registry = AnchorRegistry::default();
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.find("Gangnam").map(Anchor::coordinate),
            Some(Coordinate::new(37.4979, 127.0276))
        );
        assert_eq!(registry.find("인사동").map(|a| a.name.as_str()), Some("Insadong"));
        assert!(registry.find("Jamsil").is_none());
    }

    #[test]
    fn test_empty_display_name_never_matches_empty_query() {
        let registry = AnchorRegistry::new(vec![Anchor::new("Seochon", "", 37.58, 126.97)]);
        assert!(registry.find("").is_none());
        assert!(registry.find("Seochon").is_some());
    }
}
