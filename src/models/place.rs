//! Place records and the ranking projections built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geographic point (lat/lng, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are zero; providers use this for "no position".
    pub fn is_zero(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo::coord! { x: c.lng, y: c.lat }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { lat: c.y, lng: c.x }
    }
}

/// A candidate point of interest.
///
/// Deserializes leniently from provider JSON: numeric fields that are missing,
/// null, negative or unparsable become 0 rather than failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaceRecord", into = "PlaceRecord")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinate: Option<Coordinate>,
    /// 0 to 5, 0 meaning unrated
    pub rating: f64,
    pub review_count: u32,
    pub rating_count: u32,
    pub place_type: String,
    pub phone: String,
    pub detail_url: String,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            coordinate: None,
            rating: 0.0,
            review_count: 0,
            rating_count: 0,
            place_type: String::new(),
            phone: String::new(),
            detail_url: String::new(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinate = Some(Coordinate::new(lat, lng));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32, rating_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self.rating_count = rating_count;
        self
    }

    pub fn with_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }
}

/// Wire shape of a place as delivered by search providers and catalogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlaceRecord {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(deserialize_with = "lenient_string")]
    address: String,
    #[serde(deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    lng: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    rating: f64,
    #[serde(deserialize_with = "lenient_count")]
    review_count: u32,
    #[serde(deserialize_with = "lenient_count")]
    rating_count: u32,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    place_type: String,
    #[serde(deserialize_with = "lenient_string")]
    phone: String,
    #[serde(deserialize_with = "lenient_string")]
    detail_url: String,
}

impl From<PlaceRecord> for Place {
    fn from(r: PlaceRecord) -> Self {
        let coordinate = match (r.lat, r.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)).filter(|c| !c.is_zero()),
            _ => None,
        };

        Self {
            id: r.id,
            name: r.name,
            address: r.address,
            coordinate,
            rating: r.rating,
            review_count: r.review_count,
            rating_count: r.rating_count,
            place_type: r.place_type,
            phone: r.phone,
            detail_url: r.detail_url,
        }
    }
}

impl From<Place> for PlaceRecord {
    fn from(p: Place) -> Self {
        Self {
            id: p.id,
            name: p.name,
            address: p.address,
            lat: p.coordinate.map(|c| c.lat),
            lng: p.coordinate.map(|c| c.lng),
            rating: p.rating,
            review_count: p.review_count,
            rating_count: p.rating_count,
            place_type: p.place_type,
            phone: p.phone,
            detail_url: p.detail_url,
        }
    }
}

fn number_from(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value).filter(|n| *n > 0.0).unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value)
        .filter(|n| *n > 0.0)
        .map(|n| n.trunc().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// A place with the signals computed for one ranking run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPlace {
    pub place: Place,
    /// Great-circle distance to the user, rounded to 2 decimals
    pub distance_km: f64,
    /// Rating-count confidence in [0, 1], rounded to 2 decimals
    pub reliability: f64,
    /// Composite relevance score, rounded to 2 decimals
    pub score: f64,
}

/// Presentation projection of a ranked place.
///
/// This is the stable output contract consumed by presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// 1-based, contiguous
    pub rank: usize,
    pub name: String,
    pub address: String,
    /// e.g. "1.25km"
    pub distance: String,
    pub rating: f64,
    pub review_count: u32,
    pub score: f64,
    #[serde(rename = "type")]
    pub place_type: String,
    pub phone: String,
    pub detail_url: String,
}
